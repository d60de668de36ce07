//! Configuration loading and typed config structures for Lootplan.
//!
//! The configuration lives in `lootplan.yaml` at the project root. Every
//! section is optional; missing keys fall back to the defaults below. Two
//! environment variables override file paths after parsing:
//!
//! - `LOOTPLAN_CATALOG` -- replaces `catalog.path`
//! - `LOOTPLAN_STATE_DIR` -- replaces `store.state_dir`

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default recursion limit for crafting tree expansion.
pub const DEFAULT_MAX_DEPTH: u32 = 10;

/// Environment variable overriding [`CatalogConfig::path`].
pub const CATALOG_ENV: &str = "LOOTPLAN_CATALOG";

/// Environment variable overriding [`StoreConfig::state_dir`].
pub const STATE_DIR_ENV: &str = "LOOTPLAN_STATE_DIR";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level Lootplan configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LootplanConfig {
    /// Where the item catalog is read from.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Where user selections are persisted.
    #[serde(default)]
    pub store: StoreConfig,

    /// Tree expansion limits.
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LootplanConfig {
    /// Load configuration from a YAML file, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse configuration from a YAML string. An empty document yields
    /// the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }

    /// Replace file paths with values from `lookup`, keyed by
    /// [`CATALOG_ENV`] and [`STATE_DIR_ENV`]. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(CATALOG_ENV).filter(|v| !v.is_empty()) {
            self.catalog.path = PathBuf::from(path);
        }
        if let Some(dir) = lookup(STATE_DIR_ENV).filter(|v| !v.is_empty()) {
            self.store.state_dir = PathBuf::from(dir);
        }
    }
}

/// Item catalog location.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogConfig {
    /// Path to the JSON item database.
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

/// Selection persistence location.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    /// Directory holding one JSON file per persisted selection.
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
        }
    }
}

/// Crafting tree expansion limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ResolverConfig {
    /// Deepest recipe level expanded; nodes below this become leaves.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Logging output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_catalog_path() -> PathBuf {
    PathBuf::from("data/items.json")
}

fn default_state_dir() -> PathBuf {
    PathBuf::from(".lootplan")
}

const fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = LootplanConfig::default();
        assert_eq!(config.catalog.path, PathBuf::from("data/items.json"));
        assert_eq!(config.store.state_dir, PathBuf::from(".lootplan"));
        assert_eq!(config.resolver.max_depth, 10);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
catalog:
  path: "/srv/arc/items.json"
store:
  state_dir: "/var/lib/lootplan"
resolver:
  max_depth: 6
logging:
  level: "debug"
  json: true
"#;
        let config = LootplanConfig::parse(yaml).unwrap();
        assert_eq!(config.catalog.path, PathBuf::from("/srv/arc/items.json"));
        assert_eq!(config.store.state_dir, PathBuf::from("/var/lib/lootplan"));
        assert_eq!(config.resolver.max_depth, 6);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = LootplanConfig::parse("resolver:\n  max_depth: 3\n").unwrap();

        assert_eq!(config.resolver.max_depth, 3);
        assert_eq!(config.catalog, CatalogConfig::default());
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn parse_empty_yaml() {
        let config = LootplanConfig::parse("   \n").unwrap();
        assert_eq!(config, LootplanConfig::default());
    }

    #[test]
    fn parse_invalid_yaml_is_error() {
        let result = LootplanConfig::parse("resolver: [unterminated");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn overrides_replace_paths() {
        let mut config = LootplanConfig::default();
        config.apply_overrides(|key| match key {
            CATALOG_ENV => Some("/tmp/items.json".to_owned()),
            STATE_DIR_ENV => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.catalog.path, PathBuf::from("/tmp/items.json"));
        // Empty value leaves the default untouched.
        assert_eq!(config.store.state_dir, PathBuf::from(".lootplan"));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("lootplan.yaml");
        if path.exists() {
            let config = LootplanConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
