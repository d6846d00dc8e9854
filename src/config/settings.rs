use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::state::RestorePolicy;
use crate::util::paths::{config_path, database_path};

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// What to do with saved records whose key no longer decodes
    pub restore_policy: RestorePolicy,
    /// SQLite file holding saved snapshots
    pub database_path: PathBuf,
    /// Slot used when none is given
    pub default_slot: String,
    /// Log filter directive (e.g. "info" or "navstate=debug")
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            restore_policy: RestorePolicy::Discard,
            database_path: database_path(),
            default_slot: "main".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlRestoreConfig {
    pub on_decode_error: Option<RestorePolicy>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlPersistenceConfig {
    pub database_path: Option<PathBuf>,
    pub default_slot: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlLoggingConfig {
    pub level: Option<String>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub restore: Option<TomlRestoreConfig>,
    pub persistence: Option<TomlPersistenceConfig>,
    pub logging: Option<TomlLoggingConfig>,
}

impl Config {
    /// Load configuration from the default file, merging with defaults
    pub fn load() -> Self {
        let config_file = config_path();

        // Create example config on first run
        if !config_file.exists() {
            Self::create_default_config(&config_file);
        }

        Self::load_from(&config_file)
    }

    /// Load configuration from `path`. Missing or malformed files yield defaults.
    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = fs::read_to_string(path) else {
            return Config::default();
        };
        match Self::from_toml_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Ignoring invalid config {}: {}", path.display(), e);
                Config::default()
            }
        }
    }

    /// Parse a config document on top of the defaults
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        let toml_config: TomlConfig = toml::from_str(contents)?;
        let mut config = Config::default();

        if let Some(restore) = toml_config.restore {
            if let Some(policy) = restore.on_decode_error {
                config.restore_policy = policy;
            }
        }

        if let Some(persistence) = toml_config.persistence {
            if let Some(path) = persistence.database_path {
                config.database_path = path;
            }
            if let Some(slot) = persistence.default_slot {
                config.default_slot = slot;
            }
        }

        if let Some(logging) = toml_config.logging {
            if let Some(level) = logging.level {
                config.log_level = level;
            }
        }

        Ok(config)
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &Path) {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent) {
                    eprintln!("Failed to create config directory: {}", e);
                    return;
                }
            }
        }

        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            eprintln!("Failed to write default config: {}", e);
        }
    }
}
