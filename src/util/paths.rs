//! Where navstate keeps its files
//!
//! Everything lives under one data directory, `~/.navstate` unless the CLI
//! was given `--data-dir`.

use std::path::PathBuf;
use std::sync::OnceLock;

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Pin the data directory for the rest of the process.
///
/// Only the first call has any effect.
pub fn init_data_dir(custom_path: Option<PathBuf>) {
    let path = custom_path.unwrap_or_else(default_data_dir);
    if let Err(ignored) = DATA_DIR.set(path) {
        tracing::debug!(path = %ignored.display(), "Data directory already pinned");
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".navstate"))
        .unwrap_or_else(|| PathBuf::from(".navstate"))
}

fn data_dir() -> PathBuf {
    DATA_DIR.get().cloned().unwrap_or_else(default_data_dir)
}

/// Saved-state database
pub fn database_path() -> PathBuf {
    data_dir().join("navstate.db")
}

/// TOML settings
pub fn config_path() -> PathBuf {
    data_dir().join("config.toml")
}

/// CLI log file, inside a `logs/` subdirectory
pub fn log_file_path() -> PathBuf {
    data_dir().join("logs").join("navstate.log")
}
