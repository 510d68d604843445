mod config;
pub mod record_store;

pub use config::{ApiConfig, Config, ReminderConfig, DEFAULT_BASE_URL};
pub use record_store::FileRecordStore;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/habitlog[-dev]/` based on HABITLOG_ENV.
///
/// Set HABITLOG_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("HABITLOG_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("habitlog-dev")
    } else {
        base_dir.join("habitlog")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
