mod config;
pub mod csv;
mod store;

pub use config::{Config, NotificationEvents, PomodoroSettings, TelegramConfig};
pub use store::{Recovery, TaskStore};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/tomatask[-dev]/` based on TOMATASK_ENV.
///
/// Set TOMATASK_ENV=dev to use the development data directory, or
/// TOMATASK_HOME to use an explicit directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("TOMATASK_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("TOMATASK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("tomatask-dev")
            } else {
                base_dir.join("tomatask")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(ConfigError::DataDir)?;
    Ok(dir)
}

/// Default location of the task file.
pub fn default_tasks_path() -> Result<PathBuf, ConfigError> {
    Ok(data_dir()?.join("tasks.json"))
}
