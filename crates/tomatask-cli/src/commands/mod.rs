pub mod config;
pub mod notify;
mod operator;
pub mod pomodoro;
mod render;
pub mod task;

use std::path::PathBuf;

use tomatask_core::storage::default_tasks_path;
use tomatask_core::{Config, TaskStore};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Options shared by every command.
pub struct Context {
    file: Option<PathBuf>,
}

impl Context {
    pub fn new(file: Option<PathBuf>) -> Self {
        Self { file }
    }

    pub fn tasks_path(&self) -> Result<PathBuf, Box<dyn std::error::Error>> {
        match &self.file {
            Some(path) => Ok(path.clone()),
            None => Ok(default_tasks_path()?),
        }
    }

    /// Load the task store, continuing with an empty one if the file is
    /// unusable.
    pub fn load_store(&self) -> Result<(TaskStore, PathBuf), Box<dyn std::error::Error>> {
        let path = self.tasks_path()?;
        let (store, recovery) = TaskStore::load_or_empty(&path);
        if let Some(recovery) = recovery {
            eprintln!("warning: {}; starting with an empty task list", recovery.error);
            if let Some(backup) = recovery.backup {
                eprintln!("warning: unreadable file moved to {}", backup.display());
            }
        }
        Ok((store, path))
    }

    pub fn config(&self) -> Config {
        Config::load_or_default()
    }
}

/// Single-threaded runtime for the async parts of a command.
pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}
