//! JSON-file task store.
//!
//! The file holds the full task list as a JSON array and is rewritten in
//! full on every save.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::StoreError;
use crate::task::Task;

/// An unusable task file replaced by an empty store.
#[derive(Debug)]
pub struct Recovery {
    pub error: StoreError,
    /// Where a malformed file was moved so the next save cannot overwrite it.
    pub backup: Option<PathBuf>,
}

/// In-memory ordered collection of tasks. Sole owner of every task record.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskStore {
    pub tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    /// Load the task file. A missing file is an empty store.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a task list.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let tasks = serde_json::from_str(&content).map_err(|source| StoreError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { tasks })
    }

    /// Load the task file, substituting an empty store when it is unusable.
    ///
    /// A malformed file is first renamed to `<name>.<timestamp>.bak`. The
    /// problem is returned alongside so the caller can report it.
    pub fn load_or_empty(path: &Path) -> (Self, Option<Recovery>) {
        match Self::load(path) {
            Ok(store) => (store, None),
            Err(error) => {
                let backup = match error {
                    StoreError::Malformed { .. } => set_aside(path),
                    _ => None,
                };
                tracing::warn!(
                    error = %error,
                    backup = ?backup,
                    "starting with an empty task list"
                );
                (Self::default(), Some(Recovery { error, backup }))
            }
        }
    }

    /// Persist the full list via temp file + rename.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let write_err = |source: std::io::Error| StoreError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let data = serde_json::to_string_pretty(&self.tasks).map_err(|e| write_err(e.into()))?;

        let tmp = path.with_extension("json.tmp");
        let mut f = fs::File::create(&tmp).map_err(write_err)?;
        f.write_all(data.as_bytes()).map_err(write_err)?;
        f.flush().map_err(write_err)?;
        fs::rename(&tmp, path).map_err(write_err)?;
        tracing::debug!(path = %path.display(), count = self.tasks.len(), "saved tasks");
        Ok(())
    }
}

fn set_aside(path: &Path) -> Option<PathBuf> {
    let mut name = path.file_name()?.to_os_string();
    name.push(format!(".{}.bak", Local::now().format("%Y%m%d-%H%M%S")));
    let backup = path.with_file_name(name);
    match fs::rename(path, &backup) {
        Ok(()) => Some(backup),
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "could not back up task file");
            None
        }
    }
}
