//! Core error types for tomatask-core.
//!
//! Validation failures of task operations are reported through [`TaskError`]
//! and never leave the store half-modified. Persistence and notification
//! problems have their own types so callers can isolate them at the boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tomatask-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Task operation errors
    #[error("Task error: {0}")]
    Task(#[from] TaskError),

    /// Task file errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Notification transport errors
    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures of a single task operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Deadline text is not a valid DD/MM/YYYY date
    #[error("Invalid date format: '{input}' (expected DD/MM/YYYY, e.g. 25/12/2024)")]
    InvalidDateFormat { input: String },

    /// Position does not exist in the current view
    #[error("No task at position {position} (view has {len} task(s))")]
    NotFound { position: usize, len: usize },

    /// The operation needs at least one task in its view
    #[error("No tasks available to {0}")]
    EmptyCollection(&'static str),

    /// Description is blank
    #[error("Task description cannot be empty")]
    EmptyDescription,

    /// Priority text does not name a priority
    #[error("Unknown priority '{0}' (expected high, medium or low)")]
    UnknownPriority(String),
}

/// Task file errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to read the task file
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File content is not a valid task list
    #[error("Malformed task data in {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to write the task file
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tabular file is missing required columns
    #[error("Invalid CSV header: missing column '{0}'")]
    MissingColumn(&'static str),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(#[source] std::io::Error),
}

/// Notification delivery failures. Always swallowed at the dispatch boundary.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Notifications are switched off
    #[error("Notifications are disabled")]
    Disabled,

    /// Bot token or chat id missing
    #[error("Telegram configuration incomplete: {0} not set")]
    NotConfigured(&'static str),

    /// Bad API base URL
    #[error("Invalid Telegram API URL: {0}")]
    Url(#[from] url::ParseError),

    /// Transport failure (timeout, connectivity). Carries no request URL,
    /// which embeds the bot token.
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// Non-success response
    #[error("Telegram API error (HTTP {status}): {body}")]
    Status { status: u16, body: String },
}

impl From<reqwest::Error> for NotifyError {
    fn from(e: reqwest::Error) -> Self {
        NotifyError::Http(e.without_url())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
