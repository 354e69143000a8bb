//! # Tomatask Core Library
//!
//! This library provides the core logic for the tomatask task tracker. Every
//! operation is available through the `tomatask` CLI binary, which is a thin
//! layer over this crate.
//!
//! ## Architecture
//!
//! - **Tasks**: the task record, the priority/deadline ordering engine and
//!   validated mutations addressed by position in a sorted view
//! - **Storage**: JSON task file, CSV export/import and TOML configuration
//! - **Timer**: an async Pomodoro state machine driven by an [`Operator`]
//! - **Notify**: Telegram reminders, isolated so delivery failures never
//!   affect task operations
//!
//! ## Key Components
//!
//! - [`TaskStore`]: owner of all task records
//! - [`PomodoroTimer`]: work/break state machine for one task
//! - [`Config`]: application configuration management
//! - [`PomodoroStats`]: aggregate pomodoro statistics

pub mod error;
pub mod notify;
pub mod stats;
pub mod storage;
pub mod task;
pub mod timer;

pub use error::{ConfigError, CoreError, NotifyError, StoreError, TaskError};
pub use stats::{PomodoroStats, TaskWork};
pub use storage::{Config, TaskStore, TelegramConfig};
pub use task::ops::{DeadlineEdit, Outcome, StatusFilter, TaskEdit, TaskIndex, View};
pub use task::ordering::{DeadlineBucket, UrgencyReport};
pub use task::{Priority, Task};
pub use timer::{
    BreakKind, Operator, Phase, PomodoroConfig, PomodoroTimer, Reply, RunSummary, SessionReport,
    Signal, TimerState,
};
