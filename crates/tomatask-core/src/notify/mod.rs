//! Notification dispatch.
//!
//! The `dispatch_*` functions are the boundary used after task operations:
//! they honour the `enabled` flag and per-event switches, log any delivery
//! failure at warn level and report only whether a message went out.

pub mod message;
mod telegram;

pub use telegram::{BotIdentity, TelegramNotifier, REQUEST_TIMEOUT};

use chrono::{Local, NaiveDate};

use crate::error::NotifyError;
use crate::storage::TelegramConfig;
use crate::task::ordering::UrgencyReport;
use crate::task::Task;

async fn deliver(config: &TelegramConfig, event: &'static str, text: String) -> bool {
    if !config.enabled {
        tracing::debug!(event, "notifications disabled");
        return false;
    }
    let result = match TelegramNotifier::from_config(config) {
        Ok(notifier) => notifier.send(&text).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(event, error = %e, "notification not delivered");
            false
        }
    }
}

/// Announce a completed task, with its pomodoro count when non-zero.
pub async fn dispatch_task_completed(config: &TelegramConfig, task: &Task) -> bool {
    if !config.events.task_completed {
        return false;
    }
    let text = message::task_completed(task, task.pomodoros_completed, Local::now().naive_local());
    deliver(config, "task_completed", text).await
}

pub async fn dispatch_due_tomorrow(config: &TelegramConfig, tasks: &[&Task]) -> bool {
    if !config.events.task_tomorrow || tasks.is_empty() {
        return false;
    }
    deliver(config, "task_tomorrow", message::due_tomorrow(tasks)).await
}

pub async fn dispatch_due_today(config: &TelegramConfig, tasks: &[&Task]) -> bool {
    if !config.events.task_today || tasks.is_empty() {
        return false;
    }
    deliver(config, "task_today", message::due_today(tasks)).await
}

pub async fn dispatch_overdue(config: &TelegramConfig, tasks: &[&Task], today: NaiveDate) -> bool {
    if !config.events.task_overdue || tasks.is_empty() {
        return false;
    }
    deliver(config, "task_overdue", message::overdue(tasks, today)).await
}

/// Send the overdue, due-today and due-tomorrow reminders that apply on
/// `today`. Returns true if at least one was delivered.
pub async fn check_and_send_daily(config: &TelegramConfig, tasks: &[Task], today: NaiveDate) -> bool {
    let report = UrgencyReport::build(tasks, today);
    if report.is_empty() {
        tracing::debug!("no deadline reminders due");
        return false;
    }

    let mut sent_any = false;
    sent_any |= dispatch_overdue(config, &report.overdue, today).await;
    sent_any |= dispatch_due_today(config, &report.today).await;
    sent_any |= dispatch_due_tomorrow(config, &report.tomorrow).await;
    sent_any
}

/// Send a greeting to verify delivery end to end. Unlike the dispatch
/// functions this reports the failure.
pub async fn send_test_message(config: &TelegramConfig) -> Result<(), NotifyError> {
    if !config.enabled {
        return Err(NotifyError::Disabled);
    }
    TelegramNotifier::from_config(config)?
        .send(&message::test_message(&config.first_name))
        .await
}

/// Check the bot token against the API.
pub async fn check_connection(config: &TelegramConfig) -> Result<BotIdentity, NotifyError> {
    TelegramNotifier::from_config(config)?.check_connection().await
}
