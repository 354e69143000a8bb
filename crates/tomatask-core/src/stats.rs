//! Pomodoro statistics across all tasks.
//!
//! Minutes are derived from the current work duration, not from the
//! durations in effect when each pomodoro was done.

use serde::Serialize;

use crate::task::Task;
use crate::timer::PomodoroConfig;

/// Default length of the most-worked list.
pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskWork {
    pub description: String,
    pub pomodoros: u32,
    pub minutes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PomodoroStats {
    pub total_pomodoros: u64,
    pub total_minutes: u64,
    pub tasks_with_pomodoros: usize,
    /// Most-worked tasks, descending by pomodoros; ties keep store order.
    pub top: Vec<TaskWork>,
}

impl PomodoroStats {
    pub fn collect(tasks: &[Task], config: &PomodoroConfig, top_n: usize) -> Self {
        let work_minutes = config.work_minutes();
        let total_pomodoros: u64 = tasks.iter().map(|t| u64::from(t.pomodoros_completed)).sum();

        let mut worked: Vec<&Task> = tasks.iter().filter(|t| t.pomodoros_completed > 0).collect();
        let tasks_with_pomodoros = worked.len();
        worked.sort_by(|a, b| b.pomodoros_completed.cmp(&a.pomodoros_completed));

        let top = worked
            .into_iter()
            .take(top_n)
            .map(|t| TaskWork {
                description: t.description.clone(),
                pomodoros: t.pomodoros_completed,
                minutes: u64::from(t.pomodoros_completed) * work_minutes,
            })
            .collect();

        Self {
            total_pomodoros,
            total_minutes: total_pomodoros * work_minutes,
            tasks_with_pomodoros,
            top,
        }
    }
}

/// Render minutes as `Xh Ym`, or `Ym` below one hour.
pub fn format_minutes(minutes: u64) -> String {
    let (h, m) = (minutes / 60, minutes % 60);
    if h > 0 {
        format!("{h}h {m}m")
    } else {
        format!("{m}m")
    }
}
