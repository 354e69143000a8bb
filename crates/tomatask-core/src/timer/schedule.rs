use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Durations used by a Pomodoro run. Held by the timer for the whole run, so
/// configuration changes only affect runs started afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PomodoroConfig {
    pub work: Duration,
    pub short_break: Duration,
    pub long_break: Duration,
    /// Every n-th completed pomodoro is followed by a long break offer.
    pub pomodoros_until_long_break: u32,
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            work: Duration::from_secs(25 * 60),
            short_break: Duration::from_secs(5 * 60),
            long_break: Duration::from_secs(15 * 60),
            pomodoros_until_long_break: 4,
        }
    }
}

impl PomodoroConfig {
    pub fn work_minutes(&self) -> u64 {
        self.work.as_secs() / 60
    }

    pub fn break_duration(&self, kind: BreakKind) -> Duration {
        match kind {
            BreakKind::Short => self.short_break,
            BreakKind::Long => self.long_break,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakKind {
    Short,
    Long,
}

impl BreakKind {
    /// Break offered after `total` completed pomodoros: long on every positive
    /// multiple of `threshold`, short otherwise. A zero threshold never yields
    /// a long break.
    pub fn for_count(total: u32, threshold: u32) -> Self {
        if threshold > 0 && total > 0 && total % threshold == 0 {
            BreakKind::Long
        } else {
            BreakKind::Short
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BreakKind::Short => "Short Break",
            BreakKind::Long => "Long Break",
        }
    }
}
