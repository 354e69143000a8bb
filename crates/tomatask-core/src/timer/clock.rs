//! Pause-aware elapsed time for a single session.
//!
//! Elapsed time is sampled as `now - start - paused` rather than counted
//! down, so a late wake-up never loses time.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone, Copy)]
pub(crate) struct SessionClock {
    started: Instant,
    paused_at: Option<Instant>,
    paused_total: Duration,
}

impl SessionClock {
    pub(crate) fn start() -> Self {
        Self {
            started: Instant::now(),
            paused_at: None,
            paused_total: Duration::ZERO,
        }
    }

    pub(crate) fn elapsed(&self) -> Duration {
        let now = self.paused_at.unwrap_or_else(Instant::now);
        now.saturating_duration_since(self.started)
            .saturating_sub(self.paused_total)
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Returns false if already paused.
    pub(crate) fn pause(&mut self) -> bool {
        if self.paused_at.is_some() {
            return false;
        }
        self.paused_at = Some(Instant::now());
        true
    }

    /// Returns false if not paused.
    pub(crate) fn resume(&mut self) -> bool {
        match self.paused_at.take() {
            Some(at) => {
                self.paused_total += Instant::now().saturating_duration_since(at);
                true
            }
            None => false,
        }
    }
}
