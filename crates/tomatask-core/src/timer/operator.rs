use std::time::Duration;

use super::engine::SessionReport;
use super::schedule::BreakKind;

/// What the timer is currently counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Work,
    Break(BreakKind),
}

/// Out-of-band input observed while a session is counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Work is done before the timer ran out. Counts as a completed pomodoro.
    FinishEarly,
    /// Stop the current session. Ends the run during work, skips a break.
    Cancel,
    /// Stop everything now, keeping what was counted so far.
    Interrupt,
    Pause,
    Resume,
}

/// Answer to a yes/no question asked between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Yes,
    No,
    Interrupt,
}

/// The person (or script) driving a Pomodoro run.
///
/// `signal` is raced against the timer's one-second tick and is dropped
/// whenever the tick wins, so implementations must be cancel-safe: read
/// from a channel or wait for a fixed instant, never hold partial input in
/// the future itself.
#[allow(async_fn_in_trait)]
pub trait Operator {
    /// Wait for the next signal. Never resolving is a valid answer.
    async fn signal(&mut self, phase: Phase) -> Signal;

    /// Offer a break of `kind` after a completed pomodoro.
    async fn take_break(&mut self, kind: BreakKind) -> Reply;

    /// Ask whether to start another work session.
    async fn continue_working(&mut self) -> Reply;

    /// Called when a session starts counting.
    fn on_phase_start(&mut self, _phase: Phase, _duration: Duration) {}

    /// Called about once per second with the elapsed time.
    fn on_tick(&mut self, _phase: Phase, _elapsed: Duration, _duration: Duration) {}

    /// Called when the session is paused or resumed.
    fn on_pause_changed(&mut self, _phase: Phase, _paused: bool) {}

    /// Called when a work session ends for any reason.
    fn on_work_end(&mut self, _report: &SessionReport, _total_pomodoros: u32) {}
}
