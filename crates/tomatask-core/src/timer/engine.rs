//! Pomodoro run state machine.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> WorkSession -> (Completed | Cancelled)
//! Completed -> BreakDecision -> (ShortBreak | LongBreak | NoBreak) -> ContinueDecision
//! ContinueDecision -> (WorkSession | Idle)
//! ```
//!
//! A session counts against `tokio::time`, racing a one-second interval
//! against [`Operator::signal`]. The timer addresses its task by store index
//! and only writes the counter back in [`PomodoroTimer::commit`].
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = PomodoroTimer::for_task(&store, index, config.timer())?;
//! let summary = timer.run(&mut operator).await;
//! timer.commit(&mut store)?;
//! store.save(&path)?;
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::{interval, MissedTickBehavior};

use super::clock::SessionClock;
use super::operator::{Operator, Phase, Reply, Signal};
use super::schedule::{BreakKind, PomodoroConfig};
use crate::error::TaskError;
use crate::storage::TaskStore;
use crate::task::ops::TaskIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    Idle,
    WorkSession,
    Completed,
    Cancelled,
    BreakDecision,
    ShortBreak,
    LongBreak,
    NoBreak,
    ContinueDecision,
}

/// How a work session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEnd {
    /// The configured duration elapsed.
    Elapsed,
    FinishedEarly,
    Cancelled,
    Interrupted,
}

/// Result of one work session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    pub completed: bool,
    pub elapsed_seconds: u64,
    pub ended_by: SessionEnd,
}

/// How a break ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakOutcome {
    Finished,
    Skipped,
    Interrupted,
}

/// Result of a full run, from the first work session back to Idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Pomodoros completed during this run.
    pub session_pomodoros: u32,
    /// Task counter including this run.
    pub total_pomodoros: u32,
    pub last_session_elapsed_seconds: u64,
    pub interrupted: bool,
}

/// Drives work sessions and breaks for one task.
#[derive(Debug, Clone)]
pub struct PomodoroTimer {
    task: TaskIndex,
    config: PomodoroConfig,
    state: TimerState,
    session_pomodoros: u32,
    total_pomodoros: u32,
}

impl PomodoroTimer {
    /// Create a timer for the task at store `index`, seeded with its
    /// current pomodoro count.
    pub fn for_task(
        store: &TaskStore,
        index: TaskIndex,
        config: PomodoroConfig,
    ) -> Result<Self, TaskError> {
        let task = store.get(index).ok_or(TaskError::NotFound {
            position: index + 1,
            len: store.len(),
        })?;
        Ok(Self {
            task: index,
            config,
            state: TimerState::Idle,
            session_pomodoros: 0,
            total_pomodoros: task.pomodoros_completed,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn task_index(&self) -> TaskIndex {
        self.task
    }

    pub fn config(&self) -> &PomodoroConfig {
        &self.config
    }

    pub fn session_pomodoros(&self) -> u32 {
        self.session_pomodoros
    }

    pub fn total_pomodoros(&self) -> u32 {
        self.total_pomodoros
    }

    // ── Sessions ─────────────────────────────────────────────────────

    /// Count one work session. Natural completion and early finish both
    /// increment the counters; cancel and interrupt do not.
    pub async fn work_session<O: Operator>(&mut self, op: &mut O) -> SessionReport {
        self.transition(TimerState::WorkSession);
        let duration = self.config.work;
        let (signal, elapsed) = countdown(Phase::Work, duration, op).await;

        let ended_by = match signal {
            None => SessionEnd::Elapsed,
            Some(Signal::FinishEarly) => SessionEnd::FinishedEarly,
            Some(Signal::Interrupt) => SessionEnd::Interrupted,
            Some(_) => SessionEnd::Cancelled,
        };
        let completed = matches!(ended_by, SessionEnd::Elapsed | SessionEnd::FinishedEarly);
        if completed {
            self.session_pomodoros += 1;
            self.total_pomodoros += 1;
            self.transition(TimerState::Completed);
        } else {
            self.transition(TimerState::Cancelled);
        }

        let report = SessionReport {
            completed,
            elapsed_seconds: elapsed.as_secs(),
            ended_by,
        };
        tracing::info!(
            task = self.task,
            completed,
            elapsed_seconds = report.elapsed_seconds,
            ended_by = ?ended_by,
            total = self.total_pomodoros,
            "work session ended"
        );
        op.on_work_end(&report, self.total_pomodoros);
        report
    }

    /// Count one break. Early finish is ignored, cancel skips the rest.
    pub async fn break_session<O: Operator>(&mut self, kind: BreakKind, op: &mut O) -> BreakOutcome {
        self.transition(match kind {
            BreakKind::Short => TimerState::ShortBreak,
            BreakKind::Long => TimerState::LongBreak,
        });
        let duration = self.config.break_duration(kind);
        match countdown(Phase::Break(kind), duration, op).await.0 {
            None => BreakOutcome::Finished,
            Some(Signal::Interrupt) => BreakOutcome::Interrupted,
            Some(_) => BreakOutcome::Skipped,
        }
    }

    /// Run work sessions and breaks until the operator stops, cancels a work
    /// session, or interrupts.
    pub async fn run<O: Operator>(&mut self, op: &mut O) -> RunSummary {
        let mut last_elapsed;
        let mut interrupted = false;

        loop {
            let report = self.work_session(op).await;
            last_elapsed = report.elapsed_seconds;
            if !report.completed {
                interrupted = report.ended_by == SessionEnd::Interrupted;
                break;
            }

            self.transition(TimerState::BreakDecision);
            let kind = BreakKind::for_count(
                self.total_pomodoros,
                self.config.pomodoros_until_long_break,
            );
            match op.take_break(kind).await {
                Reply::Yes => {
                    if self.break_session(kind, op).await == BreakOutcome::Interrupted {
                        interrupted = true;
                        break;
                    }
                }
                Reply::No => self.transition(TimerState::NoBreak),
                Reply::Interrupt => {
                    interrupted = true;
                    break;
                }
            }

            self.transition(TimerState::ContinueDecision);
            match op.continue_working().await {
                Reply::Yes => continue,
                Reply::No => break,
                Reply::Interrupt => {
                    interrupted = true;
                    break;
                }
            }
        }

        self.transition(TimerState::Idle);
        RunSummary {
            session_pomodoros: self.session_pomodoros,
            total_pomodoros: self.total_pomodoros,
            last_session_elapsed_seconds: last_elapsed,
            interrupted,
        }
    }

    /// Write the pomodoro counter back to the task.
    pub fn commit(&self, store: &mut TaskStore) -> Result<(), TaskError> {
        store.set_pomodoros(self.task, self.total_pomodoros)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn transition(&mut self, next: TimerState) {
        tracing::debug!(from = ?self.state, to = ?next, "timer transition");
        self.state = next;
    }
}

/// Count `duration` for `phase`. Returns the signal that stopped the count,
/// or `None` when the duration elapsed, together with the elapsed time.
async fn countdown<O: Operator>(
    phase: Phase,
    duration: Duration,
    op: &mut O,
) -> (Option<Signal>, Duration) {
    let mut clock = SessionClock::start();
    let mut ticker = interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // First tick completes immediately.
    ticker.tick().await;
    op.on_phase_start(phase, duration);

    loop {
        let elapsed = clock.elapsed();
        if elapsed >= duration {
            return (None, duration);
        }

        let received = tokio::select! {
            _ = ticker.tick() => None,
            signal = op.signal(phase) => Some(signal),
        };

        match received {
            None => {
                if !clock.is_paused() {
                    op.on_tick(phase, clock.elapsed().min(duration), duration);
                }
            }
            Some(Signal::Pause) => {
                if clock.pause() {
                    op.on_pause_changed(phase, true);
                }
            }
            Some(Signal::Resume) => {
                if clock.resume() {
                    op.on_pause_changed(phase, false);
                }
            }
            Some(Signal::FinishEarly) if phase != Phase::Work => {}
            Some(signal) => return (Some(signal), clock.elapsed().min(duration)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use tokio::time::Instant;

    use super::*;
    use crate::task::{Priority, Task};

    /// Signals scheduled at fixed offsets from creation; canned replies.
    struct Script {
        start: Instant,
        signals: VecDeque<(u64, Signal)>,
        breaks: VecDeque<Reply>,
        continues: VecDeque<Reply>,
        offered: Vec<BreakKind>,
        ticks: u32,
    }

    impl Script {
        fn new(signals: &[(u64, Signal)], breaks: &[Reply], continues: &[Reply]) -> Self {
            Self {
                start: Instant::now(),
                signals: signals.iter().copied().collect(),
                breaks: breaks.iter().copied().collect(),
                continues: continues.iter().copied().collect(),
                offered: Vec::new(),
                ticks: 0,
            }
        }
    }

    impl Operator for Script {
        async fn signal(&mut self, _phase: Phase) -> Signal {
            match self.signals.front().copied() {
                Some((at, signal)) => {
                    tokio::time::sleep_until(self.start + Duration::from_secs(at)).await;
                    self.signals.pop_front();
                    signal
                }
                None => std::future::pending().await,
            }
        }

        async fn take_break(&mut self, kind: BreakKind) -> Reply {
            self.offered.push(kind);
            self.breaks.pop_front().unwrap_or(Reply::No)
        }

        async fn continue_working(&mut self) -> Reply {
            self.continues.pop_front().unwrap_or(Reply::No)
        }

        fn on_tick(&mut self, _phase: Phase, _elapsed: Duration, _duration: Duration) {
            self.ticks += 1;
        }
    }

    fn store_with(pomodoros: u32) -> TaskStore {
        let mut task = Task::new("Write report", Priority::High);
        task.pomodoros_completed = pomodoros;
        TaskStore::new(vec![task])
    }

    fn short_config() -> PomodoroConfig {
        PomodoroConfig {
            work: Duration::from_secs(60),
            short_break: Duration::from_secs(10),
            long_break: Duration::from_secs(30),
            pomodoros_until_long_break: 2,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn natural_completion_reports_full_duration() {
        let store = store_with(0);
        let mut timer = PomodoroTimer::for_task(&store, 0, short_config()).unwrap();
        let mut op = Script::new(&[], &[], &[]);

        let report = timer.work_session(&mut op).await;
        assert_eq!(
            report,
            SessionReport {
                completed: true,
                elapsed_seconds: 60,
                ended_by: SessionEnd::Elapsed,
            }
        );
        assert_eq!(timer.state(), TimerState::Completed);
        assert_eq!(timer.total_pomodoros(), 1);
        assert!(op.ticks >= 59);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_keeps_counter() {
        let store = store_with(2);
        let mut timer = PomodoroTimer::for_task(&store, 0, short_config()).unwrap();
        let mut op = Script::new(&[(20, Signal::Cancel)], &[], &[]);

        let report = timer.work_session(&mut op).await;
        assert!(!report.completed);
        assert_eq!(report.elapsed_seconds, 20);
        assert_eq!(report.ended_by, SessionEnd::Cancelled);
        assert_eq!(timer.state(), TimerState::Cancelled);
        assert_eq!(timer.total_pomodoros(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_extends_wall_time_not_elapsed() {
        let store = store_with(0);
        let mut timer = PomodoroTimer::for_task(&store, 0, short_config()).unwrap();
        let mut op = Script::new(&[(10, Signal::Pause), (40, Signal::Resume)], &[], &[]);

        let started = Instant::now();
        let report = timer.work_session(&mut op).await;
        assert!(report.completed);
        assert_eq!(report.elapsed_seconds, 60);
        assert_eq!(started.elapsed(), Duration::from_secs(90));
    }

    #[tokio::test(start_paused = true)]
    async fn early_finish_is_ignored_during_break() {
        let store = store_with(0);
        let mut timer = PomodoroTimer::for_task(&store, 0, short_config()).unwrap();
        let mut op = Script::new(&[(3, Signal::FinishEarly)], &[], &[]);

        let started = Instant::now();
        let outcome = timer.break_session(BreakKind::Short, &mut op).await;
        assert_eq!(outcome, BreakOutcome::Finished);
        assert_eq!(started.elapsed(), Duration::from_secs(10));
        assert_eq!(timer.total_pomodoros(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn run_offers_long_break_on_threshold() {
        let store = store_with(0);
        let mut timer = PomodoroTimer::for_task(&store, 0, short_config()).unwrap();
        let mut op = Script::new(&[], &[Reply::Yes, Reply::Yes], &[Reply::Yes, Reply::No]);

        let summary = timer.run(&mut op).await;
        assert_eq!(op.offered, [BreakKind::Short, BreakKind::Long]);
        assert_eq!(summary.session_pomodoros, 2);
        assert_eq!(summary.total_pomodoros, 2);
        assert!(!summary.interrupted);
        assert_eq!(timer.state(), TimerState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn interrupt_during_break_ends_run() {
        let store = store_with(0);
        let mut timer = PomodoroTimer::for_task(&store, 0, short_config()).unwrap();
        let mut op = Script::new(&[(65, Signal::Interrupt)], &[Reply::Yes], &[Reply::Yes]);

        let summary = timer.run(&mut op).await;
        assert!(summary.interrupted);
        assert_eq!(summary.session_pomodoros, 1);
        assert_eq!(summary.last_session_elapsed_seconds, 60);
        assert!(op.continues.len() == 1);
    }

    #[tokio::test(start_paused = true)]
    async fn commit_writes_counter_back() {
        let mut store = store_with(3);
        let mut timer = PomodoroTimer::for_task(&store, 0, short_config()).unwrap();
        let mut op = Script::new(&[], &[Reply::No], &[Reply::No]);

        timer.run(&mut op).await;
        timer.commit(&mut store).unwrap();
        assert_eq!(store.tasks[0].pomodoros_completed, 4);
    }

    #[test]
    fn for_task_rejects_missing_index() {
        let store = store_with(0);
        assert_eq!(
            PomodoroTimer::for_task(&store, 5, PomodoroConfig::default()).unwrap_err(),
            TaskError::NotFound { position: 6, len: 1 }
        );
    }
}
