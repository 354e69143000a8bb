mod clock;
mod engine;
mod operator;
mod schedule;

pub use engine::{BreakOutcome, PomodoroTimer, RunSummary, SessionEnd, SessionReport, TimerState};
pub use operator::{Operator, Phase, Reply, Signal};
pub use schedule::{BreakKind, PomodoroConfig};
