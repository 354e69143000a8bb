//! Terminal driver for the Pomodoro timer.
//!
//! Lines from stdin are read on a plain thread and forwarded, together with
//! Ctrl+C, into one channel that the timer polls.

use std::io::{BufRead, Write};
use std::time::Duration;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tomatask_core::timer::SessionEnd;
use tomatask_core::{BreakKind, Operator, Phase, PomodoroConfig, Reply, SessionReport, Signal};

use super::render::clock;

const BAR_WIDTH: usize = 30;

enum Input {
    Line(String),
    Interrupt,
    Closed,
}

pub struct TerminalOperator {
    inputs: UnboundedReceiver<Input>,
    config: PomodoroConfig,
    stdin_closed: bool,
}

impl TerminalOperator {
    /// Start the stdin reader and Ctrl+C listener. Must be called inside a
    /// tokio runtime.
    pub fn spawn(config: PomodoroConfig) -> Self {
        let (tx, inputs) = unbounded_channel();

        let lines_tx = tx.clone();
        std::thread::spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if lines_tx.send(Input::Line(line)).is_err() {
                    return;
                }
            }
            let _ = lines_tx.send(Input::Closed);
        });

        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                if tx.send(Input::Interrupt).is_err() {
                    break;
                }
            }
        });

        Self {
            inputs,
            config,
            stdin_closed: false,
        }
    }

    async fn next(&mut self) -> Input {
        match self.inputs.recv().await {
            Some(input) => input,
            None => std::future::pending().await,
        }
    }

    /// Ask a yes/no question; an empty answer takes the default.
    async fn confirm(&mut self, question: &str, default: bool) -> Reply {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        print!("{question} {hint} ");
        if self.stdin_closed {
            println!();
            return Reply::No;
        }
        let _ = std::io::stdout().flush();
        loop {
            match self.next().await {
                Input::Interrupt => {
                    println!();
                    return Reply::Interrupt;
                }
                Input::Closed => {
                    self.stdin_closed = true;
                    println!();
                    return Reply::No;
                }
                Input::Line(line) => {
                    let answer = match line.trim().to_lowercase().as_str() {
                        "" => default,
                        "y" | "yes" => true,
                        "n" | "no" => false,
                        _ => {
                            print!("Please answer y or n: ");
                            let _ = std::io::stdout().flush();
                            continue;
                        }
                    };
                    return if answer { Reply::Yes } else { Reply::No };
                }
            }
        }
    }
}

impl Operator for TerminalOperator {
    async fn signal(&mut self, phase: Phase) -> Signal {
        loop {
            match self.next().await {
                Input::Interrupt => return Signal::Interrupt,
                Input::Closed => self.stdin_closed = true,
                Input::Line(line) => match (phase, line.trim()) {
                    (_, "q") => return Signal::Cancel,
                    (_, "p") => return Signal::Pause,
                    (_, "r") => return Signal::Resume,
                    (Phase::Work, "") => return Signal::FinishEarly,
                    (Phase::Break(_), "") => return Signal::Cancel,
                    _ => continue,
                },
            }
        }
    }

    async fn take_break(&mut self, kind: BreakKind) -> Reply {
        if kind == BreakKind::Long {
            println!(
                "You have completed {} pomodoros. Time for a long break!",
                self.config.pomodoros_until_long_break
            );
        }
        let minutes = self.config.break_duration(kind).as_secs() / 60;
        self.confirm(&format!("Take a {minutes} minute break now?"), true)
            .await
    }

    async fn continue_working(&mut self) -> Reply {
        self.confirm("Start another pomodoro?", true).await
    }

    fn on_phase_start(&mut self, phase: Phase, duration: Duration) {
        match phase {
            Phase::Work => {
                println!("\n🍅 Work session: {}", clock(duration.as_secs()));
                println!("Enter = finished early, p = pause, r = resume, q = stop, Ctrl+C = quit");
            }
            Phase::Break(kind) => {
                println!("\n☕ {}: {}", kind.label(), clock(duration.as_secs()));
                println!("Enter or q = skip break, Ctrl+C = quit");
            }
        }
    }

    fn on_tick(&mut self, _phase: Phase, elapsed: Duration, duration: Duration) {
        let total = duration.as_secs().max(1);
        let done = elapsed.as_secs().min(total);
        let filled = (done as usize * BAR_WIDTH) / total as usize;
        print!(
            "\r[{}{}] {} / {}",
            "#".repeat(filled),
            ".".repeat(BAR_WIDTH - filled),
            clock(done),
            clock(total)
        );
        let _ = std::io::stdout().flush();
    }

    fn on_pause_changed(&mut self, _phase: Phase, paused: bool) {
        println!("{}", if paused { "\n⏸  Paused" } else { "▶  Resumed" });
    }

    fn on_work_end(&mut self, report: &SessionReport, total_pomodoros: u32) {
        let spent = clock(report.elapsed_seconds);
        match report.ended_by {
            SessionEnd::Elapsed => println!("\n✅ Pomodoro completed ({spent})."),
            SessionEnd::FinishedEarly => println!("\n✅ Finished early after {spent}."),
            SessionEnd::Cancelled => println!("\n⏹  Session stopped after {spent}."),
            SessionEnd::Interrupted => println!("\n⏹  Interrupted after {spent}."),
        }
        if report.completed {
            println!("Pomodoros on this task: {total_pomodoros}");
        }
    }
}
