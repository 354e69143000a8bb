use clap::Subcommand;
use tomatask_core::stats::{format_minutes, DEFAULT_TOP_N};
use tomatask_core::{PomodoroStats, PomodoroTimer, View};

use super::operator::TerminalOperator;
use super::{runtime, CliResult, Context};

#[derive(Subcommand)]
pub enum PomodoroAction {
    /// Run pomodoros for a pending task
    Start {
        /// Position in `task list --status pending` (0 cancels)
        position: usize,
    },
    /// Pomodoro statistics
    Stats {
        /// Number of most-worked tasks to show
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top: usize,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(ctx: &Context, action: PomodoroAction) -> CliResult {
    let (mut store, path) = ctx.load_store()?;
    let config = ctx.config();

    match action {
        PomodoroAction::Start { position } => {
            let Some(index) = store.resolve(View::Pending, position, "start a pomodoro on")? else {
                println!("Cancelled");
                return Ok(());
            };
            let task = &store.tasks[index];
            println!(
                "Task: {} ({}, {} pomodoro(s) so far)",
                task.description, task.priority, task.pomodoros_completed
            );

            let timer_config = config.timer();
            let mut timer = PomodoroTimer::for_task(&store, index, timer_config)?;
            let summary = runtime()?.block_on(async {
                let mut operator = TerminalOperator::spawn(timer_config);
                timer.run(&mut operator).await
            });

            timer.commit(&mut store)?;
            store.save(&path)?;

            if summary.interrupted {
                println!("\nRun interrupted.");
            }
            println!(
                "Pomodoros this run: {}  |  Total on task: {}",
                summary.session_pomodoros, summary.total_pomodoros
            );
        }
        PomodoroAction::Stats { top, json } => {
            let stats = PomodoroStats::collect(&store.tasks, &config.timer(), top);
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
                return Ok(());
            }
            println!("Total pomodoros: {}", stats.total_pomodoros);
            println!("Time worked: {}", format_minutes(stats.total_minutes));
            println!("Tasks worked on: {}", stats.tasks_with_pomodoros);
            if !stats.top.is_empty() {
                println!("\nMost worked:");
                for (i, work) in stats.top.iter().enumerate() {
                    println!(
                        "{}. {}: {} pomodoro(s), {}",
                        i + 1,
                        work.description,
                        work.pomodoros,
                        format_minutes(work.minutes)
                    );
                }
            }
        }
    }
    Ok(())
}
