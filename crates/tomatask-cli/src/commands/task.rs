//! Task management commands for CLI.

use std::path::PathBuf;

use clap::Subcommand;
use tomatask_core::storage::csv;
use tomatask_core::task::ordering::today;
use tomatask_core::{notify, DeadlineEdit, Outcome, Priority, StatusFilter, TaskEdit};

use super::{render, runtime, CliResult, Context};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a new task
    Add {
        /// Task description
        description: String,
        /// Priority: high, medium or low
        #[arg(long, short, default_value = "medium")]
        priority: Priority,
        /// Deadline as DD/MM/YYYY
        #[arg(long, short)]
        deadline: Option<String>,
    },
    /// List tasks by priority and deadline
    List {
        /// Status filter: all, pending, completed or urgent
        #[arg(long, short, default_value = "all")]
        status: StatusFilter,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a task as completed
    Complete {
        /// Position in `task list --status pending` (0 cancels)
        position: usize,
    },
    /// Delete a task
    Delete {
        /// Position in `task list` (0 cancels)
        position: usize,
    },
    /// Edit a task
    Edit {
        /// Position in `task list` (0 cancels)
        position: usize,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New priority
        #[arg(long)]
        priority: Option<Priority>,
        /// Set completed status
        #[arg(long)]
        completed: Option<bool>,
        /// New deadline as DD/MM/YYYY
        #[arg(long, conflicts_with = "no_deadline")]
        deadline: Option<String>,
        /// Remove the deadline
        #[arg(long)]
        no_deadline: bool,
    },
    /// Search descriptions (case-insensitive)
    Search {
        query: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export all tasks to CSV
    Export {
        /// Output file
        path: PathBuf,
    },
    /// Import tasks from CSV, appending them
    Import {
        /// Input file
        path: PathBuf,
    },
}

pub fn run(ctx: &Context, action: TaskAction) -> CliResult {
    let (mut store, path) = ctx.load_store()?;

    match action {
        TaskAction::Add {
            description,
            priority,
            deadline,
        } => {
            let index = store.add(&description, priority, deadline.as_deref())?;
            store.save(&path)?;
            let task = &store.tasks[index];
            println!("Task added: {} ({})", task.description, task.priority);
        }
        TaskAction::List { status, json } => {
            let today = today();
            let tasks = store.filter(status, today);
            if json {
                println!("{}", serde_json::to_string_pretty(&render::rows(&tasks, today))?);
            } else if tasks.is_empty() {
                println!("No tasks.");
            } else {
                print!("{}", render::table(&tasks, today));
            }
        }
        TaskAction::Complete { position } => match store.complete(position)? {
            Outcome::Applied(index) => {
                store.save(&path)?;
                let task = &store.tasks[index];
                println!("Task completed: {}", task.description);
                let config = ctx.config();
                if config.telegram.enabled {
                    let sent = runtime()?
                        .block_on(notify::dispatch_task_completed(&config.telegram, task));
                    if sent {
                        println!("Notification sent to Telegram");
                    }
                }
            }
            Outcome::Cancelled => println!("Cancelled"),
        },
        TaskAction::Delete { position } => match store.delete(position)? {
            Outcome::Applied(task) => {
                store.save(&path)?;
                println!("Task deleted: {}", task.description);
            }
            Outcome::Cancelled => println!("Cancelled"),
        },
        TaskAction::Edit {
            position,
            description,
            priority,
            completed,
            deadline,
            no_deadline,
        } => {
            let edit = TaskEdit {
                description,
                priority,
                completed,
                deadline: match (deadline, no_deadline) {
                    (Some(text), _) => Some(DeadlineEdit::Set(text)),
                    (None, true) => Some(DeadlineEdit::Remove),
                    (None, false) => None,
                },
            };
            match store.edit(position, edit)? {
                Outcome::Applied(index) => {
                    store.save(&path)?;
                    println!("Task updated: {}", store.tasks[index].description);
                }
                Outcome::Cancelled => println!("Cancelled"),
            }
        }
        TaskAction::Search { query, json } => {
            let today = today();
            let found = store.search(&query);
            if json {
                println!("{}", serde_json::to_string_pretty(&render::rows(&found, today))?);
            } else if found.is_empty() {
                println!("No tasks match '{query}'.");
            } else {
                print!("{}", render::table(&found, today));
            }
        }
        TaskAction::Export { path: out } => {
            csv::export_file(&store.tasks, &out)?;
            println!("Exported {} task(s) to {}", store.len(), out.display());
        }
        TaskAction::Import { path: input } => {
            let report = csv::import_into(&mut store, &input)?;
            store.save(&path)?;
            println!(
                "Imported {} task(s), skipped {} row(s)",
                report.imported, report.skipped
            );
        }
    }
    Ok(())
}
