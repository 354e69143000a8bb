use clap::Subcommand;
use tomatask_core::notify;
use tomatask_core::task::ordering::today;

use super::{runtime, CliResult, Context};

#[derive(Subcommand)]
pub enum NotifyAction {
    /// Send deadline reminders (overdue, today, tomorrow) now
    Check,
    /// Send a test message
    Test,
    /// Check the bot token with the Telegram API
    Ping,
}

pub fn run(ctx: &Context, action: NotifyAction) -> CliResult {
    let config = ctx.config();
    let telegram = &config.telegram;

    match action {
        NotifyAction::Check => {
            let (store, _) = ctx.load_store()?;
            if !telegram.enabled {
                println!("Telegram notifications are disabled (telegram.enabled = false)");
                return Ok(());
            }
            let sent = runtime()?.block_on(notify::check_and_send_daily(telegram, &store.tasks, today()));
            if sent {
                println!("Reminders sent to Telegram");
            } else {
                println!("No reminders to send right now");
            }
        }
        NotifyAction::Test => {
            runtime()?.block_on(notify::send_test_message(telegram))?;
            println!("Test message sent");
        }
        NotifyAction::Ping => {
            let bot = runtime()?.block_on(notify::check_connection(telegram))?;
            match bot.username {
                Some(name) => println!("Connected to @{name}"),
                None => println!("Connected to {}", bot.first_name),
            }
        }
    }
    Ok(())
}

/// Daily reminder check run before task and pomodoro commands when
/// `telegram.check_on_start` is set. Problems are logged, never fatal.
pub fn check_on_start(ctx: &Context) {
    let config = ctx.config();
    if !(config.telegram.enabled && config.telegram.check_on_start) {
        return;
    }
    let Ok(path) = ctx.tasks_path() else { return };
    let Ok(store) = tomatask_core::TaskStore::load(&path) else {
        return;
    };
    match runtime() {
        Ok(rt) => {
            rt.block_on(notify::check_and_send_daily(&config.telegram, &store.tasks, today()));
        }
        Err(e) => tracing::warn!(error = %e, "skipping reminder check"),
    }
}
