//! Telegram message bodies (HTML parse mode).

use std::fmt::Write;

use chrono::{NaiveDate, NaiveDateTime};

use crate::task::ordering::days_until;
use crate::task::{Priority, Task};

/// Longest list shown in a reminder before collapsing the rest.
pub const MAX_LISTED: usize = 5;

pub fn priority_marker(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "🔴",
        Priority::Medium => "🟡",
        Priority::Low => "🟢",
    }
}

/// Escape text for Telegram's HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn capitalized(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "High",
        Priority::Medium => "Medium",
        Priority::Low => "Low",
    }
}

pub fn task_completed(task: &Task, pomodoros: u32, at: NaiveDateTime) -> String {
    let mut msg = format!(
        "🎉 <b>Task completed!</b> 🎉\n\n\
         {} <b>{}</b>\n\n\
         ✅ Status: <i>Completed</i>\n\
         📊 Priority: {}\n",
        priority_marker(task.priority),
        escape_html(&task.description),
        capitalized(task.priority),
    );
    if pomodoros > 0 {
        let _ = writeln!(msg, "🍅 Pomodoros: {pomodoros}");
    }
    let _ = write!(msg, "\n⏰ {}", at.format("%d/%m/%Y %H:%M"));
    msg
}

pub fn due_tomorrow(tasks: &[&Task]) -> String {
    let mut msg = format!(
        "⏰ <b>Reminder: tasks due tomorrow</b>\n\n\
         📅 You have <b>{}</b> task(s) due tomorrow:\n\n",
        tasks.len()
    );
    for (i, task) in tasks.iter().take(MAX_LISTED).enumerate() {
        let _ = writeln!(
            msg,
            "{}. {} {}",
            i + 1,
            priority_marker(task.priority),
            escape_html(&task.description)
        );
    }
    push_remainder(&mut msg, tasks.len(), "\n", "\n");
    msg.push_str("\n💡 Plan your day!");
    msg
}

pub fn due_today(tasks: &[&Task]) -> String {
    let mut msg = format!(
        "🚨 <b>TASKS DUE TODAY!</b> 🚨\n\n\
         📅 You have <b>{}</b> task(s) due TODAY:\n\n",
        tasks.len()
    );
    for (i, task) in tasks.iter().take(MAX_LISTED).enumerate() {
        let _ = writeln!(
            msg,
            "{}. {} <b>{}</b>",
            i + 1,
            priority_marker(task.priority),
            escape_html(&task.description)
        );
    }
    push_remainder(&mut msg, tasks.len(), "\n", "\n");
    msg.push_str("\n⚡ Get to work!");
    msg
}

pub fn overdue(tasks: &[&Task], today: NaiveDate) -> String {
    let mut msg = format!(
        "⚠️ <b>OVERDUE TASKS</b> ⚠️\n\n\
         📛 You have <b>{}</b> task(s) past their deadline:\n\n",
        tasks.len()
    );
    for (i, task) in tasks.iter().take(MAX_LISTED).enumerate() {
        let _ = writeln!(
            msg,
            "{}. {} {}",
            i + 1,
            priority_marker(task.priority),
            escape_html(&task.description)
        );
        if let Some(days) = days_until(task, today) {
            let _ = writeln!(msg, "   <i>Overdue by {} day(s)</i>", -days);
        }
        msg.push('\n');
    }
    push_remainder(&mut msg, tasks.len(), "", "\n\n");
    msg.push_str("🔥 Needs attention!");
    msg
}

pub fn test_message(first_name: &str) -> String {
    let name = if first_name.trim().is_empty() {
        "there"
    } else {
        first_name.trim()
    };
    format!(
        "🤖 <b>Test message</b>\n\n\
         Hello {}! 👋\n\n\
         This is a test message from your task manager.\n\n\
         ✅ The configuration works.\n\n\
         🚀 You will now receive notifications!",
        escape_html(name)
    )
}

fn push_remainder(msg: &mut String, count: usize, before: &str, after: &str) {
    if count > MAX_LISTED {
        let _ = write!(
            msg,
            "{before}<i>... and {} more</i>{after}",
            count - MAX_LISTED
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32, m: u32, y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn completed_message_includes_pomodoros_only_when_positive() {
        let task = Task::new("Ship <beta>", Priority::High);
        let at = date(24, 12, 2024).and_hms_opt(9, 30, 0).unwrap();

        let with = task_completed(&task, 3, at);
        assert!(with.contains("🔴 <b>Ship &lt;beta&gt;</b>"));
        assert!(with.contains("🍅 Pomodoros: 3"));
        assert!(with.ends_with("⏰ 24/12/2024 09:30"));

        let without = task_completed(&task, 0, at);
        assert!(!without.contains("Pomodoros"));
    }

    #[test]
    fn lists_collapse_after_five() {
        let tasks: Vec<Task> = (1..=7)
            .map(|i| Task::new(format!("task {i}"), Priority::Low))
            .collect();
        let refs: Vec<&Task> = tasks.iter().collect();

        let msg = due_tomorrow(&refs);
        assert!(msg.contains("<b>7</b> task(s)"));
        assert!(msg.contains("5. 🟢 task 5"));
        assert!(!msg.contains("task 6"));
        assert!(msg.contains("<i>... and 2 more</i>"));

        let short = due_today(&refs[..2]);
        assert!(!short.contains("more"));
        assert!(short.contains("2. 🟢 <b>task 2</b>"));
    }

    #[test]
    fn overdue_shows_days_late() {
        let task = Task::new("Taxes", Priority::Medium).with_deadline(date(20, 12, 2024));
        let msg = overdue(&[&task], date(24, 12, 2024));
        assert!(msg.contains("1. 🟡 Taxes\n   <i>Overdue by 4 day(s)</i>"));
    }

    #[test]
    fn test_message_greets_by_name() {
        assert!(test_message("Ana").contains("Hello Ana!"));
        assert!(test_message("").contains("Hello there!"));
    }
}
