//! Plain-text rendering of task lists.

use chrono::NaiveDate;
use serde::Serialize;
use tomatask_core::{DeadlineBucket, Task};

/// JSON row of `task list --json`.
#[derive(Serialize)]
pub struct TaskRow<'a> {
    pub position: usize,
    #[serde(flatten)]
    pub task: &'a Task,
    pub due: DeadlineBucket,
}

pub fn rows<'a>(tasks: &[&'a Task], today: NaiveDate) -> Vec<TaskRow<'a>> {
    tasks
        .iter()
        .enumerate()
        .map(|(i, task)| TaskRow {
            position: i + 1,
            task,
            due: DeadlineBucket::classify(task, today),
        })
        .collect()
}

pub fn table(tasks: &[&Task], today: NaiveDate) -> String {
    let header = ["#", "Done", "Priority", "Deadline", "Due", "Pomodoros", "Description"];
    let body: Vec<[String; 7]> = rows(tasks, today)
        .into_iter()
        .map(|row| {
            [
                row.position.to_string(),
                if row.task.completed { "x" } else { " " }.to_string(),
                row.task.priority.to_string(),
                row.task.deadline_text().unwrap_or_else(|| "-".into()),
                if row.task.completed {
                    "-".into()
                } else {
                    row.due.label()
                },
                row.task.pomodoros_completed.to_string(),
                row.task.description.clone(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for cells in &body {
        for (w, cell) in widths.iter_mut().zip(cells) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{c:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = line(&header.map(String::from)[..]);
    out.push('\n');
    for cells in &body {
        out.push_str(&line(&cells[..]));
        out.push('\n');
    }
    out
}

/// `mm:ss` for a number of seconds.
pub fn clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tomatask_core::Priority;

    #[test]
    fn table_aligns_columns() {
        let today = NaiveDate::from_ymd_opt(2024, 12, 24).unwrap();
        let a = Task::new("Write report", Priority::High)
            .with_deadline(NaiveDate::from_ymd_opt(2024, 12, 25).unwrap());
        let b = Task::new("Tidy", Priority::Low);
        let out = table(&[&a, &b], today);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("#  Done  Priority"));
        assert!(lines[1].contains("25/12/2024"));
        assert!(lines[1].contains("tomorrow"));
        assert!(lines[2].ends_with("Tidy"));
    }

    #[test]
    fn clock_pads() {
        assert_eq!(clock(0), "00:00");
        assert_eq!(clock(605), "10:05");
        assert_eq!(clock(1500), "25:00");
    }
}
