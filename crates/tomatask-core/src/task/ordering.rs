//! Display order and deadline classification.
//!
//! Tasks are ordered by `(priority rank, deadline)`; a missing deadline sorts
//! as [`NaiveDate::MAX`]. All time-dependent functions take `today` as an
//! argument, the `*_now` helpers read the local wall clock.

use chrono::{Local, NaiveDate};
use serde::Serialize;

use super::Task;

/// Inclusive number of days ahead at which a pending task counts as urgent.
pub const URGENT_WITHIN_DAYS: i64 = 3;

/// Current local date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Composite sort key of a task.
pub fn sort_key(task: &Task) -> (u8, NaiveDate) {
    (task.priority.rank(), task.deadline.unwrap_or(NaiveDate::MAX))
}

/// Store indices of `tasks` in display order. Stable for equal keys.
pub fn sort_by_priority_and_deadline(tasks: &[Task]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..tasks.len()).collect();
    order.sort_by_key(|&i| sort_key(&tasks[i]));
    order
}

/// Days from `today` until the deadline; negative when overdue.
pub fn days_until(task: &Task, today: NaiveDate) -> Option<i64> {
    task.deadline.map(|d| (d - today).num_days())
}

/// Pending task due within [`URGENT_WITHIN_DAYS`] days, or overdue.
pub fn is_urgent(task: &Task, today: NaiveDate) -> bool {
    if task.completed {
        return false;
    }
    matches!(days_until(task, today), Some(days) if days <= URGENT_WITHIN_DAYS)
}

/// Deadline bucket used for display and notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "bucket", rename_all = "snake_case")]
pub enum DeadlineBucket {
    NoDeadline,
    Overdue { days: i64 },
    Today,
    Tomorrow,
    Soon { days: i64 },
    Normal { days: i64 },
}

impl DeadlineBucket {
    pub fn classify(task: &Task, today: NaiveDate) -> Self {
        match days_until(task, today) {
            None => DeadlineBucket::NoDeadline,
            Some(d) if d < 0 => DeadlineBucket::Overdue { days: -d },
            Some(0) => DeadlineBucket::Today,
            Some(1) => DeadlineBucket::Tomorrow,
            Some(d) if d <= URGENT_WITHIN_DAYS => DeadlineBucket::Soon { days: d },
            Some(d) => DeadlineBucket::Normal { days: d },
        }
    }

    /// Short human label ("today", "in 2d", "3d overdue", "-").
    pub fn label(&self) -> String {
        match self {
            DeadlineBucket::NoDeadline => "-".into(),
            DeadlineBucket::Overdue { days } => format!("{days}d overdue"),
            DeadlineBucket::Today => "today".into(),
            DeadlineBucket::Tomorrow => "tomorrow".into(),
            DeadlineBucket::Soon { days } | DeadlineBucket::Normal { days } => {
                format!("in {days}d")
            }
        }
    }
}

/// Pending tasks grouped for the daily reminder, each group in display order.
#[derive(Debug, Default, Clone)]
pub struct UrgencyReport<'a> {
    pub overdue: Vec<&'a Task>,
    pub today: Vec<&'a Task>,
    pub tomorrow: Vec<&'a Task>,
}

impl<'a> UrgencyReport<'a> {
    pub fn build(tasks: &'a [Task], today: NaiveDate) -> Self {
        let mut report = UrgencyReport::default();
        for i in sort_by_priority_and_deadline(tasks) {
            let task = &tasks[i];
            if task.completed {
                continue;
            }
            match DeadlineBucket::classify(task, today) {
                DeadlineBucket::Overdue { .. } => report.overdue.push(task),
                DeadlineBucket::Today => report.today.push(task),
                DeadlineBucket::Tomorrow => report.tomorrow.push(task),
                _ => {}
            }
        }
        report
    }

    pub fn is_empty(&self) -> bool {
        self.overdue.is_empty() && self.today.is_empty() && self.tomorrow.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;

    fn date(d: u32, m: u32, y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(desc: &str, priority: Priority, deadline: Option<NaiveDate>) -> Task {
        Task {
            deadline,
            ..Task::new(desc, priority)
        }
    }

    #[test]
    fn orders_by_priority_then_deadline() {
        let tasks = vec![
            task("low-none", Priority::Low, None),
            task("high-late", Priority::High, Some(date(30, 12, 2024))),
            task("medium-soon", Priority::Medium, Some(date(1, 12, 2024))),
            task("high-none", Priority::High, None),
            task("high-early", Priority::High, Some(date(2, 12, 2024))),
        ];
        let order: Vec<&str> = sort_by_priority_and_deadline(&tasks)
            .into_iter()
            .map(|i| tasks[i].description.as_str())
            .collect();
        assert_eq!(
            order,
            ["high-early", "high-late", "high-none", "medium-soon", "low-none"]
        );
    }

    #[test]
    fn equal_keys_keep_insertion_order() {
        let tasks = vec![
            task("first", Priority::Medium, None),
            task("second", Priority::Medium, None),
            task("third", Priority::Medium, None),
        ];
        assert_eq!(sort_by_priority_and_deadline(&tasks), vec![0, 1, 2]);
    }

    #[test]
    fn urgency_boundary_is_three_days() {
        let today = date(10, 6, 2025);
        let three = task("three", Priority::Low, Some(date(13, 6, 2025)));
        let four = task("four", Priority::Low, Some(date(14, 6, 2025)));
        let overdue = task("overdue", Priority::Low, Some(date(1, 6, 2025)));
        assert!(is_urgent(&three, today));
        assert!(!is_urgent(&four, today));
        assert!(is_urgent(&overdue, today));
    }

    #[test]
    fn completed_and_undated_tasks_are_never_urgent() {
        let today = date(10, 6, 2025);
        let mut done = task("done", Priority::High, Some(date(10, 6, 2025)));
        done.completed = true;
        assert!(!is_urgent(&done, today));
        assert!(!is_urgent(&task("none", Priority::High, None), today));
    }

    #[test]
    fn classify_buckets() {
        let today = date(10, 6, 2025);
        let at = |d| DeadlineBucket::classify(&task("t", Priority::Low, Some(d)), today);
        assert_eq!(at(date(7, 6, 2025)), DeadlineBucket::Overdue { days: 3 });
        assert_eq!(at(date(10, 6, 2025)), DeadlineBucket::Today);
        assert_eq!(at(date(11, 6, 2025)), DeadlineBucket::Tomorrow);
        assert_eq!(at(date(12, 6, 2025)), DeadlineBucket::Soon { days: 2 });
        assert_eq!(at(date(13, 6, 2025)), DeadlineBucket::Soon { days: 3 });
        assert_eq!(at(date(14, 6, 2025)), DeadlineBucket::Normal { days: 4 });
        assert_eq!(
            DeadlineBucket::classify(&task("t", Priority::Low, None), today),
            DeadlineBucket::NoDeadline
        );
    }

    #[test]
    fn urgency_report_skips_completed_and_distant() {
        let today = date(10, 6, 2025);
        let mut done = task("done", Priority::High, Some(date(9, 6, 2025)));
        done.completed = true;
        let tasks = vec![
            done,
            task("late", Priority::Low, Some(date(9, 6, 2025))),
            task("now", Priority::Medium, Some(date(10, 6, 2025))),
            task("next", Priority::High, Some(date(11, 6, 2025))),
            task("later", Priority::High, Some(date(12, 6, 2025))),
        ];
        let report = UrgencyReport::build(&tasks, today);
        assert_eq!(report.overdue.len(), 1);
        assert_eq!(report.overdue[0].description, "late");
        assert_eq!(report.today[0].description, "now");
        assert_eq!(report.tomorrow[0].description, "next");
    }
}
