//! Task record and its field types.
//!
//! A task is persisted as a flat JSON object:
//!
//! ```text
//! { "description": "Write report", "completed": false, "priority": "high",
//!   "deadline": "25/12/2024", "pomodoros_completed": 0 }
//! ```

pub mod ops;
pub mod ordering;

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::TaskError;

/// Textual form of a deadline.
pub const DEADLINE_FORMAT: &str = "%d/%m/%Y";

/// Priority classification for task importance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[serde(alias = "alta", alias = "High")]
    High,
    #[serde(alias = "media", alias = "Medium")]
    Medium,
    #[serde(alias = "baja", alias = "Low")]
    Low,
}

impl Priority {
    /// Ordinal used for sorting: high 1, medium 2, low 3.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }

    /// Rank of raw priority text; anything that is not a priority ranks 4.
    pub fn rank_of_text(text: &str) -> u8 {
        text.parse::<Priority>().map(Priority::rank).unwrap_or(4)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" | "alta" => Ok(Priority::High),
            "medium" | "media" => Ok(Priority::Medium),
            "low" | "baja" => Ok(Priority::Low),
            _ => Err(TaskError::UnknownPriority(s.to_string())),
        }
    }
}

/// A single trackable to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    pub priority: Priority,
    #[serde(default, with = "deadline_text")]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub pomodoros_completed: u32,
}

impl Task {
    pub fn new(description: impl Into<String>, priority: Priority) -> Self {
        Self {
            description: description.into(),
            completed: false,
            priority,
            deadline: None,
            pomodoros_completed: 0,
        }
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Deadline rendered as DD/MM/YYYY.
    pub fn deadline_text(&self) -> Option<String> {
        self.deadline.map(format_deadline)
    }
}

/// Parse a DD/MM/YYYY deadline.
pub fn parse_deadline(input: &str) -> Result<NaiveDate, TaskError> {
    NaiveDate::parse_from_str(input.trim(), DEADLINE_FORMAT).map_err(|_| {
        TaskError::InvalidDateFormat {
            input: input.to_string(),
        }
    })
}

pub fn format_deadline(date: NaiveDate) -> String {
    date.format(DEADLINE_FORMAT).to_string()
}

/// Serde adapter for the deadline field.
///
/// An unparseable stored deadline reads as `None`; it is logged rather than
/// rejecting the whole task file.
mod deadline_text {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => s.serialize_str(&super::format_deadline(*date)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        Ok(raw.and_then(|text| match super::parse_deadline(&text) {
            Ok(date) => Some(date),
            Err(_) => {
                tracing::warn!(deadline = %text, "ignoring unparseable deadline");
                None
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_parses_english_and_legacy_names() {
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("Alta".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("media".parse::<Priority>().unwrap(), Priority::Medium);
        assert_eq!(" baja ".parse::<Priority>().unwrap(), Priority::Low);
        assert!(matches!(
            "urgent".parse::<Priority>(),
            Err(TaskError::UnknownPriority(_))
        ));
    }

    #[test]
    fn rank_of_unknown_text_is_four() {
        assert_eq!(Priority::rank_of_text("alta"), 1);
        assert_eq!(Priority::rank_of_text("low"), 3);
        assert_eq!(Priority::rank_of_text("N/A"), 4);
    }

    #[test]
    fn parse_deadline_accepts_day_month_year() {
        let date = parse_deadline("25/12/2024").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 12, 25).unwrap());
        assert_eq!(format_deadline(date), "25/12/2024");
    }

    #[test]
    fn parse_deadline_rejects_invalid_dates() {
        for bad in ["2024-12-25", "31/02/2024", "25/13/2024", "", "tomorrow"] {
            assert_eq!(
                parse_deadline(bad),
                Err(TaskError::InvalidDateFormat {
                    input: bad.to_string()
                }),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn task_json_uses_legacy_compatible_fields() {
        let task = Task::new("Write report", Priority::High)
            .with_deadline(NaiveDate::from_ymd_opt(2024, 12, 25).unwrap());
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["priority"], "high");
        assert_eq!(json["deadline"], "25/12/2024");
        assert_eq!(json["pomodoros_completed"], 0);
    }

    #[test]
    fn legacy_record_without_counter_loads() {
        let json = r#"{"description":"Old","completed":true,"priority":"media","deadline":null}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.completed);
        assert_eq!(task.deadline, None);
        assert_eq!(task.pomodoros_completed, 0);
    }

    #[test]
    fn unparseable_stored_deadline_reads_as_none() {
        let json = r#"{"description":"x","priority":"low","deadline":"someday"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.deadline, None);
    }
}
