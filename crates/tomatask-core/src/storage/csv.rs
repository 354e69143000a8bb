//! CSV export and import.
//!
//! Export writes one row per task in store order:
//! `ID,Description,Completed,Priority,Deadline`. Import matches columns by
//! header name and also understands files written by the older Spanish
//! version of the tool.

use std::fs;
use std::path::Path;

use super::TaskStore;
use crate::error::{CoreError, StoreError};
use crate::task::{format_deadline, parse_deadline, Priority, Task};

pub const HEADER: [&str; 5] = ["ID", "Description", "Completed", "Priority", "Deadline"];

/// Deadline cell value for tasks without a deadline.
pub const NO_DATE: &str = "no date";
const LEGACY_NO_DATE: &str = "Sin fecha";

const DESCRIPTION_COLUMNS: [&str; 2] = ["Description", "Descripción"];
const COMPLETED_COLUMNS: [&str; 2] = ["Completed", "Estado"];
const PRIORITY_COLUMNS: [&str; 2] = ["Priority", "Prioridad"];
const DEADLINE_COLUMNS: [&str; 2] = ["Deadline", "Fecha Límite"];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
}

/// Render tasks as CSV text.
pub fn to_csv(tasks: &[Task]) -> String {
    let mut out = HEADER.join(",");
    out.push('\n');
    for (idx, task) in tasks.iter().enumerate() {
        let deadline = task
            .deadline
            .map(format_deadline)
            .unwrap_or_else(|| NO_DATE.to_string());
        let row = [
            (idx + 1).to_string(),
            escape(&task.description),
            if task.completed { "True" } else { "False" }.to_string(),
            task.priority.to_string(),
            deadline,
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

/// Parse CSV text into tasks. Rows without a description or with an
/// unknown priority are skipped and counted.
pub fn from_csv(content: &str) -> Result<(Vec<Task>, ImportReport), StoreError> {
    let mut records = split_records(content).into_iter();
    let header = records.next().unwrap_or_default();
    let column = |names: [&str; 2], label: &'static str| {
        header
            .iter()
            .position(|h| names.contains(&h.trim().trim_start_matches('\u{feff}')))
            .ok_or(StoreError::MissingColumn(label))
    };
    let desc_col = column(DESCRIPTION_COLUMNS, "Description")?;
    let done_col = column(COMPLETED_COLUMNS, "Completed")?;
    let prio_col = column(PRIORITY_COLUMNS, "Priority")?;
    let deadline_col = column(DEADLINE_COLUMNS, "Deadline").ok();

    let mut tasks = Vec::new();
    let mut report = ImportReport::default();
    for (row_num, fields) in records.enumerate() {
        let line = row_num + 2;
        let cell = |i: usize| fields.get(i).map(String::as_str).unwrap_or("");

        let description = cell(desc_col);
        if description.trim().is_empty() {
            tracing::warn!(line, "skipping row without description");
            report.skipped += 1;
            continue;
        }
        let priority: Priority = match cell(prio_col).parse() {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(line, error = %e, "skipping row");
                report.skipped += 1;
                continue;
            }
        };
        let deadline = deadline_col
            .map(cell)
            .map(str::trim)
            .filter(|d| !d.is_empty() && *d != NO_DATE && *d != LEGACY_NO_DATE)
            .and_then(|d| match parse_deadline(d) {
                Ok(date) => Some(date),
                Err(e) => {
                    tracing::warn!(line, error = %e, "importing without deadline");
                    None
                }
            });

        tasks.push(Task {
            completed: cell(done_col) == "True",
            deadline,
            ..Task::new(description, priority)
        });
        report.imported += 1;
    }
    Ok((tasks, report))
}

/// Append the tasks of a CSV file to `store`.
pub fn import_into(store: &mut TaskStore, path: &Path) -> Result<ImportReport, CoreError> {
    let (tasks, report) = import_file(path)?;
    store.tasks.extend(tasks);
    tracing::info!(imported = report.imported, skipped = report.skipped, "imported tasks");
    Ok(report)
}

/// Write `tasks` to a CSV file.
pub fn export_file(tasks: &[Task], path: &Path) -> Result<(), StoreError> {
    fs::write(path, to_csv(tasks)).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Read tasks from a CSV file.
pub fn import_file(path: &Path) -> Result<(Vec<Task>, ImportReport), CoreError> {
    let content = fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(from_csv(&content)?)
}

fn escape(s: &str) -> String {
    let padded = s.starts_with(char::is_whitespace) || s.ends_with(char::is_whitespace);
    if padded || s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Split CSV text into records, honouring quoted fields that span lines.
fn split_records(content: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            '\r' if !in_quotes => {}
            '\n' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
                records.push(std::mem::take(&mut fields));
            }
            _ => current.push(ch),
        }
    }
    if !current.is_empty() || !fields.is_empty() {
        fields.push(current);
        records.push(fields);
    }
    records.retain(|r| !(r.len() == 1 && r[0].trim().is_empty()));
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Vec<Task> {
        let mut done = Task::new("Buy milk, eggs", Priority::Low);
        done.completed = true;
        vec![
            Task::new("Say \"hi\"", Priority::High)
                .with_deadline(NaiveDate::from_ymd_opt(2024, 12, 25).unwrap()),
            done,
        ]
    }

    #[test]
    fn export_writes_header_and_sentinel() {
        let csv = to_csv(&sample());
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("ID,Description,Completed,Priority,Deadline"));
        assert_eq!(lines.next(), Some("1,\"Say \"\"hi\"\"\",False,high,25/12/2024"));
        assert_eq!(lines.next(), Some("2,\"Buy milk, eggs\",True,low,no date"));
    }

    #[test]
    fn round_trip_preserves_fields() {
        let tasks = sample();
        let (back, report) = from_csv(&to_csv(&tasks)).unwrap();
        assert_eq!(report, ImportReport { imported: 2, skipped: 0 });
        assert_eq!(back, tasks);
    }

    #[test]
    fn surrounding_whitespace_survives_round_trip() {
        let tasks = vec![
            Task::new(" indented", Priority::Medium),
            Task::new("trailing\t", Priority::Low),
        ];
        let csv = to_csv(&tasks);
        assert!(csv.contains("1,\" indented\",False,medium,no date"));

        let (back, report) = from_csv(&csv).unwrap();
        assert_eq!(report.skipped, 0);
        assert_eq!(back, tasks);
    }

    #[test]
    fn blank_description_is_skipped() {
        let (tasks, report) = from_csv("Description,Completed,Priority\n\"   \",False,low\n").unwrap();
        assert!(tasks.is_empty());
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn columns_are_matched_by_name() {
        let csv = "Priority,Deadline,Description,Completed\nmedium,no date,Reordered,True\n";
        let (tasks, _) = from_csv(csv).unwrap();
        assert_eq!(tasks[0].description, "Reordered");
        assert_eq!(tasks[0].priority, Priority::Medium);
        assert!(tasks[0].completed);
        assert_eq!(tasks[0].deadline, None);
    }

    #[test]
    fn completed_requires_exact_true() {
        let csv = "Description,Completed,Priority\na,true,low\nb,TRUE,low\nc,True,low\n";
        let (tasks, _) = from_csv(csv).unwrap();
        let flags: Vec<bool> = tasks.iter().map(|t| t.completed).collect();
        assert_eq!(flags, [false, false, true]);
    }

    #[test]
    fn legacy_spanish_file_imports() {
        let csv = "ID,Descripción,Estado,Prioridad,Fecha Límite\n\
                   1,Informe,False,alta,25/12/2024\n\
                   2,Compras,True,baja,Sin fecha\n";
        let (tasks, report) = from_csv(csv).unwrap();
        assert_eq!(report.imported, 2);
        assert_eq!(tasks[0].priority, Priority::High);
        assert!(tasks[0].deadline.is_some());
        assert_eq!(tasks[1].deadline, None);
    }

    #[test]
    fn bad_rows_are_skipped() {
        let csv = "Description,Completed,Priority,Deadline\n\
                   ,False,low,no date\n\
                   Odd,False,N/A,no date\n\
                   Fine,False,low,99/99/2024\n";
        let (tasks, report) = from_csv(csv).unwrap();
        assert_eq!(report, ImportReport { imported: 1, skipped: 2 });
        assert_eq!(tasks[0].description, "Fine");
        assert_eq!(tasks[0].deadline, None);
    }

    #[test]
    fn missing_required_column_is_an_error() {
        assert!(matches!(
            from_csv("ID,Description\n1,x\n"),
            Err(StoreError::MissingColumn("Completed"))
        ));
    }
}
