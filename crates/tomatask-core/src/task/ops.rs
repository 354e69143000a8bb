//! Validated mutations and queries over the task store.
//!
//! Complete, delete and edit address a task by its 1-based position in a
//! sorted view of the store (see [`View`]); position 0 cancels. Every
//! mutation either applies in full or leaves the store untouched.

use std::str::FromStr;

use chrono::NaiveDate;

use super::ordering::{is_urgent, sort_by_priority_and_deadline};
use super::{parse_deadline, Priority, Task};
use crate::error::TaskError;
use crate::storage::TaskStore;

/// Index of a task inside the store's backing vector.
pub type TaskIndex = usize;

/// Position value that aborts an operation.
pub const CANCEL_POSITION: usize = 0;

/// Ordered selection the caller shows before asking for a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Non-completed tasks in display order.
    Pending,
    /// Every task in display order.
    All,
}

/// Result of an operation that may be cancelled by the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Applied(T),
    Cancelled,
}

impl<T> Outcome<T> {
    pub fn applied(self) -> Option<T> {
        match self {
            Outcome::Applied(v) => Some(v),
            Outcome::Cancelled => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Completed,
    Pending,
    Urgent,
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "todas" => Ok(StatusFilter::All),
            "completed" | "completadas" => Ok(StatusFilter::Completed),
            "pending" | "pendientes" => Ok(StatusFilter::Pending),
            "urgent" | "urgentes" => Ok(StatusFilter::Urgent),
            other => Err(format!("unknown status filter: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeadlineEdit {
    /// Add or replace the deadline (DD/MM/YYYY text, validated before applying).
    Set(String),
    Remove,
}

/// Requested field changes. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdit {
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
    pub deadline: Option<DeadlineEdit>,
}

impl TaskEdit {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.priority.is_none()
            && self.completed.is_none()
            && self.deadline.is_none()
    }
}

impl TaskStore {
    /// Append a new pending task.
    pub fn add(
        &mut self,
        description: &str,
        priority: Priority,
        deadline: Option<&str>,
    ) -> Result<TaskIndex, TaskError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(TaskError::EmptyDescription);
        }
        let deadline = deadline.map(parse_deadline).transpose()?;

        self.tasks.push(Task {
            deadline,
            ..Task::new(description, priority)
        });
        Ok(self.tasks.len() - 1)
    }

    /// Store indices of `view` in display order.
    pub fn view(&self, view: View) -> Vec<TaskIndex> {
        let order = sort_by_priority_and_deadline(&self.tasks);
        match view {
            View::All => order,
            View::Pending => order
                .into_iter()
                .filter(|&i| !self.tasks[i].completed)
                .collect(),
        }
    }

    /// Map a 1-based view position to a store index. `None` means cancelled.
    pub fn resolve(
        &self,
        view: View,
        position: usize,
        action: &'static str,
    ) -> Result<Option<TaskIndex>, TaskError> {
        let order = self.view(view);
        if order.is_empty() {
            return Err(TaskError::EmptyCollection(action));
        }
        if position == CANCEL_POSITION {
            return Ok(None);
        }
        order
            .get(position - 1)
            .copied()
            .map(Some)
            .ok_or(TaskError::NotFound {
                position,
                len: order.len(),
            })
    }

    /// Mark the task at `position` of the pending view as completed.
    pub fn complete(&mut self, position: usize) -> Result<Outcome<TaskIndex>, TaskError> {
        let Some(index) = self.resolve(View::Pending, position, "complete")? else {
            return Ok(Outcome::Cancelled);
        };
        self.tasks[index].completed = true;
        Ok(Outcome::Applied(index))
    }

    /// Remove the task at `position` of the full view, returning it.
    pub fn delete(&mut self, position: usize) -> Result<Outcome<Task>, TaskError> {
        let Some(index) = self.resolve(View::All, position, "delete")? else {
            return Ok(Outcome::Cancelled);
        };
        Ok(Outcome::Applied(self.tasks.remove(index)))
    }

    /// Apply `edit` to the task at `position` of the full view.
    pub fn edit(
        &mut self,
        position: usize,
        edit: TaskEdit,
    ) -> Result<Outcome<TaskIndex>, TaskError> {
        let Some(index) = self.resolve(View::All, position, "edit")? else {
            return Ok(Outcome::Cancelled);
        };
        if edit.is_empty() {
            return Ok(Outcome::Cancelled);
        }

        let description = match edit.description {
            Some(d) if d.trim().is_empty() => return Err(TaskError::EmptyDescription),
            Some(d) => Some(d.trim().to_string()),
            None => None,
        };
        let deadline = match edit.deadline {
            Some(DeadlineEdit::Set(text)) => Some(Some(parse_deadline(&text)?)),
            Some(DeadlineEdit::Remove) => Some(None),
            None => None,
        };

        let task = &mut self.tasks[index];
        if let Some(d) = description {
            task.description = d;
        }
        if let Some(p) = edit.priority {
            task.priority = p;
        }
        if let Some(c) = edit.completed {
            task.completed = c;
        }
        if let Some(d) = deadline {
            task.deadline = d;
        }
        Ok(Outcome::Applied(index))
    }

    /// Tasks matching `filter`, in display order.
    pub fn filter(&self, filter: StatusFilter, today: NaiveDate) -> Vec<&Task> {
        self.view(View::All)
            .into_iter()
            .map(|i| &self.tasks[i])
            .filter(|t| match filter {
                StatusFilter::All => true,
                StatusFilter::Completed => t.completed,
                StatusFilter::Pending => !t.completed,
                StatusFilter::Urgent => is_urgent(t, today),
            })
            .collect()
    }

    /// Case-insensitive substring search over descriptions, in display order.
    pub fn search(&self, query: &str) -> Vec<&Task> {
        let needle = query.to_lowercase();
        self.view(View::All)
            .into_iter()
            .map(|i| &self.tasks[i])
            .filter(|t| t.description.to_lowercase().contains(&needle))
            .collect()
    }

    /// Overwrite the pomodoro counter of the task at `index`.
    pub fn set_pomodoros(&mut self, index: TaskIndex, count: u32) -> Result<(), TaskError> {
        let len = self.tasks.len();
        let task = self.tasks.get_mut(index).ok_or(TaskError::NotFound {
            position: index + 1,
            len,
        })?;
        task.pomodoros_completed = count;
        Ok(())
    }
}
