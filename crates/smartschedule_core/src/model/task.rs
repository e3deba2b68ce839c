//! Task domain model.
//!
//! # Responsibility
//! - Define the persisted task record and its wire shape.
//! - Validate user-facing input before a task enters the store.
//!
//! # Invariants
//! - `name` is trimmed and never empty.
//! - `category` is trimmed; empty means "uncategorized".
//! - `duration` is finite and `> 0` (hours).
//! - `id` is never blank.
//! - `date` has a four-digit year so it reloads unchanged.

use crate::model::date::is_storable_day;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque task identifier. Generated ids are UUID v4 strings; legacy ids are
/// kept verbatim.
pub type TaskId = String;

/// One planned activity on a calendar day.
///
/// Serialized field names match the persisted blob: `id`, `name`,
/// `category`, `duration` (number) and `date` (`YYYY-MM-DD`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub category: String,
    /// Planned hours.
    pub duration: f64,
    pub date: NaiveDate,
}

/// Rejection reasons for task input.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskValidationError {
    EmptyId,
    EmptyName,
    /// Duration is zero, negative, NaN or infinite.
    InvalidDuration(f64),
    /// Duration text could not be read as a number.
    UnparseableDuration(String),
    /// Year outside `0000..=9999`.
    DateOutOfRange(NaiveDate),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "task id must not be empty"),
            Self::EmptyName => write!(f, "task name must not be empty"),
            Self::InvalidDuration(value) => {
                write!(f, "duration must be a positive number of hours, got {value}")
            }
            Self::UnparseableDuration(raw) => write!(f, "duration `{raw}` is not a number"),
            Self::DateOutOfRange(date) => {
                write!(f, "date {date} is outside the years 0000 to 9999")
            }
        }
    }
}

impl Error for TaskValidationError {}

impl Task {
    /// Builds a validated task with a freshly generated id.
    ///
    /// `name` and `category` are trimmed before validation.
    pub fn new(
        name: &str,
        category: &str,
        duration: f64,
        date: NaiveDate,
    ) -> Result<Self, TaskValidationError> {
        Self::with_id(new_task_id(), name, category, duration, date)
    }

    /// Builds a validated task keeping a caller-provided id.
    ///
    /// Used by the load path where identity already exists in storage.
    pub fn with_id(
        id: impl Into<TaskId>,
        name: &str,
        category: &str,
        duration: f64,
        date: NaiveDate,
    ) -> Result<Self, TaskValidationError> {
        let task = Self {
            id: id.into(),
            name: name.trim().to_string(),
            category: category.trim().to_string(),
            duration,
            date,
        };
        task.validate()?;
        Ok(task)
    }

    /// Checks the model invariants on an existing value.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.trim().is_empty() {
            return Err(TaskValidationError::EmptyId);
        }
        if self.name.trim().is_empty() {
            return Err(TaskValidationError::EmptyName);
        }
        validate_duration(self.duration)?;
        if !is_storable_day(self.date) {
            return Err(TaskValidationError::DateOutOfRange(self.date));
        }
        Ok(())
    }
}

/// Generates a new unique task id.
pub fn new_task_id() -> TaskId {
    Uuid::new_v4().to_string()
}

/// Accepts only finite, strictly positive hour values.
pub fn validate_duration(duration: f64) -> Result<f64, TaskValidationError> {
    if duration.is_finite() && duration > 0.0 {
        Ok(duration)
    } else {
        Err(TaskValidationError::InvalidDuration(duration))
    }
}

/// Reads duration text typed into a form field.
///
/// Blank input reads as `0` and is therefore rejected as non-positive.
pub fn parse_duration(raw: &str) -> Result<f64, TaskValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::InvalidDuration(0.0));
    }
    let value = trimmed
        .parse::<f64>()
        .map_err(|_| TaskValidationError::UnparseableDuration(trimmed.to_string()))?;
    validate_duration(value)
}
