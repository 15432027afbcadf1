//! Todo domain model.
//!
//! # Responsibility
//! - Define the canonical todo record persisted under the todos key.
//! - Validate scheduling metadata before persistence.
//!
//! # Invariants
//! - `id` is stable and never reused for another todo.
//! - `text` is non-blank after trim.
//! - `parent_id`, when set, references a todo in the same routine.

use super::routine::RoutineId;
use super::schedule::{DateRange, RepeatSettings, Schedule};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a todo.
pub type TodoId = Uuid;

/// Eisenhower matrix quadrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Do first.
    UrgentImportant,
    /// Schedule.
    NotUrgentImportant,
    /// Delegate.
    UrgentNotImportant,
    /// Drop.
    NotUrgentNotImportant,
}

impl Priority {
    pub fn is_urgent(self) -> bool {
        matches!(self, Self::UrgentImportant | Self::UrgentNotImportant)
    }

    pub fn is_important(self) -> bool {
        matches!(self, Self::UrgentImportant | Self::NotUrgentImportant)
    }
}

/// Canonical todo record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    /// Owning routine. `None` means uncategorized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routine_id: Option<RoutineId>,
    /// Parent todo for sub-todos.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<TodoId>,
    /// Local wall-clock due time.
    ///
    /// Offset timestamps such as `2024-04-09T06:00:00.000Z` are converted to
    /// local time on read. Writes use the naive form.
    #[serde(
        default,
        deserialize_with = "deserialize_due_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_settings: Option<RepeatSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl Todo {
    /// Creates an open todo with a generated id and no scheduling metadata.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), text)
    }

    /// Creates a todo with a caller-provided id.
    ///
    /// Used by import paths and tests where identity already exists.
    pub fn with_id(id: TodoId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
            created_at: Utc::now(),
            routine_id: None,
            parent_id: None,
            due_date: None,
            date_range: None,
            repeat_settings: None,
            priority: None,
        }
    }

    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }

    /// Returns the displayed schedule, if any.
    pub fn schedule(&self) -> Option<Schedule<'_>> {
        if let Some(due) = self.due_date {
            return Some(Schedule::Due(due));
        }
        if let Some(range) = self.date_range.as_ref() {
            return Some(Schedule::Range(range));
        }
        self.repeat_settings.as_ref().map(Schedule::Repeat)
    }

    /// Returns whether the due date falls on `day`.
    pub fn is_due_on(&self, day: NaiveDate) -> bool {
        self.due_date.map_or(false, |due| due.date() == day)
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        if self.text.trim().is_empty() {
            return Err(TodoValidationError::BlankText);
        }
        if self.parent_id == Some(self.id) {
            return Err(TodoValidationError::SelfParent(self.id));
        }
        if let Some(range) = self.date_range {
            if !range.is_ordered() {
                return Err(TodoValidationError::ReversedDateRange {
                    start: range.start_date,
                    end: range.end_date,
                });
            }
        }
        if let Some(settings) = self.repeat_settings {
            if let Some(end) = settings.end_date.filter(|_| !settings.is_ordered()) {
                return Err(TodoValidationError::ReversedRepeatWindow {
                    start: settings.start_date,
                    end,
                });
            }
        }
        Ok(())
    }
}

/// Parses a stored due date into local wall-clock time.
///
/// Accepts RFC 3339 timestamps with an offset and naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]` values.
pub fn parse_due_date(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(stamped) => Ok(stamped.with_timezone(&Local).naive_local()),
        Err(_) => raw.parse::<NaiveDateTime>(),
    }
}

fn deserialize_due_date<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_due_date(&raw).map_err(serde::de::Error::custom))
        .transpose()
}

/// Record-level validation failures for `Todo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    BlankText,
    SelfParent(TodoId),
    ReversedDateRange { start: NaiveDate, end: NaiveDate },
    ReversedRepeatWindow { start: NaiveDate, end: NaiveDate },
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankText => write!(f, "todo text must not be blank"),
            Self::SelfParent(id) => write!(f, "todo {id} cannot be its own parent"),
            Self::ReversedDateRange { start, end } => {
                write!(f, "date range end {end} is earlier than start {start}")
            }
            Self::ReversedRepeatWindow { start, end } => {
                write!(f, "repeat end {end} is earlier than start {start}")
            }
        }
    }
}

impl Error for TodoValidationError {}
