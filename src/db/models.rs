//! Domain models for the todo database.
//!
//! These models are storage-agnostic and represent the core entities
//! used throughout the application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Auto-assigned integer ID used for all entities.
pub type Id = i64;

/// Color given to a category created without one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#007bff";

/// A label grouping todos, rendered with its color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Id,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The slice of a category joined onto a todo when it is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: Id,
    pub name: String,
    pub color: String,
}

/// Priority of a todo.
///
/// Stored and serialized as its integer value (1, 2 or 3).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub enum Priority {
    #[default]
    Low = 1,
    Medium = 2,
    High = 3,
}

impl Priority {
    /// Map any integer onto a priority, treating out-of-range values as `Low`.
    pub fn clamped(value: i64) -> Self {
        Self::try_from(value).unwrap_or_default()
    }

    pub fn as_i64(self) -> i64 {
        self as i64
    }
}

impl TryFrom<i64> for Priority {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Priority::Low),
            2 => Ok(Priority::Medium),
            3 => Ok(Priority::High),
            _ => Err(format!(
                "Priority must be between 1 (low) and 3 (high), got {}",
                value
            )),
        }
    }
}

impl From<Priority> for i64 {
    fn from(p: Priority) -> Self {
        p.as_i64()
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

/// Where a todo falls when ordering by how pressing its due date is.
///
/// Variants are declared in the order todos are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyBucket {
    Overdue,
    Upcoming,
    Undated,
}

impl UrgencyBucket {
    pub fn of(due_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        match due_date {
            None => UrgencyBucket::Undated,
            Some(due) if due < now => UrgencyBucket::Overdue,
            Some(_) => UrgencyBucket::Upcoming,
        }
    }
}

impl std::fmt::Display for UrgencyBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UrgencyBucket::Overdue => write!(f, "overdue"),
            UrgencyBucket::Upcoming => write!(f, "upcoming"),
            UrgencyBucket::Undated => write!(f, "undated"),
        }
    }
}

/// A single item to get done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: Id,
    pub title: String,
    pub description: String,
    pub category_id: Option<Id>,
    /// Joined from `categories` on read, never stored on the todo row.
    pub category: Option<CategorySummary>,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a todo.
///
/// `priority` is the raw integer; the store clamps it into range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
    pub category_id: Option<Id>,
    pub priority: i64,
    pub due_date: Option<DateTime<Utc>>,
}

impl NewTodo {
    /// A todo with only a title; everything else takes its default.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            category_id: None,
            priority: Priority::default().as_i64(),
            due_date: None,
        }
    }
}

/// Fields written by a todo update.
///
/// Everything except `priority` overwrites the stored value; a `None`
/// priority leaves the stored one untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoUpdate {
    pub title: String,
    pub description: String,
    pub category_id: Option<Id>,
    pub priority: Option<i64>,
    pub due_date: Option<DateTime<Utc>>,
}
