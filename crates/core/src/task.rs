//! Task entity model and DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{EntityId, Timestamp};

/// Workflow status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Blocked,
}

/// Priority of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

/// A task document from the `tasks` collection.
///
/// `project_id` is fixed at creation; every task references exactly one
/// live project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: EntityId,
    pub project_id: EntityId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new task. The parent project id travels in the URL,
/// not the body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTask {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    pub description: Option<String>,
    /// Defaults to `pending` if omitted.
    pub status: Option<TaskStatus>,
    /// Defaults to `medium` if omitted.
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Timestamp>,
}

/// DTO for updating an existing task. All fields are optional; `None`
/// leaves the stored value untouched. `project_id` is immutable.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTask {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Timestamp>,
}

/// Everything the store needs to materialize a new task document.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub project_id: EntityId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<Timestamp>,
}
