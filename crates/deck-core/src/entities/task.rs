use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Priority, TaskStatus};

/// Valid story point values (Fibonacci scale for agile estimation).
pub const STORY_POINTS: [u32; 7] = [1, 2, 3, 5, 8, 13, 21];

/// A unit of work. Optionally grouped into a sprint of the same project
/// and assigned to a user.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub project_id: String,
    /// Invariant: the sprint must belong to the same project as the task.
    pub sprint_id: Option<String>,
    pub assignee_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    /// Effort estimate, constrained to [`STORY_POINTS`].
    pub story_points: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
