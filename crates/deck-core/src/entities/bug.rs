use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{BugStatus, Priority};

/// A defect reported by QA. Standalone within a project or linked to a
/// specific task of the same project.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BugReport {
    pub id: String,
    pub project_id: String,
    /// Invariant: the linked task must belong to the same project.
    pub task_id: Option<String>,
    pub reporter_id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: BugStatus,
    pub priority: Priority,
    pub is_resolved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
