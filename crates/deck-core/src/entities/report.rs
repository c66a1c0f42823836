use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ReportType;

/// A requested project report. Created empty and not ready, populated
/// exactly once by the report worker, immutable thereafter. A refresh is
/// a new report row, never an in-place recompute.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ProjectReport {
    pub id: String,
    pub project_id: String,
    pub generated_by: Option<String>,
    pub report_type: ReportType,
    /// Computed snapshot, `None` until the worker has run.
    pub data: Option<serde_json::Value>,
    pub is_ready: bool,
    pub created_at: DateTime<Utc>,
}
