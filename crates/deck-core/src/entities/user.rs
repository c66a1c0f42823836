use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Role;

/// A user of the system. Role is fixed per acting context; the acting
/// user is always passed explicitly to access-controlled operations.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub role: Role,
    /// Superusers bypass row-level filtering like admins do.
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
}
