//! Cross-cutting error types for Sprintdeck.
//!
//! This module defines errors that can originate from any crate in the
//! system. Domain-specific errors (e.g., `DatabaseError`, `ConfigError`)
//! are defined in their respective crates and converge at the CLI boundary.

use thiserror::Error;

/// Errors that can be raised by any Sprintdeck crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Data failed validation (dates, cross-project links, story points).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The acting user is not allowed to perform the operation.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
