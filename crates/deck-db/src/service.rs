//! Service layer orchestrating database access with permission gating.
//!
//! `DeckService` wraps `DeckDb` and hosts all repository methods
//! (`impl DeckService` blocks in `repos/`). Every mutation follows the
//! same protocol:
//! 1. Check write permission for the acting user (before any computation)
//! 2. Check row-level access to the target project
//! 3. Validate domain invariants
//! 4. Execute SQL
//! 5. Append an audit entry

use deck_core::access::{self, Actor};
use deck_core::enums::{AuditAction, EntityType};
use deck_core::errors::CoreError;
use deck_core::ids::PREFIX_AUDIT;

use crate::error::DatabaseError;
use crate::jobs::ReportQueue;
use crate::DeckDb;

/// Orchestrates database access with permission gating and audit trail.
pub struct DeckService {
    db: DeckDb,
    report_queue: Option<ReportQueue>,
}

impl DeckService {
    /// Create a new service wrapping a local database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = DeckDb::open_local(db_path).await?;
        Ok(Self::from_db(db))
    }

    /// Create from an existing `DeckDb`.
    #[must_use]
    pub const fn from_db(db: DeckDb) -> Self {
        Self {
            db,
            report_queue: None,
        }
    }

    /// Attach the report job queue so report creation can enqueue jobs.
    pub fn set_report_queue(&mut self, queue: ReportQueue) {
        self.report_queue = Some(queue);
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &DeckDb {
        &self.db
    }

    /// The attached report queue, if any.
    #[must_use]
    pub const fn report_queue(&self) -> Option<&ReportQueue> {
        self.report_queue.as_ref()
    }

    /// Reject actors whose role may not create/update/delete records.
    pub(crate) fn require_writer(actor: &Actor) -> Result<(), DatabaseError> {
        if access::can_write(Some(actor)) {
            Ok(())
        } else {
            Err(CoreError::PermissionDenied(format!(
                "role {} may not modify records",
                actor.role
            ))
            .into())
        }
    }

    /// Whether `viewer` can see the given project at all.
    pub(crate) async fn project_visible(
        &self,
        viewer: &Actor,
        project_id: &str,
    ) -> Result<bool, DatabaseError> {
        let clause = project_visibility_clause("p.id");
        let mut rows = self
            .db
            .conn()
            .query(
                &format!("SELECT 1 FROM projects p WHERE p.id = ?3 AND {clause}"),
                libsql::params![
                    i64::from(viewer.is_elevated()),
                    viewer.id.as_str(),
                    project_id
                ],
            )
            .await?;
        Ok(rows.next().await?.is_some())
    }

    /// Require visibility of a project; invisible projects read as missing
    /// rather than leaking their existence.
    pub(crate) async fn require_project_access(
        &self,
        viewer: &Actor,
        project_id: &str,
    ) -> Result<(), DatabaseError> {
        if self.project_visible(viewer, project_id).await? {
            Ok(())
        } else {
            Err(DatabaseError::not_found("project", project_id))
        }
    }

    /// Append an audit trail entry for a mutation.
    pub(crate) async fn record_audit(
        &self,
        actor: Option<&Actor>,
        entity_type: EntityType,
        entity_id: &str,
        action: AuditAction,
        detail: Option<serde_json::Value>,
    ) -> Result<(), DatabaseError> {
        let id = self.db.generate_id(PREFIX_AUDIT).await?;
        let detail_text = detail
            .map(|d| serde_json::to_string(&d))
            .transpose()
            .map_err(|e| DatabaseError::Other(e.into()))?;

        self.db
            .conn()
            .execute(
                "INSERT INTO audit_trail (id, actor_id, entity_type, entity_id, action, detail, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                libsql::params![
                    id.as_str(),
                    actor.map(|a| a.id.as_str()),
                    entity_type.as_str(),
                    entity_id,
                    action.as_str(),
                    detail_text.as_deref(),
                    chrono::Utc::now().to_rfc3339()
                ],
            )
            .await?;
        Ok(())
    }
}

/// SQL fragment implementing the manager-OR-member visibility predicate.
///
/// `?1` must be bound to 1 when the viewer is elevated (admin/superuser),
/// `?2` to the viewer's user id. `project_col` is the qualified column
/// holding the project id to check (e.g. `p.id`, `t.project_id`).
/// EXISTS subqueries keep the result duplicate-free by construction.
pub(crate) fn project_visibility_clause(project_col: &str) -> String {
    format!(
        "(?1 = 1 OR EXISTS (
            SELECT 1 FROM projects vp
            WHERE vp.id = {project_col}
              AND (vp.manager_id = ?2 OR EXISTS (
                  SELECT 1 FROM project_members vm
                  WHERE vm.project_id = vp.id AND vm.user_id = ?2))))"
    )
}
