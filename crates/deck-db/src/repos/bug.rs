//! Bug report repository — creation, triage updates, and listing.

use chrono::Utc;

use deck_core::access::Actor;
use deck_core::entities::BugReport;
use deck_core::enums::{AuditAction, BugStatus, EntityType, Priority};
use deck_core::ids::PREFIX_BUG;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum};
use crate::service::{project_visibility_clause, DeckService};
use crate::updates::BugUpdate;

const SELECT_COLS: &str = "b.id, b.project_id, b.task_id, b.reporter_id, b.title, \
     b.description, b.status, b.priority, b.is_resolved, b.created_at, b.updated_at";

/// Optional list filters, all AND-combined.
#[derive(Debug, Clone, Default)]
pub struct BugFilter {
    pub project_id: Option<String>,
    pub status: Option<BugStatus>,
    pub priority: Option<Priority>,
    pub is_resolved: Option<bool>,
    pub reporter_id: Option<String>,
    /// Case-insensitive substring match over title and description.
    pub search: Option<String>,
}

pub(crate) fn row_to_bug(row: &libsql::Row) -> Result<BugReport, DatabaseError> {
    Ok(BugReport {
        id: row.get(0)?,
        project_id: row.get(1)?,
        task_id: get_opt_string(row, 2)?,
        reporter_id: row.get(3)?,
        title: row.get(4)?,
        description: get_opt_string(row, 5)?,
        status: parse_enum(&row.get::<String>(6)?)?,
        priority: parse_enum(&row.get::<String>(7)?)?,
        is_resolved: row.get::<i64>(8)? != 0,
        created_at: parse_datetime(&row.get::<String>(9)?)?,
        updated_at: parse_datetime(&row.get::<String>(10)?)?,
    })
}

impl DeckService {
    /// A linked task must belong to the bug's own project.
    async fn require_task_in_project(
        &self,
        task_id: &str,
        project_id: &str,
    ) -> Result<(), DatabaseError> {
        let task = self
            .find_task(task_id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("task", task_id))?;
        if task.project_id != project_id {
            return Err(DatabaseError::validation(format!(
                "task {task_id} belongs to a different project"
            )));
        }
        Ok(())
    }

    pub async fn create_bug(
        &self,
        actor: &Actor,
        project_id: &str,
        title: &str,
        description: Option<&str>,
        priority: Priority,
        task_id: Option<&str>,
    ) -> Result<BugReport, DatabaseError> {
        Self::require_writer(actor)?;
        self.require_project_access(actor, project_id).await?;

        if let Some(task_id) = task_id {
            self.require_task_in_project(task_id, project_id).await?;
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_BUG).await?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO bug_reports (id, project_id, task_id, reporter_id, title, description,
                                          status, priority, is_resolved, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0, ?9, ?10)",
                libsql::params![
                    id.as_str(),
                    project_id,
                    task_id,
                    actor.id.as_str(),
                    title,
                    description,
                    BugStatus::New.as_str(),
                    priority.as_str(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        self.record_audit(
            Some(actor),
            EntityType::Bug,
            &id,
            AuditAction::Created,
            Some(serde_json::json!({ "project_id": project_id, "title": title })),
        )
        .await?;

        Ok(BugReport {
            id,
            project_id: project_id.to_string(),
            task_id: task_id.map(String::from),
            reporter_id: actor.id.clone(),
            title: title.to_string(),
            description: description.map(String::from),
            status: BugStatus::New,
            priority,
            is_resolved: false,
            created_at: now,
            updated_at: now,
        })
    }

    pub(crate) async fn find_bug(&self, id: &str) -> Result<Option<BugReport>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM bug_reports b WHERE b.id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_bug(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_bug(&self, viewer: &Actor, id: &str) -> Result<BugReport, DatabaseError> {
        let bug = self
            .find_bug(id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("bug report", id))?;
        if self.project_visible(viewer, &bug.project_id).await? {
            Ok(bug)
        } else {
            Err(DatabaseError::not_found("bug report", id))
        }
    }

    pub async fn update_bug(
        &self,
        actor: &Actor,
        bug_id: &str,
        update: BugUpdate,
    ) -> Result<BugReport, DatabaseError> {
        Self::require_writer(actor)?;
        let current = self.get_bug(actor, bug_id).await?;

        if update.is_empty() {
            return Ok(current);
        }

        if let Some(Some(ref task_id)) = update.task_id {
            self.require_task_in_project(task_id, &current.project_id)
                .await?;
        }

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref title) = update.title {
            sets.push(format!("title = ?{idx}"));
            params.push(title.clone().into());
            idx += 1;
        }
        if let Some(ref description) = update.description {
            sets.push(format!("description = ?{idx}"));
            params.push(description.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }
        if let Some(status) = update.status {
            sets.push(format!("status = ?{idx}"));
            params.push(status.as_str().into());
            idx += 1;
        }
        if let Some(priority) = update.priority {
            sets.push(format!("priority = ?{idx}"));
            params.push(priority.as_str().into());
            idx += 1;
        }
        if let Some(ref task_id) = update.task_id {
            sets.push(format!("task_id = ?{idx}"));
            params.push(task_id.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }
        if let Some(is_resolved) = update.is_resolved {
            sets.push(format!("is_resolved = ?{idx}"));
            params.push(i64::from(is_resolved).into());
            idx += 1;
        }

        let now = Utc::now();
        sets.push(format!("updated_at = ?{idx}"));
        params.push(now.to_rfc3339().into());
        idx += 1;

        params.push(bug_id.into());
        let sql = format!(
            "UPDATE bug_reports SET {} WHERE id = ?{idx}",
            sets.join(", ")
        );
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;

        self.record_audit(
            Some(actor),
            EntityType::Bug,
            bug_id,
            AuditAction::Updated,
            Some(serde_json::to_value(&update).map_err(|e| DatabaseError::Other(e.into()))?),
        )
        .await?;

        self.get_bug(actor, bug_id).await
    }

    pub async fn delete_bug(&self, actor: &Actor, bug_id: &str) -> Result<(), DatabaseError> {
        Self::require_writer(actor)?;
        self.get_bug(actor, bug_id).await?;

        self.db()
            .conn()
            .execute("DELETE FROM bug_reports WHERE id = ?1", [bug_id])
            .await?;

        self.record_audit(
            Some(actor),
            EntityType::Bug,
            bug_id,
            AuditAction::Deleted,
            None,
        )
        .await
    }

    pub async fn list_bugs(
        &self,
        viewer: &Actor,
        filter: &BugFilter,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<BugReport>, DatabaseError> {
        let mut sql = format!(
            "SELECT {SELECT_COLS} FROM bug_reports b WHERE {}",
            project_visibility_clause("b.project_id")
        );
        let mut params: Vec<libsql::Value> = vec![
            i64::from(viewer.is_elevated()).into(),
            viewer.id.clone().into(),
        ];
        let mut idx = 3usize;

        if let Some(ref project_id) = filter.project_id {
            sql.push_str(&format!(" AND b.project_id = ?{idx}"));
            params.push(project_id.clone().into());
            idx += 1;
        }
        if let Some(status) = filter.status {
            sql.push_str(&format!(" AND b.status = ?{idx}"));
            params.push(status.as_str().into());
            idx += 1;
        }
        if let Some(priority) = filter.priority {
            sql.push_str(&format!(" AND b.priority = ?{idx}"));
            params.push(priority.as_str().into());
            idx += 1;
        }
        if let Some(is_resolved) = filter.is_resolved {
            sql.push_str(&format!(" AND b.is_resolved = ?{idx}"));
            params.push(i64::from(is_resolved).into());
            idx += 1;
        }
        if let Some(ref reporter_id) = filter.reporter_id {
            sql.push_str(&format!(" AND b.reporter_id = ?{idx}"));
            params.push(reporter_id.clone().into());
            idx += 1;
        }
        if let Some(ref search) = filter.search {
            sql.push_str(&format!(
                " AND (b.title LIKE ?{idx} OR b.description LIKE ?{idx})"
            ));
            params.push(format!("%{search}%").into());
            idx += 1;
        }

        sql.push_str(&format!(
            " ORDER BY b.created_at DESC LIMIT ?{idx} OFFSET ?{}",
            idx + 1
        ));
        params.push(i64::from(limit).into());
        params.push(i64::from(offset).into());

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut bugs = Vec::new();
        while let Some(row) = rows.next().await? {
            bugs.push(row_to_bug(&row)?);
        }
        Ok(bugs)
    }
}
