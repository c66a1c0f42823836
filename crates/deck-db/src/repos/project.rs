//! Project repository — CRUD, membership, and visibility-filtered listing.

use chrono::{NaiveDate, Utc};

use deck_core::access::Actor;
use deck_core::entities::Project;
use deck_core::enums::{AuditAction, EntityType, ProjectStatus};
use deck_core::ids::PREFIX_PROJECT;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_date, parse_datetime, parse_enum, parse_optional_date, split_member_ids};
use crate::service::{project_visibility_clause, DeckService};
use crate::updates::ProjectUpdate;

const SELECT_COLS: &str = "p.id, p.name, p.description, p.start_date, p.end_date, p.status, \
     p.manager_id, p.created_at, p.updated_at, \
     (SELECT group_concat(user_id) FROM project_members pm WHERE pm.project_id = p.id)";

fn row_to_project(row: &libsql::Row) -> Result<Project, DatabaseError> {
    let end_date = get_opt_string(row, 4)?;
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        description: get_opt_string(row, 2)?,
        start_date: parse_date(&row.get::<String>(3)?)?,
        end_date: parse_optional_date(end_date.as_deref())?,
        status: parse_enum(&row.get::<String>(5)?)?,
        manager_id: row.get(6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        updated_at: parse_datetime(&row.get::<String>(8)?)?,
        member_ids: split_member_ids(row.get::<Option<String>>(9)?),
    })
}

impl DeckService {
    pub async fn create_project(
        &self,
        actor: &Actor,
        name: &str,
        description: Option<&str>,
        start_date: NaiveDate,
        manager_id: Option<&str>,
    ) -> Result<Project, DatabaseError> {
        Self::require_writer(actor)?;

        let manager_id = manager_id.unwrap_or(actor.id.as_str());
        if self.find_user(manager_id).await?.is_none() {
            return Err(DatabaseError::validation(format!(
                "manager user {manager_id} does not exist"
            )));
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_PROJECT).await?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO projects (id, name, description, start_date, end_date, status, manager_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, NULL, ?5, ?6, ?7, ?8)",
                libsql::params![
                    id.as_str(),
                    name,
                    description,
                    start_date.to_string(),
                    ProjectStatus::Active.as_str(),
                    manager_id,
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        self.record_audit(
            Some(actor),
            EntityType::Project,
            &id,
            AuditAction::Created,
            Some(serde_json::json!({ "name": name, "manager_id": manager_id })),
        )
        .await?;

        self.get_project_unchecked(&id).await
    }

    /// Fetch without visibility checks. Worker and internal callers only.
    pub(crate) async fn get_project_unchecked(&self, id: &str) -> Result<Project, DatabaseError> {
        self.find_project(id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("project", id))
    }

    pub(crate) async fn find_project(&self, id: &str) -> Result<Option<Project>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM projects p WHERE p.id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_project(&row)?)),
            None => Ok(None),
        }
    }

    /// Single-project read. Invisible projects read as missing.
    pub async fn get_project(&self, viewer: &Actor, id: &str) -> Result<Project, DatabaseError> {
        self.require_project_access(viewer, id).await?;
        self.get_project_unchecked(id).await
    }

    pub async fn update_project(
        &self,
        actor: &Actor,
        project_id: &str,
        update: ProjectUpdate,
    ) -> Result<Project, DatabaseError> {
        Self::require_writer(actor)?;
        self.require_project_access(actor, project_id).await?;

        if update.is_empty() {
            return self.get_project_unchecked(project_id).await;
        }

        if let Some(ref manager_id) = update.manager_id {
            if self.find_user(manager_id).await?.is_none() {
                return Err(DatabaseError::validation(format!(
                    "manager user {manager_id} does not exist"
                )));
            }
        }

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref name) = update.name {
            sets.push(format!("name = ?{idx}"));
            params.push(name.clone().into());
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
        if let Some(end_date) = update.end_date {
            sets.push(format!("end_date = ?{idx}"));
            params.push(end_date.map_or(libsql::Value::Null, |d| d.to_string().into()));
            idx += 1;
        }
        if let Some(ref manager_id) = update.manager_id {
            sets.push(format!("manager_id = ?{idx}"));
            params.push(manager_id.clone().into());
            idx += 1;
        }

        let now = Utc::now();
        sets.push(format!("updated_at = ?{idx}"));
        params.push(now.to_rfc3339().into());
        idx += 1;

        params.push(project_id.into());
        let sql = format!("UPDATE projects SET {} WHERE id = ?{idx}", sets.join(", "));
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;

        self.record_audit(
            Some(actor),
            EntityType::Project,
            project_id,
            AuditAction::Updated,
            Some(serde_json::to_value(&update).map_err(|e| DatabaseError::Other(e.into()))?),
        )
        .await?;

        self.get_project_unchecked(project_id).await
    }

    pub async fn delete_project(
        &self,
        actor: &Actor,
        project_id: &str,
    ) -> Result<(), DatabaseError> {
        Self::require_writer(actor)?;
        self.require_project_access(actor, project_id).await?;

        self.db()
            .conn()
            .execute("DELETE FROM projects WHERE id = ?1", [project_id])
            .await?;

        self.record_audit(
            Some(actor),
            EntityType::Project,
            project_id,
            AuditAction::Deleted,
            None,
        )
        .await
    }

    pub async fn add_member(
        &self,
        actor: &Actor,
        project_id: &str,
        user_id: &str,
    ) -> Result<Project, DatabaseError> {
        Self::require_writer(actor)?;
        self.require_project_access(actor, project_id).await?;
        if self.find_user(user_id).await?.is_none() {
            return Err(DatabaseError::not_found("user", user_id));
        }

        self.db()
            .conn()
            .execute(
                "INSERT OR IGNORE INTO project_members (project_id, user_id) VALUES (?1, ?2)",
                libsql::params![project_id, user_id],
            )
            .await?;

        self.record_audit(
            Some(actor),
            EntityType::Project,
            project_id,
            AuditAction::Updated,
            Some(serde_json::json!({ "member_added": user_id })),
        )
        .await?;

        self.get_project_unchecked(project_id).await
    }

    pub async fn remove_member(
        &self,
        actor: &Actor,
        project_id: &str,
        user_id: &str,
    ) -> Result<Project, DatabaseError> {
        Self::require_writer(actor)?;
        self.require_project_access(actor, project_id).await?;

        self.db()
            .conn()
            .execute(
                "DELETE FROM project_members WHERE project_id = ?1 AND user_id = ?2",
                libsql::params![project_id, user_id],
            )
            .await?;

        self.record_audit(
            Some(actor),
            EntityType::Project,
            project_id,
            AuditAction::Updated,
            Some(serde_json::json!({ "member_removed": user_id })),
        )
        .await?;

        self.get_project_unchecked(project_id).await
    }

    /// List projects the viewer manages or is a member of (all of them for
    /// elevated viewers), newest first.
    pub async fn list_projects(
        &self,
        viewer: &Actor,
        status: Option<ProjectStatus>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Project>, DatabaseError> {
        let mut sql = format!(
            "SELECT {SELECT_COLS} FROM projects p WHERE {}",
            project_visibility_clause("p.id")
        );
        let mut params: Vec<libsql::Value> = vec![
            i64::from(viewer.is_elevated()).into(),
            viewer.id.clone().into(),
        ];
        let mut idx = 3usize;

        if let Some(status) = status {
            sql.push_str(&format!(" AND p.status = ?{idx}"));
            params.push(status.as_str().into());
            idx += 1;
        }

        sql.push_str(&format!(
            " ORDER BY p.created_at DESC LIMIT ?{idx} OFFSET ?{}",
            idx + 1
        ));
        params.push(i64::from(limit).into());
        params.push(i64::from(offset).into());

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next().await? {
            projects.push(row_to_project(&row)?);
        }
        Ok(projects)
    }
}
