//! Task repository — CRUD with story-point and sprint-project validation.

use chrono::Utc;

use deck_core::access::Actor;
use deck_core::entities::{Task, STORY_POINTS};
use deck_core::enums::{AuditAction, EntityType, Priority, TaskStatus};
use deck_core::ids::PREFIX_TASK;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum};
use crate::service::{project_visibility_clause, DeckService};
use crate::updates::TaskUpdate;

const SELECT_COLS: &str = "t.id, t.project_id, t.sprint_id, t.assignee_id, t.title, \
     t.description, t.status, t.priority, t.story_points, t.created_at, t.updated_at";

/// Optional list filters, all AND-combined.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub project_id: Option<String>,
    pub sprint_id: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assignee_id: Option<String>,
    /// Case-insensitive substring match over title and description.
    pub search: Option<String>,
}

pub(crate) fn row_to_task(row: &libsql::Row) -> Result<Task, DatabaseError> {
    Ok(Task {
        id: row.get(0)?,
        project_id: row.get(1)?,
        sprint_id: get_opt_string(row, 2)?,
        assignee_id: get_opt_string(row, 3)?,
        title: row.get(4)?,
        description: get_opt_string(row, 5)?,
        status: parse_enum(&row.get::<String>(6)?)?,
        priority: parse_enum(&row.get::<String>(7)?)?,
        story_points: u32::try_from(row.get::<i64>(8)?)
            .map_err(|_| DatabaseError::validation("story_points out of range"))?,
        created_at: parse_datetime(&row.get::<String>(9)?)?,
        updated_at: parse_datetime(&row.get::<String>(10)?)?,
    })
}

fn validate_story_points(story_points: u32) -> Result<(), DatabaseError> {
    if STORY_POINTS.contains(&story_points) {
        Ok(())
    } else {
        Err(DatabaseError::validation(format!(
            "story_points must be one of {STORY_POINTS:?}, got {story_points}"
        )))
    }
}

impl DeckService {
    /// The sprint a task joins must belong to the task's own project.
    async fn require_sprint_in_project(
        &self,
        sprint_id: &str,
        project_id: &str,
    ) -> Result<(), DatabaseError> {
        let sprint = self
            .find_sprint(sprint_id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("sprint", sprint_id))?;
        if sprint.project_id != project_id {
            return Err(DatabaseError::validation(format!(
                "sprint {sprint_id} belongs to a different project"
            )));
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_task(
        &self,
        actor: &Actor,
        project_id: &str,
        title: &str,
        description: Option<&str>,
        priority: Priority,
        story_points: u32,
        sprint_id: Option<&str>,
        assignee_id: Option<&str>,
    ) -> Result<Task, DatabaseError> {
        Self::require_writer(actor)?;
        self.require_project_access(actor, project_id).await?;
        validate_story_points(story_points)?;

        if let Some(sprint_id) = sprint_id {
            self.require_sprint_in_project(sprint_id, project_id)
                .await?;
        }
        if let Some(assignee_id) = assignee_id {
            if self.find_user(assignee_id).await?.is_none() {
                return Err(DatabaseError::not_found("user", assignee_id));
            }
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_TASK).await?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO tasks (id, project_id, sprint_id, assignee_id, title, description,
                                    status, priority, story_points, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                libsql::params![
                    id.as_str(),
                    project_id,
                    sprint_id,
                    assignee_id,
                    title,
                    description,
                    TaskStatus::New.as_str(),
                    priority.as_str(),
                    i64::from(story_points),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        self.record_audit(
            Some(actor),
            EntityType::Task,
            &id,
            AuditAction::Created,
            Some(serde_json::json!({ "project_id": project_id, "title": title })),
        )
        .await?;

        Ok(Task {
            id,
            project_id: project_id.to_string(),
            sprint_id: sprint_id.map(String::from),
            assignee_id: assignee_id.map(String::from),
            title: title.to_string(),
            description: description.map(String::from),
            status: TaskStatus::New,
            priority,
            story_points,
            created_at: now,
            updated_at: now,
        })
    }

    pub(crate) async fn find_task(&self, id: &str) -> Result<Option<Task>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM tasks t WHERE t.id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_task(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_task(&self, viewer: &Actor, id: &str) -> Result<Task, DatabaseError> {
        let task = self
            .find_task(id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("task", id))?;
        if self.project_visible(viewer, &task.project_id).await? {
            Ok(task)
        } else {
            Err(DatabaseError::not_found("task", id))
        }
    }

    pub async fn update_task(
        &self,
        actor: &Actor,
        task_id: &str,
        update: TaskUpdate,
    ) -> Result<Task, DatabaseError> {
        Self::require_writer(actor)?;
        let current = self.get_task(actor, task_id).await?;

        if update.is_empty() {
            return Ok(current);
        }

        if let Some(story_points) = update.story_points {
            validate_story_points(story_points)?;
        }
        if let Some(Some(ref sprint_id)) = update.sprint_id {
            self.require_sprint_in_project(sprint_id, &current.project_id)
                .await?;
        }
        if let Some(Some(ref assignee_id)) = update.assignee_id {
            if self.find_user(assignee_id).await?.is_none() {
                return Err(DatabaseError::not_found("user", assignee_id));
            }
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
        if let Some(story_points) = update.story_points {
            sets.push(format!("story_points = ?{idx}"));
            params.push(i64::from(story_points).into());
            idx += 1;
        }
        if let Some(ref sprint_id) = update.sprint_id {
            sets.push(format!("sprint_id = ?{idx}"));
            params.push(sprint_id.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }
        if let Some(ref assignee_id) = update.assignee_id {
            sets.push(format!("assignee_id = ?{idx}"));
            params.push(assignee_id.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }

        let now = Utc::now();
        sets.push(format!("updated_at = ?{idx}"));
        params.push(now.to_rfc3339().into());
        idx += 1;

        params.push(task_id.into());
        let sql = format!("UPDATE tasks SET {} WHERE id = ?{idx}", sets.join(", "));
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;

        self.record_audit(
            Some(actor),
            EntityType::Task,
            task_id,
            AuditAction::Updated,
            Some(serde_json::to_value(&update).map_err(|e| DatabaseError::Other(e.into()))?),
        )
        .await?;

        self.get_task(actor, task_id).await
    }

    pub async fn delete_task(&self, actor: &Actor, task_id: &str) -> Result<(), DatabaseError> {
        Self::require_writer(actor)?;
        self.get_task(actor, task_id).await?;

        self.db()
            .conn()
            .execute("DELETE FROM tasks WHERE id = ?1", [task_id])
            .await?;

        self.record_audit(
            Some(actor),
            EntityType::Task,
            task_id,
            AuditAction::Deleted,
            None,
        )
        .await
    }

    pub async fn list_tasks(
        &self,
        viewer: &Actor,
        filter: &TaskFilter,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Task>, DatabaseError> {
        let mut sql = format!(
            "SELECT {SELECT_COLS} FROM tasks t WHERE {}",
            project_visibility_clause("t.project_id")
        );
        let mut params: Vec<libsql::Value> = vec![
            i64::from(viewer.is_elevated()).into(),
            viewer.id.clone().into(),
        ];
        let mut idx = 3usize;

        if let Some(ref project_id) = filter.project_id {
            sql.push_str(&format!(" AND t.project_id = ?{idx}"));
            params.push(project_id.clone().into());
            idx += 1;
        }
        if let Some(ref sprint_id) = filter.sprint_id {
            sql.push_str(&format!(" AND t.sprint_id = ?{idx}"));
            params.push(sprint_id.clone().into());
            idx += 1;
        }
        if let Some(status) = filter.status {
            sql.push_str(&format!(" AND t.status = ?{idx}"));
            params.push(status.as_str().into());
            idx += 1;
        }
        if let Some(priority) = filter.priority {
            sql.push_str(&format!(" AND t.priority = ?{idx}"));
            params.push(priority.as_str().into());
            idx += 1;
        }
        if let Some(ref assignee_id) = filter.assignee_id {
            sql.push_str(&format!(" AND t.assignee_id = ?{idx}"));
            params.push(assignee_id.clone().into());
            idx += 1;
        }
        if let Some(ref search) = filter.search {
            sql.push_str(&format!(
                " AND (t.title LIKE ?{idx} OR t.description LIKE ?{idx})"
            ));
            params.push(format!("%{search}%").into());
            idx += 1;
        }

        sql.push_str(&format!(
            " ORDER BY t.created_at DESC LIMIT ?{idx} OFFSET ?{}",
            idx + 1
        ));
        params.push(i64::from(limit).into());
        params.push(i64::from(offset).into());

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next().await? {
            tasks.push(row_to_task(&row)?);
        }
        Ok(tasks)
    }
}
