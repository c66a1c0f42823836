//! Sprint repository — CRUD, completion, and visibility-filtered listing.

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use deck_core::access::Actor;
use deck_core::entities::{BugReport, Sprint, Task};
use deck_core::enums::{AuditAction, EntityType};
use deck_core::ids::PREFIX_SPRINT;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_date};
use crate::service::{project_visibility_clause, DeckService};
use crate::updates::SprintUpdate;

const SELECT_COLS: &str = "s.id, s.project_id, s.name, s.goal, s.start_date, s.end_date, s.is_active";

/// One day of sprint activity: tasks added to the sprint and bugs filed
/// against its project on that day.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineDay {
    pub day: NaiveDate,
    pub tasks: Vec<Task>,
    pub bugs: Vec<BugReport>,
}

pub(crate) fn row_to_sprint(row: &libsql::Row) -> Result<Sprint, DatabaseError> {
    Ok(Sprint {
        id: row.get(0)?,
        project_id: row.get(1)?,
        name: row.get(2)?,
        goal: get_opt_string(row, 3)?,
        start_date: parse_date(&row.get::<String>(4)?)?,
        end_date: parse_date(&row.get::<String>(5)?)?,
        is_active: row.get::<i64>(6)? != 0,
    })
}

fn validate_dates(start_date: NaiveDate, end_date: NaiveDate) -> Result<(), DatabaseError> {
    if end_date < start_date {
        return Err(DatabaseError::validation(
            "sprint end_date must not be before start_date",
        ));
    }
    Ok(())
}

impl DeckService {
    #[allow(clippy::too_many_arguments)]
    pub async fn create_sprint(
        &self,
        actor: &Actor,
        project_id: &str,
        name: &str,
        goal: Option<&str>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        is_active: bool,
    ) -> Result<Sprint, DatabaseError> {
        Self::require_writer(actor)?;
        self.require_project_access(actor, project_id).await?;
        validate_dates(start_date, end_date)?;

        let id = self.db().generate_id(PREFIX_SPRINT).await?;
        self.db()
            .conn()
            .execute(
                "INSERT INTO sprints (id, project_id, name, goal, start_date, end_date, is_active)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                libsql::params![
                    id.as_str(),
                    project_id,
                    name,
                    goal,
                    start_date.to_string(),
                    end_date.to_string(),
                    i64::from(is_active)
                ],
            )
            .await?;

        self.record_audit(
            Some(actor),
            EntityType::Sprint,
            &id,
            AuditAction::Created,
            Some(serde_json::json!({ "project_id": project_id, "name": name })),
        )
        .await?;

        Ok(Sprint {
            id,
            project_id: project_id.to_string(),
            name: name.to_string(),
            goal: goal.map(String::from),
            start_date,
            end_date,
            is_active,
        })
    }

    pub(crate) async fn find_sprint(&self, id: &str) -> Result<Option<Sprint>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM sprints s WHERE s.id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_sprint(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_sprint(&self, viewer: &Actor, id: &str) -> Result<Sprint, DatabaseError> {
        let sprint = self
            .find_sprint(id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("sprint", id))?;
        if self.project_visible(viewer, &sprint.project_id).await? {
            Ok(sprint)
        } else {
            Err(DatabaseError::not_found("sprint", id))
        }
    }

    pub async fn update_sprint(
        &self,
        actor: &Actor,
        sprint_id: &str,
        update: SprintUpdate,
    ) -> Result<Sprint, DatabaseError> {
        Self::require_writer(actor)?;
        let current = self.get_sprint(actor, sprint_id).await?;

        if update.is_empty() {
            return Ok(current);
        }

        // Validate against the dates as they will be after the update.
        let start = update.start_date.unwrap_or(current.start_date);
        let end = update.end_date.unwrap_or(current.end_date);
        validate_dates(start, end)?;

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref name) = update.name {
            sets.push(format!("name = ?{idx}"));
            params.push(name.clone().into());
            idx += 1;
        }
        if let Some(ref goal) = update.goal {
            sets.push(format!("goal = ?{idx}"));
            params.push(goal.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }
        if let Some(start_date) = update.start_date {
            sets.push(format!("start_date = ?{idx}"));
            params.push(start_date.to_string().into());
            idx += 1;
        }
        if let Some(end_date) = update.end_date {
            sets.push(format!("end_date = ?{idx}"));
            params.push(end_date.to_string().into());
            idx += 1;
        }
        if let Some(is_active) = update.is_active {
            sets.push(format!("is_active = ?{idx}"));
            params.push(i64::from(is_active).into());
            idx += 1;
        }

        params.push(sprint_id.into());
        let sql = format!("UPDATE sprints SET {} WHERE id = ?{idx}", sets.join(", "));
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;

        self.record_audit(
            Some(actor),
            EntityType::Sprint,
            sprint_id,
            AuditAction::Updated,
            Some(serde_json::to_value(&update).map_err(|e| DatabaseError::Other(e.into()))?),
        )
        .await?;

        self.get_sprint(actor, sprint_id).await
    }

    pub async fn delete_sprint(&self, actor: &Actor, sprint_id: &str) -> Result<(), DatabaseError> {
        Self::require_writer(actor)?;
        self.get_sprint(actor, sprint_id).await?;

        self.db()
            .conn()
            .execute("DELETE FROM sprints WHERE id = ?1", [sprint_id])
            .await?;

        self.record_audit(
            Some(actor),
            EntityType::Sprint,
            sprint_id,
            AuditAction::Deleted,
            None,
        )
        .await
    }

    /// Close a sprint: move unfinished tasks back to the backlog and clear
    /// the active flag. Returns the sprint and the number of moved tasks.
    pub async fn complete_sprint(
        &self,
        actor: &Actor,
        sprint_id: &str,
    ) -> Result<(Sprint, u64), DatabaseError> {
        Self::require_writer(actor)?;
        self.get_sprint(actor, sprint_id).await?;

        let now = Utc::now();
        let moved = self
            .db()
            .conn()
            .execute(
                "UPDATE tasks SET sprint_id = NULL, updated_at = ?1
                 WHERE sprint_id = ?2 AND status NOT IN ('DONE', 'CLOSED')",
                libsql::params![now.to_rfc3339(), sprint_id],
            )
            .await?;

        self.db()
            .conn()
            .execute(
                "UPDATE sprints SET is_active = 0 WHERE id = ?1",
                [sprint_id],
            )
            .await?;

        self.record_audit(
            Some(actor),
            EntityType::Sprint,
            sprint_id,
            AuditAction::Completed,
            Some(serde_json::json!({ "moved_tasks_count": moved })),
        )
        .await?;

        let sprint = self.get_sprint(actor, sprint_id).await?;
        Ok((sprint, moved))
    }

    /// Day-by-day activity over the sprint window: tasks in the sprint and
    /// bugs filed against its project, grouped by creation day. Days with
    /// no activity are omitted.
    pub async fn sprint_timeline(
        &self,
        viewer: &Actor,
        sprint_id: &str,
    ) -> Result<Vec<TimelineDay>, DatabaseError> {
        let sprint = self.get_sprint(viewer, sprint_id).await?;
        let conn = self.db().conn();

        let mut tasks = Vec::new();
        let mut rows = conn
            .query(
                "SELECT t.id, t.project_id, t.sprint_id, t.assignee_id, t.title, t.description,
                        t.status, t.priority, t.story_points, t.created_at, t.updated_at
                 FROM tasks t WHERE t.sprint_id = ?1 ORDER BY t.created_at",
                [sprint_id],
            )
            .await?;
        while let Some(row) = rows.next().await? {
            tasks.push(super::task::row_to_task(&row)?);
        }

        let mut bugs = Vec::new();
        let mut rows = conn
            .query(
                "SELECT b.id, b.project_id, b.task_id, b.reporter_id, b.title, b.description,
                        b.status, b.priority, b.is_resolved, b.created_at, b.updated_at
                 FROM bug_reports b WHERE b.project_id = ?1 ORDER BY b.created_at",
                [sprint.project_id.as_str()],
            )
            .await?;
        while let Some(row) = rows.next().await? {
            bugs.push(super::bug::row_to_bug(&row)?);
        }

        let mut timeline = Vec::new();
        for day in sprint
            .start_date
            .iter_days()
            .take_while(|day| *day <= sprint.end_date)
        {
            let day_tasks: Vec<Task> = tasks
                .iter()
                .filter(|t| t.created_at.date_naive() == day)
                .cloned()
                .collect();
            let day_bugs: Vec<BugReport> = bugs
                .iter()
                .filter(|b| b.created_at.date_naive() == day)
                .cloned()
                .collect();
            if !day_tasks.is_empty() || !day_bugs.is_empty() {
                timeline.push(TimelineDay {
                    day,
                    tasks: day_tasks,
                    bugs: day_bugs,
                });
            }
        }
        Ok(timeline)
    }

    pub async fn list_sprints(
        &self,
        viewer: &Actor,
        project_id: Option<&str>,
        is_active: Option<bool>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Sprint>, DatabaseError> {
        let mut sql = format!(
            "SELECT {SELECT_COLS} FROM sprints s WHERE {}",
            project_visibility_clause("s.project_id")
        );
        let mut params: Vec<libsql::Value> = vec![
            i64::from(viewer.is_elevated()).into(),
            viewer.id.clone().into(),
        ];
        let mut idx = 3usize;

        if let Some(project_id) = project_id {
            sql.push_str(&format!(" AND s.project_id = ?{idx}"));
            params.push(project_id.into());
            idx += 1;
        }
        if let Some(is_active) = is_active {
            sql.push_str(&format!(" AND s.is_active = ?{idx}"));
            params.push(i64::from(is_active).into());
            idx += 1;
        }

        sql.push_str(&format!(
            " ORDER BY s.start_date DESC LIMIT ?{idx} OFFSET ?{}",
            idx + 1
        ));
        params.push(i64::from(limit).into());
        params.push(i64::from(offset).into());

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut sprints = Vec::new();
        while let Some(row) = rows.next().await? {
            sprints.push(row_to_sprint(&row)?);
        }
        Ok(sprints)
    }
}
