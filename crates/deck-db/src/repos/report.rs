//! Report repository — request rows, worker input loading, and the
//! write-once result store.

use chrono::Utc;

use deck_core::access::Actor;
use deck_core::entities::ProjectReport;
use deck_core::enums::{AuditAction, EntityType, ReportType};
use deck_core::ids::PREFIX_REPORT;
use deck_core::reports::{ReportData, ReportInput};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_optional_json};
use crate::service::{project_visibility_clause, DeckService};

const SELECT_COLS: &str =
    "r.id, r.project_id, r.generated_by, r.report_type, r.data, r.is_ready, r.created_at";

fn row_to_report(row: &libsql::Row) -> Result<ProjectReport, DatabaseError> {
    let data = get_opt_string(row, 4)?;
    Ok(ProjectReport {
        id: row.get(0)?,
        project_id: row.get(1)?,
        generated_by: get_opt_string(row, 2)?,
        report_type: parse_enum(&row.get::<String>(3)?)?,
        data: parse_optional_json(data.as_deref())?,
        is_ready: row.get::<i64>(5)? != 0,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

impl DeckService {
    /// Request a report. The row is created empty; a queue worker (or a
    /// one-shot worker pass) fills it in later. Any viewer with access to
    /// the project may request one.
    pub async fn create_report_request(
        &self,
        actor: &Actor,
        project_id: &str,
        report_type: ReportType,
    ) -> Result<ProjectReport, DatabaseError> {
        self.require_project_access(actor, project_id).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_REPORT).await?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO project_reports (id, project_id, generated_by, report_type, data, is_ready, created_at)
                 VALUES (?1, ?2, ?3, ?4, NULL, 0, ?5)",
                libsql::params![
                    id.as_str(),
                    project_id,
                    actor.id.as_str(),
                    report_type.as_str(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        self.record_audit(
            Some(actor),
            EntityType::Report,
            &id,
            AuditAction::Created,
            Some(serde_json::json!({ "project_id": project_id, "report_type": report_type })),
        )
        .await?;

        if let Some(queue) = self.report_queue() {
            queue.enqueue(id.clone());
        }

        Ok(ProjectReport {
            id,
            project_id: project_id.to_string(),
            generated_by: Some(actor.id.clone()),
            report_type,
            data: None,
            is_ready: false,
            created_at: now,
        })
    }

    pub(crate) async fn find_report(
        &self,
        id: &str,
    ) -> Result<Option<ProjectReport>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM project_reports r WHERE r.id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_report(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_report(
        &self,
        viewer: &Actor,
        id: &str,
    ) -> Result<ProjectReport, DatabaseError> {
        let report = self
            .find_report(id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("report", id))?;
        if self.project_visible(viewer, &report.project_id).await? {
            Ok(report)
        } else {
            Err(DatabaseError::not_found("report", id))
        }
    }

    pub async fn list_reports(
        &self,
        viewer: &Actor,
        project_id: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<ProjectReport>, DatabaseError> {
        let mut sql = format!(
            "SELECT {SELECT_COLS} FROM project_reports r WHERE {}",
            project_visibility_clause("r.project_id")
        );
        let mut params: Vec<libsql::Value> = vec![
            i64::from(viewer.is_elevated()).into(),
            viewer.id.clone().into(),
        ];
        let mut idx = 3usize;

        if let Some(project_id) = project_id {
            sql.push_str(&format!(" AND r.project_id = ?{idx}"));
            params.push(project_id.into());
            idx += 1;
        }

        sql.push_str(&format!(
            " ORDER BY r.created_at DESC LIMIT ?{idx} OFFSET ?{}",
            idx + 1
        ));
        params.push(i64::from(limit).into());
        params.push(i64::from(offset).into());

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut reports = Vec::new();
        while let Some(row) = rows.next().await? {
            reports.push(row_to_report(&row)?);
        }
        Ok(reports)
    }

    /// Persist a computed snapshot. Write-once: returns `false` without
    /// touching the row when the report is already ready, so a redelivered
    /// job cannot overwrite an earlier result.
    pub(crate) async fn store_report_data(
        &self,
        report_id: &str,
        data: &ReportData,
    ) -> Result<bool, DatabaseError> {
        let json = serde_json::to_string(data).map_err(|e| DatabaseError::Other(e.into()))?;
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE project_reports SET data = ?1, is_ready = 1 WHERE id = ?2 AND is_ready = 0",
                libsql::params![json, report_id],
            )
            .await?;
        Ok(changed > 0)
    }

    /// Load everything the aggregator needs for one project, or `None`
    /// when the project no longer exists.
    pub(crate) async fn load_report_input(
        &self,
        project_id: &str,
    ) -> Result<Option<ReportInput>, DatabaseError> {
        let Some(project) = self.find_project(project_id).await? else {
            return Ok(None);
        };

        let conn = self.db().conn();

        let mut tasks = Vec::new();
        let mut rows = conn
            .query(
                "SELECT t.id, t.project_id, t.sprint_id, t.assignee_id, t.title, t.description,
                        t.status, t.priority, t.story_points, t.created_at, t.updated_at
                 FROM tasks t WHERE t.project_id = ?1",
                [project_id],
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
                 FROM bug_reports b WHERE b.project_id = ?1",
                [project_id],
            )
            .await?;
        while let Some(row) = rows.next().await? {
            bugs.push(super::bug::row_to_bug(&row)?);
        }

        let mut sprints = Vec::new();
        let mut rows = conn
            .query(
                "SELECT s.id, s.project_id, s.name, s.goal, s.start_date, s.end_date, s.is_active
                 FROM sprints s WHERE s.project_id = ?1",
                [project_id],
            )
            .await?;
        while let Some(row) = rows.next().await? {
            sprints.push(super::sprint::row_to_sprint(&row)?);
        }

        Ok(Some(ReportInput {
            project_name: project.name,
            tasks,
            bugs,
            sprints,
        }))
    }

    /// Ids of all reports still awaiting computation, oldest first. Used
    /// by the one-shot worker pass.
    pub async fn pending_report_ids(&self) -> Result<Vec<String>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id FROM project_reports WHERE is_ready = 0 ORDER BY created_at",
                (),
            )
            .await?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next().await? {
            ids.push(row.get(0)?);
        }
        Ok(ids)
    }
}
