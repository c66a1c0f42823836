//! Serde roundtrip tests for all entity types and the report snapshot.

use chrono::{NaiveDate, Utc};
use deck_core::entities::*;
use deck_core::enums::*;
use deck_core::reports::{
    BreakdownSlice, BurndownDay, Health, QualityStats, ReportData, StoryPointStats, TaskStats,
};

macro_rules! roundtrip {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;
            let json = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json).unwrap();
            assert_eq!(recovered, val, "serde roundtrip failed for {}", stringify!($ty));
        }
    };
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

roundtrip!(
    user_roundtrip,
    User,
    User {
        id: "usr-a3f8b2c1".into(),
        username: "ada".into(),
        role: Role::Manager,
        is_superuser: false,
        created_at: Utc::now(),
    }
);

roundtrip!(
    project_roundtrip,
    Project,
    Project {
        id: "prj-a3f8b2c1".into(),
        name: "Apollo".into(),
        description: Some("lander".into()),
        start_date: date(2026, 1, 1),
        end_date: None,
        status: ProjectStatus::OnHold,
        manager_id: "usr-a3f8b2c1".into(),
        member_ids: vec!["usr-b".into()],
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip!(
    sprint_roundtrip,
    Sprint,
    Sprint {
        id: "spr-a3f8b2c1".into(),
        project_id: "prj-a3f8b2c1".into(),
        name: "Sprint 1".into(),
        goal: None,
        start_date: date(2026, 2, 1),
        end_date: date(2026, 2, 14),
        is_active: true,
    }
);

roundtrip!(
    task_roundtrip,
    Task,
    Task {
        id: "tsk-a3f8b2c1".into(),
        project_id: "prj-a3f8b2c1".into(),
        sprint_id: Some("spr-a3f8b2c1".into()),
        assignee_id: None,
        title: "Wire up telemetry".into(),
        description: None,
        status: TaskStatus::Review,
        priority: Priority::High,
        story_points: 8,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip!(
    bug_roundtrip,
    BugReport,
    BugReport {
        id: "bug-a3f8b2c1".into(),
        project_id: "prj-a3f8b2c1".into(),
        task_id: None,
        reporter_id: "usr-qa".into(),
        title: "Crash on save".into(),
        description: Some("steps to reproduce".into()),
        status: BugStatus::Confirmed,
        priority: Priority::Critical,
        is_resolved: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip!(
    report_roundtrip,
    ProjectReport,
    ProjectReport {
        id: "rpt-a3f8b2c1".into(),
        project_id: "prj-a3f8b2c1".into(),
        generated_by: Some("usr-a".into()),
        report_type: ReportType::Project,
        data: None,
        is_ready: false,
        created_at: Utc::now(),
    }
);

roundtrip!(
    audit_roundtrip,
    AuditEntry,
    AuditEntry {
        id: "aud-a3f8b2c1".into(),
        actor_id: Some("usr-a".into()),
        entity_type: EntityType::Task,
        entity_id: "tsk-a3f8b2c1".into(),
        action: AuditAction::Updated,
        detail: Some(serde_json::json!({"status": "DONE"})),
        created_at: Utc::now(),
    }
);

roundtrip!(
    report_data_roundtrip,
    ReportData,
    ReportData {
        project_name: "Apollo".into(),
        tasks: TaskStats {
            total: 4,
            completed: 1,
            in_progress: 2,
        },
        story_points: StoryPointStats {
            total: 10,
            burned: 5,
            progress_percent: 50.0,
        },
        quality: QualityStats {
            active_bugs: 2,
            health: Health::Good,
        },
        bugs_breakdown: vec![BreakdownSlice {
            name: "HIGH".into(),
            value: 2,
        }],
        burndown: vec![BurndownDay {
            day: date(2026, 2, 1),
            ideal: 8.0,
            actual: Some(10.0),
            completed: 0,
        }],
    }
);

#[test]
fn report_wire_shape_matches_api_contract() {
    let report = ProjectReport {
        id: "rpt-1".into(),
        project_id: "prj-1".into(),
        generated_by: None,
        report_type: ReportType::Bugs,
        data: None,
        is_ready: false,
        created_at: Utc::now(),
    };
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["report_type"], "BUGS");
    assert_eq!(json["is_ready"], false);
    assert!(json["data"].is_null());
}
