//! Role-gated writes: PM/ADMIN (or superusers) mutate, DEV/QA read.

mod common;

use deck_core::enums::{Priority, ReportType, Role, TaskStatus};
use deck_core::errors::CoreError;
use deck_db::error::DatabaseError;
use deck_db::updates::TaskUpdate;

fn assert_denied(err: &DatabaseError) {
    assert!(
        matches!(err, DatabaseError::Core(CoreError::PermissionDenied(_))),
        "expected permission denial, got: {err}"
    );
}

#[tokio::test]
async fn developer_cannot_create_projects() {
    let svc = common::service().await;
    let dev = common::actor(&svc, "bob", Role::Developer).await;

    let err = svc
        .create_project(&dev, "Orion", None, common::date(2026, 1, 5), None)
        .await
        .unwrap_err();
    assert_denied(&err);
}

#[tokio::test]
async fn member_developer_cannot_update_tasks() {
    let svc = common::service().await;
    let pm = common::actor(&svc, "alice", Role::Manager).await;
    let dev = common::actor(&svc, "bob", Role::Developer).await;

    let project = common::seed_project(&svc, &pm, "Orion", &[&dev]).await;
    let task = svc
        .create_task(&pm, &project.id, "Fix flaky test", None, Priority::Low, 2, None, None)
        .await
        .unwrap();

    let update = TaskUpdate {
        status: Some(TaskStatus::Done),
        ..TaskUpdate::default()
    };
    let err = svc.update_task(&dev, &task.id, update).await.unwrap_err();
    assert_denied(&err);
}

#[tokio::test]
async fn tester_cannot_delete_bugs() {
    let svc = common::service().await;
    let pm = common::actor(&svc, "alice", Role::Manager).await;
    let qa = common::actor(&svc, "quinn", Role::Tester).await;

    let project = common::seed_project(&svc, &pm, "Orion", &[&qa]).await;
    let bug = svc
        .create_bug(&pm, &project.id, "Login 500s", None, Priority::Critical, None)
        .await
        .unwrap();

    let err = svc.delete_bug(&qa, &bug.id).await.unwrap_err();
    assert_denied(&err);
}

#[tokio::test]
async fn superuser_bypasses_role_gate() {
    let svc = common::service().await;
    let su = common::actor_with(&svc, "ops", Role::Developer, true).await;

    let project = svc
        .create_project(&su, "Orion", None, common::date(2026, 1, 5), None)
        .await
        .unwrap();
    assert_eq!(project.manager_id, su.id);
}

#[tokio::test]
async fn permission_check_runs_before_row_lookup() {
    let svc = common::service().await;
    let dev = common::actor(&svc, "bob", Role::Developer).await;

    // A denied writer is told "denied", not "not found", even for rows
    // that do not exist.
    let err = svc.delete_task(&dev, "tsk-00000000").await.unwrap_err();
    assert_denied(&err);
}

#[tokio::test]
async fn any_visible_member_may_request_reports() {
    let svc = common::service().await;
    let pm = common::actor(&svc, "alice", Role::Manager).await;
    let dev = common::actor(&svc, "bob", Role::Developer).await;

    let project = common::seed_project(&svc, &pm, "Orion", &[&dev]).await;
    let report = svc
        .create_report_request(&dev, &project.id, ReportType::Project)
        .await
        .unwrap();
    assert_eq!(report.generated_by.as_deref(), Some(dev.id.as_str()));
    assert!(!report.is_ready);
}
