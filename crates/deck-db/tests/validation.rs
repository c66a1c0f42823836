//! Domain invariants: story-point scale and cross-project references.

mod common;

use deck_core::enums::{Priority, Role};
use deck_core::errors::CoreError;
use deck_db::error::DatabaseError;
use deck_db::updates::{BugUpdate, TaskUpdate};
use rstest::rstest;

fn assert_validation(err: &DatabaseError, fragment: &str) {
    match err {
        DatabaseError::Core(CoreError::Validation(msg)) => {
            assert!(msg.contains(fragment), "unexpected message: {msg}");
        }
        other => panic!("expected validation error, got: {other}"),
    }
}

#[rstest]
#[case(0)]
#[case(4)]
#[case(6)]
#[case(22)]
#[tokio::test]
async fn off_scale_story_points_are_rejected(#[case] points: u32) {
    let svc = common::service().await;
    let pm = common::actor(&svc, "alice", Role::Manager).await;
    let project = common::seed_project(&svc, &pm, "Orion", &[]).await;

    let err = svc
        .create_task(&pm, &project.id, "Oversized", None, Priority::Low, points, None, None)
        .await
        .unwrap_err();
    assert_validation(&err, "story_points");
}

#[tokio::test]
async fn on_scale_story_points_are_accepted() {
    let svc = common::service().await;
    let pm = common::actor(&svc, "alice", Role::Manager).await;
    let project = common::seed_project(&svc, &pm, "Orion", &[]).await;

    // 5 is on the Fibonacci scale.
    let task = svc
        .create_task(&pm, &project.id, "Sized", None, Priority::Low, 5, None, None)
        .await
        .unwrap();
    assert_eq!(task.story_points, 5);

    let update = TaskUpdate {
        story_points: Some(6),
        ..TaskUpdate::default()
    };
    let err = svc.update_task(&pm, &task.id, update).await.unwrap_err();
    assert_validation(&err, "story_points");
}

#[tokio::test]
async fn task_sprint_must_share_the_project() {
    let svc = common::service().await;
    let pm = common::actor(&svc, "alice", Role::Manager).await;
    let orion = common::seed_project(&svc, &pm, "Orion", &[]).await;
    let vega = common::seed_project(&svc, &pm, "Vega", &[]).await;

    let foreign_sprint = svc
        .create_sprint(
            &pm,
            &vega.id,
            "Vega S1",
            None,
            common::date(2026, 2, 2),
            common::date(2026, 2, 13),
            true,
        )
        .await
        .unwrap();

    let err = svc
        .create_task(
            &pm,
            &orion.id,
            "Misfiled",
            None,
            Priority::Medium,
            3,
            Some(&foreign_sprint.id),
            None,
        )
        .await
        .unwrap_err();
    assert_validation(&err, "different project");

    let task = svc
        .create_task(&pm, &orion.id, "Filed", None, Priority::Medium, 3, None, None)
        .await
        .unwrap();
    let update = TaskUpdate {
        sprint_id: Some(Some(foreign_sprint.id.clone())),
        ..TaskUpdate::default()
    };
    let err = svc.update_task(&pm, &task.id, update).await.unwrap_err();
    assert_validation(&err, "different project");
}

#[tokio::test]
async fn bug_task_link_must_share_the_project() {
    let svc = common::service().await;
    let pm = common::actor(&svc, "alice", Role::Manager).await;
    let orion = common::seed_project(&svc, &pm, "Orion", &[]).await;
    let vega = common::seed_project(&svc, &pm, "Vega", &[]).await;

    let foreign_task = svc
        .create_task(&pm, &vega.id, "Vega work", None, Priority::Low, 1, None, None)
        .await
        .unwrap();

    let err = svc
        .create_bug(
            &pm,
            &orion.id,
            "Crash on save",
            None,
            Priority::High,
            Some(&foreign_task.id),
        )
        .await
        .unwrap_err();
    assert_validation(&err, "different project");

    let bug = svc
        .create_bug(&pm, &orion.id, "Crash on save", None, Priority::High, None)
        .await
        .unwrap();
    let update = BugUpdate {
        task_id: Some(Some(foreign_task.id.clone())),
        ..BugUpdate::default()
    };
    let err = svc.update_bug(&pm, &bug.id, update).await.unwrap_err();
    assert_validation(&err, "different project");
}

#[tokio::test]
async fn unknown_manager_is_rejected() {
    let svc = common::service().await;
    let pm = common::actor(&svc, "alice", Role::Manager).await;

    let err = svc
        .create_project(
            &pm,
            "Orion",
            None,
            common::date(2026, 1, 5),
            Some("usr-00000000"),
        )
        .await
        .unwrap_err();
    assert_validation(&err, "does not exist");
}
