//! Sprint date validation and completion semantics.

mod common;

use deck_core::enums::{Priority, Role, TaskStatus};
use deck_core::errors::CoreError;
use deck_db::error::DatabaseError;
use deck_db::updates::{SprintUpdate, TaskUpdate};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn end_date_may_not_precede_start_date() {
    let svc = common::service().await;
    let pm = common::actor(&svc, "alice", Role::Manager).await;
    let project = common::seed_project(&svc, &pm, "Orion", &[]).await;

    let err = svc
        .create_sprint(
            &pm,
            &project.id,
            "Backwards",
            None,
            common::date(2026, 3, 10),
            common::date(2026, 3, 2),
            false,
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DatabaseError::Core(CoreError::Validation(_))
    ));

    // Single-day sprints are allowed.
    let sprint = svc
        .create_sprint(
            &pm,
            &project.id,
            "One day",
            None,
            common::date(2026, 3, 2),
            common::date(2026, 3, 2),
            false,
        )
        .await
        .unwrap();
    assert_eq!(sprint.start_date, sprint.end_date);
}

#[tokio::test]
async fn update_validates_merged_dates() {
    let svc = common::service().await;
    let pm = common::actor(&svc, "alice", Role::Manager).await;
    let project = common::seed_project(&svc, &pm, "Orion", &[]).await;

    let sprint = svc
        .create_sprint(
            &pm,
            &project.id,
            "S1",
            None,
            common::date(2026, 3, 2),
            common::date(2026, 3, 13),
            true,
        )
        .await
        .unwrap();

    // Moving the end before the unchanged start must fail.
    let update = SprintUpdate {
        end_date: Some(common::date(2026, 2, 27)),
        ..SprintUpdate::default()
    };
    let err = svc.update_sprint(&pm, &sprint.id, update).await.unwrap_err();
    assert!(matches!(
        err,
        DatabaseError::Core(CoreError::Validation(_))
    ));

    // Moving both together is fine.
    let update = SprintUpdate {
        start_date: Some(common::date(2026, 3, 9)),
        end_date: Some(common::date(2026, 3, 20)),
        ..SprintUpdate::default()
    };
    let updated = svc.update_sprint(&pm, &sprint.id, update).await.unwrap();
    assert_eq!(updated.start_date, common::date(2026, 3, 9));
    assert_eq!(updated.end_date, common::date(2026, 3, 20));
}

#[tokio::test]
async fn completion_moves_unfinished_tasks_to_backlog() {
    let svc = common::service().await;
    let pm = common::actor(&svc, "alice", Role::Manager).await;
    let project = common::seed_project(&svc, &pm, "Orion", &[]).await;

    let sprint = svc
        .create_sprint(
            &pm,
            &project.id,
            "S1",
            None,
            common::date(2026, 3, 2),
            common::date(2026, 3, 13),
            true,
        )
        .await
        .unwrap();

    let mut task_ids = Vec::new();
    for title in ["a", "b", "c"] {
        let task = svc
            .create_task(
                &pm,
                &project.id,
                title,
                None,
                Priority::Medium,
                3,
                Some(&sprint.id),
                None,
            )
            .await
            .unwrap();
        task_ids.push(task.id);
    }
    let update = TaskUpdate {
        status: Some(TaskStatus::Done),
        ..TaskUpdate::default()
    };
    svc.update_task(&pm, &task_ids[0], update).await.unwrap();

    let (completed, moved) = svc.complete_sprint(&pm, &sprint.id).await.unwrap();
    assert!(!completed.is_active);
    assert_eq!(moved, 2);

    // The finished task stays attributed to the sprint.
    let done = svc.get_task(&pm, &task_ids[0]).await.unwrap();
    assert_eq!(done.sprint_id.as_deref(), Some(sprint.id.as_str()));
    for id in &task_ids[1..] {
        let task = svc.get_task(&pm, id).await.unwrap();
        assert_eq!(task.sprint_id, None);
    }
}

#[tokio::test]
async fn completing_twice_moves_nothing_more() {
    let svc = common::service().await;
    let pm = common::actor(&svc, "alice", Role::Manager).await;
    let project = common::seed_project(&svc, &pm, "Orion", &[]).await;

    let sprint = svc
        .create_sprint(
            &pm,
            &project.id,
            "S1",
            None,
            common::date(2026, 3, 2),
            common::date(2026, 3, 13),
            true,
        )
        .await
        .unwrap();
    svc.create_task(
        &pm,
        &project.id,
        "a",
        None,
        Priority::Low,
        1,
        Some(&sprint.id),
        None,
    )
    .await
    .unwrap();

    let (_, moved) = svc.complete_sprint(&pm, &sprint.id).await.unwrap();
    assert_eq!(moved, 1);
    let (_, moved) = svc.complete_sprint(&pm, &sprint.id).await.unwrap();
    assert_eq!(moved, 0);
}

#[tokio::test]
async fn timeline_groups_activity_by_creation_day() {
    let svc = common::service().await;
    let pm = common::actor(&svc, "alice", Role::Manager).await;
    let project = common::seed_project(&svc, &pm, "Orion", &[]).await;

    // Everything created below lands on today's date, so the window must
    // include it.
    let today = chrono::Utc::now().date_naive();
    let end = today.checked_add_days(chrono::Days::new(4)).unwrap();
    let sprint = svc
        .create_sprint(&pm, &project.id, "S1", None, today, end, true)
        .await
        .unwrap();

    for title in ["a", "b"] {
        svc.create_task(
            &pm,
            &project.id,
            title,
            None,
            Priority::Medium,
            3,
            Some(&sprint.id),
            None,
        )
        .await
        .unwrap();
    }
    // Backlog task: in the project but not the sprint, so not on the timeline.
    svc.create_task(&pm, &project.id, "backlog", None, Priority::Low, 1, None, None)
        .await
        .unwrap();
    svc.create_bug(&pm, &project.id, "Crash on save", None, Priority::High, None)
        .await
        .unwrap();

    let timeline = svc.sprint_timeline(&pm, &sprint.id).await.unwrap();
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline[0].day, today);
    assert_eq!(timeline[0].tasks.len(), 2);
    assert_eq!(timeline[0].bugs.len(), 1);
    assert_eq!(timeline[0].bugs[0].title, "Crash on save");

    // Outsiders cannot see the sprint, so no timeline either.
    let outsider = common::actor(&svc, "mallory", Role::Developer).await;
    assert!(svc.sprint_timeline(&outsider, &sprint.id).await.is_err());
}

#[tokio::test]
async fn timeline_is_empty_without_activity() {
    let svc = common::service().await;
    let pm = common::actor(&svc, "alice", Role::Manager).await;
    let project = common::seed_project(&svc, &pm, "Quiet", &[]).await;

    let sprint = svc
        .create_sprint(
            &pm,
            &project.id,
            "S1",
            None,
            common::date(2026, 3, 2),
            common::date(2026, 3, 13),
            true,
        )
        .await
        .unwrap();

    let timeline = svc.sprint_timeline(&pm, &sprint.id).await.unwrap();
    assert!(timeline.is_empty());
}
