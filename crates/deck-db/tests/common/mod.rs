//! Shared fixtures for deck-db integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;

use deck_core::access::Actor;
use deck_core::entities::Project;
use deck_core::enums::Role;
use deck_db::service::DeckService;

pub async fn service() -> DeckService {
    DeckService::new_local(":memory:")
        .await
        .expect("in-memory database should open")
}

pub async fn actor(service: &DeckService, username: &str, role: Role) -> Actor {
    actor_with(service, username, role, false).await
}

pub async fn actor_with(
    service: &DeckService,
    username: &str,
    role: Role,
    is_superuser: bool,
) -> Actor {
    let user = service
        .create_user(username, role, is_superuser)
        .await
        .expect("user creation should succeed");
    Actor::from_user(&user)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

/// A project managed by `manager` with `members` already added.
pub async fn seed_project(
    service: &DeckService,
    manager: &Actor,
    name: &str,
    members: &[&Actor],
) -> Project {
    let project = service
        .create_project(manager, name, None, date(2026, 1, 5), None)
        .await
        .expect("project creation should succeed");
    for member in members {
        service
            .add_member(manager, &project.id, &member.id)
            .await
            .expect("adding member should succeed");
    }
    service
        .get_project(manager, &project.id)
        .await
        .expect("project should be readable by its manager")
}
