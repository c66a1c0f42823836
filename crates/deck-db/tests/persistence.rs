//! File-backed databases keep state across reopen.

mod common;

use deck_core::access::Actor;
use deck_core::enums::Role;
use deck_db::service::DeckService;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deck.db");
    let path = path.to_str().unwrap();

    {
        let svc = DeckService::new_local(path).await.unwrap();
        let pm = common::actor(&svc, "alice", Role::Manager).await;
        common::seed_project(&svc, &pm, "Orion", &[]).await;
    }

    let svc = DeckService::new_local(path).await.unwrap();
    let user = svc.find_user_by_username("alice").await.unwrap().unwrap();
    let pm = Actor::from_user(&user);

    let projects = svc.list_projects(&pm, None, 20, 0).await.unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].name, "Orion");
    assert_eq!(projects[0].manager_id, pm.id);
}
