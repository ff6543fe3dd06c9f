//! Permission specs
//!
//! Grants upsert the principal's permission record; revocations are
//! guarded on the recorded target object.

use crate::prelude::*;
use tally_core::Permission;

#[tokio::test]
async fn grant_materializes_the_permission_record() {
    let world = world();
    let user = world.user("owner@example.com").await;
    let object = fresh_id();

    world
        .engine
        .rights_grant(user, object, &[Right::Read, Right::Inc])
        .await
        .unwrap();

    let item = world.store.snapshot(&Key::new(user, Kind::Permission)).unwrap();
    let perm = Permission::from_item(&item).unwrap();
    assert_eq!(perm.user_id, user);
    assert_eq!(perm.object_id, object);
    assert_eq!(perm.rights.len(), 2);
}

#[tokio::test]
async fn repeated_grants_accumulate_rights() {
    let world = world();
    let user = world.user("owner@example.com").await;
    let object = fresh_id();

    world.engine.rights_grant(user, object, &[Right::Read]).await.unwrap();
    world.engine.rights_grant(user, object, &[Right::Admin]).await.unwrap();

    let item = world.store.snapshot(&Key::new(user, Kind::Permission)).unwrap();
    let perm = Permission::from_item(&item).unwrap();
    assert!(perm.rights.contains("read") && perm.rights.contains("admin"));
}

#[tokio::test]
async fn revoke_trims_rights_for_the_right_object() {
    let world = world();
    let user = world.user("owner@example.com").await;
    let object = fresh_id();

    world
        .engine
        .rights_grant(user, object, &[Right::Read, Right::Inc])
        .await
        .unwrap();
    world.engine.rights_revoke(user, object, &[Right::Inc]).await.unwrap();

    let item = world.store.snapshot(&Key::new(user, Kind::Permission)).unwrap();
    let perm = Permission::from_item(&item).unwrap();
    assert!(perm.rights.contains("read"));
    assert!(!perm.rights.contains("inc"));
}

#[tokio::test]
async fn revoke_against_another_object_fails() {
    let world = world();
    let user = world.user("owner@example.com").await;
    let object = fresh_id();

    world.engine.rights_grant(user, object, &[Right::Read]).await.unwrap();

    let err = world
        .engine
        .rights_revoke(user, fresh_id(), &[Right::Read])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Precondition { .. }));
}
