//! Group lifecycle specs
//!
//! Creation mirrors into the owner's group set; retirement freezes
//! membership; purge is blocked until the group is empty.

use crate::prelude::*;

#[tokio::test]
async fn create_mirrors_into_the_owner_set() {
    let world = world();
    let user = world.user("owner@example.com").await;

    let group = world.engine.group_create(user, "team").await.unwrap();

    assert_eq!(world.engine.group_list(user).await.unwrap(), vec![group]);
    let batch = world.store.commits().last().unwrap().clone();
    assert_eq!(batch.ops.len(), 2);
}

#[tokio::test]
async fn create_for_a_missing_user_fails_atomically() {
    let world = world();

    let err = world
        .engine
        .group_create(fresh_id(), "team")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Precondition { index: 1, .. }));
    assert_eq!(world.store.item_count(), 0);
}

#[tokio::test]
async fn retire_unlists_and_freezes_membership() {
    let world = world();
    let user = world.user("owner@example.com").await;
    let group = world.group(user).await;
    let counter = world.engine.counter_create(group, "hits").await.unwrap();

    world.engine.group_retire(user, group).await.unwrap();
    assert!(world.engine.group_list(user).await.unwrap().is_empty());

    // membership edits now fail their not-retired guard
    let err = world.engine.counter_create(group, "late").await.unwrap_err();
    assert!(matches!(err, Error::Precondition { .. }));
    let err = world.engine.counter_delete(group, counter).await.unwrap_err();
    assert!(matches!(err, Error::Precondition { .. }));
}

#[tokio::test]
async fn retired_group_still_serves_counter_arithmetic() {
    let world = world();
    let user = world.user("owner@example.com").await;
    let group = world.group(user).await;
    let counter = world.engine.counter_create(group, "hits").await.unwrap();

    world.engine.group_retire(user, group).await.unwrap();

    // the counter's own guard checks only its stored group id
    world
        .engine
        .counter_update(group, counter, CounterChange::Increment)
        .await
        .unwrap();
    assert_eq!(
        world.engine.counter_read(group, counter).await.unwrap().value,
        1
    );
}

#[tokio::test]
async fn retire_of_a_missing_group_fails() {
    let world = world();
    let user = world.user("owner@example.com").await;

    let err = world
        .engine
        .group_retire(user, fresh_id())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Precondition { index: 0, .. }));
}

#[tokio::test]
async fn purge_blocks_until_empty_then_removes_everything() {
    let world = world();
    let user = world.user("owner@example.com").await;
    let group = world.group(user).await;
    let counter = world.engine.counter_create(group, "hits").await.unwrap();

    let err = world.engine.group_purge(user, group).await.unwrap_err();
    assert!(matches!(err, Error::Precondition { index: 0, .. }));
    // the failed purge left the owner's set alone
    assert_eq!(world.engine.group_list(user).await.unwrap(), vec![group]);

    world.engine.counter_delete(group, counter).await.unwrap();
    world.engine.group_purge(user, group).await.unwrap();

    assert!(world.engine.group_list(user).await.unwrap().is_empty());
    let err = world.engine.counter_list(group).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { kind: Kind::Group, .. }));
}
