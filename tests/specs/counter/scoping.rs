//! Counter scoping specs
//!
//! The group-match precondition is the only authorization check for
//! counter mutation; a foreign group id must abort without touching
//! the counter.

use crate::prelude::*;

#[tokio::test]
async fn update_with_a_foreign_group_fails() {
    let world = world();
    let user = world.user("owner@example.com").await;
    let group = world.group(user).await;
    let counter = world.engine.counter_create(group, "hits").await.unwrap();
    let foreign = world.group(user).await;

    let err = world
        .engine
        .counter_update(foreign, counter, CounterChange::Increment)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Precondition { .. }));

    // the counter is untouched
    let read = world.engine.counter_read(group, counter).await.unwrap();
    assert_eq!(read.value, 0);
    assert_eq!(read.step, 1);
}

#[tokio::test]
async fn delete_with_a_foreign_group_fails() {
    let world = world();
    let user = world.user("owner@example.com").await;
    let group = world.group(user).await;
    let counter = world.engine.counter_create(group, "hits").await.unwrap();
    let foreign = world.group(user).await;

    let err = world
        .engine
        .counter_delete(foreign, counter)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Precondition { .. }));

    // still present, still listed under its real group
    assert!(world.engine.counter_read(group, counter).await.is_ok());
    assert_eq!(world.engine.counter_list(group).await.unwrap(), vec![counter]);
}

#[tokio::test]
async fn update_on_a_missing_counter_fails() {
    let world = world();
    let user = world.user("owner@example.com").await;
    let group = world.group(user).await;
    let err = world
        .engine
        .counter_update(group, fresh_id(), CounterChange::Increment)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Precondition { .. }));
}

#[tokio::test]
async fn read_from_a_foreign_group_is_rejected_without_leaking() {
    let world = world();
    let user = world.user("owner@example.com").await;
    let group = world.group(user).await;
    let counter = world.engine.counter_create(group, "hits").await.unwrap();
    let foreign = world.group(user).await;

    let err = world.engine.counter_read(foreign, counter).await.unwrap_err();
    assert!(matches!(err, Error::WrongGroup { .. }));
}
