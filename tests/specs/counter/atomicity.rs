//! Counter atomicity specs
//!
//! Every business operation reaches the store as exactly one batched
//! commit; a failed guard anywhere in the batch leaves no trace.

use crate::prelude::*;

#[tokio::test]
async fn create_is_one_commit_of_two_ops() {
    let world = world();
    let user = world.user("owner@example.com").await;
    let group = world.group(user).await;

    let before = world.store.commits().len();
    let counter = world.engine.counter_create(group, "hits").await.unwrap();

    let commits = world.store.commits();
    assert_eq!(commits.len(), before + 1);

    let batch = commits.last().unwrap();
    assert_eq!(batch.ops.len(), 2);
    assert_eq!(batch.result, counter);
    assert!(matches!(batch.ops[0], WriteOp::Put { .. }));
    assert!(matches!(batch.ops[1], WriteOp::Update { .. }));
}

#[tokio::test]
async fn failed_membership_guard_discards_the_counter_put() {
    let world = world();

    // no group record exists, so the membership op's guard fails
    let err = world
        .engine
        .counter_create(fresh_id(), "orphan")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Precondition { index: 1, .. }));

    // the batch never committed and the counter Put with it
    assert!(world.store.commits().is_empty());
    assert_eq!(world.store.item_count(), 0);
}

#[tokio::test]
async fn delete_is_one_commit_of_two_ops() {
    let world = world();
    let user = world.user("owner@example.com").await;
    let group = world.group(user).await;
    let counter = world.engine.counter_create(group, "hits").await.unwrap();

    let before = world.store.commits().len();
    world.engine.counter_delete(group, counter).await.unwrap();

    let commits = world.store.commits();
    assert_eq!(commits.len(), before + 1);
    assert_eq!(commits.last().unwrap().ops.len(), 2);
}

#[tokio::test]
async fn failed_delete_leaves_membership_intact() {
    let world = world();
    let user = world.user("owner@example.com").await;
    let group = world.group(user).await;
    let counter = world.engine.counter_create(group, "hits").await.unwrap();
    let foreign = world.group(user).await;

    world
        .engine
        .counter_delete(foreign, counter)
        .await
        .unwrap_err();

    // both the record and the reverse reference survived
    assert!(world.engine.counter_read(group, counter).await.is_ok());
    assert_eq!(world.engine.counter_list(group).await.unwrap(), vec![counter]);
}

#[tokio::test]
async fn update_is_a_single_op_commit() {
    let world = world();
    let user = world.user("owner@example.com").await;
    let group = world.group(user).await;
    let counter = world.engine.counter_create(group, "hits").await.unwrap();

    world
        .engine
        .counter_update(group, counter, CounterChange::Increment)
        .await
        .unwrap();

    let commits = world.store.commits();
    assert_eq!(commits.last().unwrap().ops.len(), 1);
}
