//! User lookup specs
//!
//! The email index is expected to be externally unique; the engine
//! enforces exactly-one at lookup time.

use crate::prelude::*;

#[tokio::test]
async fn lookup_resolves_a_created_user() {
    let world = world();
    let user = world.user("owner@example.com").await;

    assert_eq!(
        world.engine.user_lookup("owner@example.com").await.unwrap(),
        user
    );
}

#[tokio::test]
async fn lookup_of_an_unknown_email_is_an_error() {
    let world = world();
    world.user("owner@example.com").await;

    let err = world
        .engine
        .user_lookup("nobody@example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Lookup { matched: 0 }));
}

#[tokio::test]
async fn duplicate_emails_are_never_silently_picked() {
    let world = world();
    world.user("dup@example.com").await;
    world.user("dup@example.com").await;

    let err = world.engine.user_lookup("dup@example.com").await.unwrap_err();
    assert!(matches!(err, Error::Lookup { matched: 2 }));
}

#[tokio::test]
async fn user_create_is_a_single_op_commit() {
    let world = world();
    world.user("owner@example.com").await;

    let commits = world.store.commits();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].ops.len(), 1);
    assert!(matches!(commits[0].ops[0], WriteOp::Put { .. }));
}

#[tokio::test]
async fn user_create_with_group_is_one_commit_of_two_ops() {
    let world = world();

    let (user, group) = world
        .engine
        .user_create_with_group(fresh_id(), "owner@example.com", "home")
        .await
        .unwrap();

    let commits = world.store.commits();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].ops.len(), 2);
    assert_eq!(world.engine.group_list(user).await.unwrap(), vec![group]);
}
