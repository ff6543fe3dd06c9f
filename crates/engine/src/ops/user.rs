// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User operation builders

use std::collections::BTreeSet;
use tally_core::{
    schema, set_mutation, AttrValue, EntityId, Key, Kind, SetEdit, TxnPlan, User, Values,
    WriteOp,
};

/// Queue the Put for a brand new user
///
/// The id is supplied by the caller: it comes from the identity
/// provider, not from local generation.
pub fn append_create(plan: &mut TxnPlan, id: EntityId, email: &str) {
    let user = User {
        id,
        email: email.to_string(),
        group_ids: BTreeSet::new(),
    };
    plan.push(WriteOp::Put {
        item: user.to_item(),
    });
}

/// Queue the Put for a new user who already owns one group
///
/// Used when the user and their first group are created in the same
/// transaction; both records are fresh, so neither Put needs a guard.
pub fn append_create_with_group(
    plan: &mut TxnPlan,
    id: EntityId,
    email: &str,
    group_id: EntityId,
) {
    let user = User {
        id,
        email: email.to_string(),
        group_ids: BTreeSet::from([group_id]),
    };
    plan.push(WriteOp::Put {
        item: user.to_item(),
    });
}

/// Queue a group-set membership edit
pub fn append_membership(
    plan: &mut TxnPlan,
    user_id: EntityId,
    edit: SetEdit,
    group_id: EntityId,
) {
    let values = Values::from([(
        schema::VAL1.to_string(),
        AttrValue::ss([group_id.to_string()]),
    )]);
    plan.push(WriteOp::Update {
        key: Key::new(user_id, Kind::User),
        expression: set_mutation(edit, schema::GROUPS, schema::VAL1),
        values,
        condition: Some(format!(
            "attribute_exists({}) and attribute_not_exists({})",
            schema::OBJECT_ID,
            schema::DELETED
        )),
    });
}

#[cfg(test)]
#[path = "user_tests.rs"]
mod tests;
