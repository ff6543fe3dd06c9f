// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Group operation builders

use std::collections::BTreeSet;
use tally_core::{
    schema, set_mutation, AttrValue, EntityId, Group, Key, Kind, SetEdit, TxnPlan, Values,
    WriteOp,
};

/// Guard for membership edits: the group exists and is not retired
fn live_guard() -> String {
    format!(
        "attribute_exists({}) and attribute_not_exists({})",
        schema::OBJECT_ID,
        schema::DELETED
    )
}

/// Queue the Put for a brand new group
pub fn append_create(plan: &mut TxnPlan, id: EntityId, name: &str) {
    let group = Group {
        id,
        name: name.to_string(),
        counter_ids: BTreeSet::new(),
        deleted: false,
    };
    plan.push(WriteOp::Put {
        item: group.to_item(),
    });
}

/// Queue a counter-set membership edit
pub fn append_membership(
    plan: &mut TxnPlan,
    group_id: EntityId,
    edit: SetEdit,
    counter_id: EntityId,
) {
    let values = Values::from([(
        schema::VAL1.to_string(),
        AttrValue::ss([counter_id.to_string()]),
    )]);
    plan.push(WriteOp::Update {
        key: Key::new(group_id, Kind::Group),
        expression: set_mutation(edit, schema::COUNTERS, schema::VAL1),
        values,
        condition: Some(live_guard()),
    });
}

/// Queue the soft-delete marker
///
/// Retiring freezes the group's membership: every later membership
/// edit fails its `attribute_not_exists(deleted)` guard. Surviving
/// counters keep accepting arithmetic.
pub fn append_retire(plan: &mut TxnPlan, group_id: EntityId) {
    let values = Values::from([(schema::TRUE.to_string(), AttrValue::Bool(true))]);
    plan.push(WriteOp::Update {
        key: Key::new(group_id, Kind::Group),
        expression: format!("SET {} = {}", schema::DELETED, schema::TRUE),
        values,
        condition: Some(format!("attribute_exists({})", schema::OBJECT_ID)),
    });
}

/// Queue the hard delete, blocked while any counter remains
pub fn append_purge(plan: &mut TxnPlan, group_id: EntityId) {
    plan.push(WriteOp::Delete {
        key: Key::new(group_id, Kind::Group),
        values: Values::new(),
        condition: Some(format!(
            "attribute_exists({}) and attribute_not_exists({})",
            schema::OBJECT_ID,
            schema::COUNTERS
        )),
    });
}

#[cfg(test)]
#[path = "group_tests.rs"]
mod tests;
