// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Counter operation builders
//!
//! Mutations of an existing counter carry the structural guard
//! `attribute_exists(objectUUID) and counterGroup = :grpid`: the
//! caller's group id must match the stored one or the whole
//! transaction aborts. This guard is the only authorization check for
//! counter mutation.

use tally_core::{
    schema, AttrValue, Counter, CounterChange, EntityId, Key, Kind, TxnPlan, Values, WriteOp,
};

fn group_guard() -> String {
    format!(
        "attribute_exists({}) and {} = {}",
        schema::OBJECT_ID,
        schema::COUNTER_GROUP,
        schema::GRP_ID
    )
}

/// Queue the Put for a brand new counter (value 0, step 1)
pub fn append_create(plan: &mut TxnPlan, id: EntityId, name: &str, group_id: EntityId) {
    let counter = Counter {
        id,
        name: name.to_string(),
        group_id,
        value: 0,
        step: 1,
    };
    plan.push(WriteOp::Put {
        item: counter.to_item(),
    });
}

/// Queue the arithmetic update for one counter
pub fn append_change(
    plan: &mut TxnPlan,
    group_id: EntityId,
    counter_id: EntityId,
    change: CounterChange,
) {
    let values = Values::from([
        (schema::STEP_INIT.to_string(), AttrValue::n(change.step_value())),
        (schema::COUNT_INIT.to_string(), AttrValue::n(0)),
        (schema::GRP_ID.to_string(), AttrValue::s(group_id.to_string())),
    ]);
    plan.push(WriteOp::Update {
        key: Key::new(counter_id, Kind::Counter),
        expression: change.expression(),
        values,
        condition: Some(group_guard()),
    });
}

/// Queue the removal of one counter
pub fn append_delete(plan: &mut TxnPlan, group_id: EntityId, counter_id: EntityId) {
    let values = Values::from([(
        schema::GRP_ID.to_string(),
        AttrValue::s(group_id.to_string()),
    )]);
    plan.push(WriteOp::Delete {
        key: Key::new(counter_id, Kind::Counter),
        values,
        condition: Some(group_guard()),
    });
}

#[cfg(test)]
#[path = "counter_tests.rs"]
mod tests;
