// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Permission operation builders
//!
//! A permission record is keyed by the principal's user id; the first
//! grant materializes it with the target object id, and revocation is
//! guarded on that target so rights over one object cannot be revoked
//! through another.

use std::fmt;
use tally_core::{
    schema, set_mutation, AttrValue, EntityId, Key, Kind, SetEdit, TxnPlan, Values, WriteOp,
};

/// Rights grantable over an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Right {
    Read,
    Inc,
    Dec,
    Config,
    Admin,
    Create,
    Delete,
}

impl Right {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Inc => "inc",
            Self::Dec => "dec",
            Self::Config => "config",
            Self::Admin => "admin",
            Self::Create => "create",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Right {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn rights_set(rights: &[Right]) -> AttrValue {
    AttrValue::ss(rights.iter().map(Right::as_str))
}

/// Queue a grant, upserting the permission record
pub fn append_grant(
    plan: &mut TxnPlan,
    user_id: EntityId,
    object_id: EntityId,
    rights: &[Right],
) {
    let values = Values::from([
        (schema::OBJ_ID.to_string(), AttrValue::s(object_id.to_string())),
        (schema::VALS.to_string(), rights_set(rights)),
    ]);
    plan.push(WriteOp::Update {
        key: Key::new(user_id, Kind::Permission),
        expression: format!(
            "SET {} = {} {}",
            schema::TARGET_ID,
            schema::OBJ_ID,
            set_mutation(SetEdit::Add, schema::RIGHTS, schema::VALS)
        ),
        values,
        condition: None,
    });
}

/// Queue a revocation, guarded on the record's target object
pub fn append_revoke(
    plan: &mut TxnPlan,
    user_id: EntityId,
    object_id: EntityId,
    rights: &[Right],
) {
    let values = Values::from([
        (schema::OBJ_ID.to_string(), AttrValue::s(object_id.to_string())),
        (schema::VALS.to_string(), rights_set(rights)),
    ]);
    plan.push(WriteOp::Update {
        key: Key::new(user_id, Kind::Permission),
        expression: set_mutation(SetEdit::Remove, schema::RIGHTS, schema::VALS),
        values,
        condition: Some(format!(
            "attribute_exists({}) and {} = {}",
            schema::OBJECT_ID,
            schema::TARGET_ID,
            schema::OBJ_ID
        )),
    });
}

#[cfg(test)]
#[path = "rights_tests.rs"]
mod tests;
