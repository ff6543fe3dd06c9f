// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entity records and their attribute-map codec
//!
//! All four entity kinds share one keyspace; the `objectType`
//! discriminator keeps their keys from colliding. Marshaling is
//! infallible by construction. Unmarshaling fails on a missing or
//! mistyped attribute and the failure is fatal: it is raised before any
//! store call on the write path and immediately after a read on the
//! read path.

use crate::attr::{AttrValue, Item};
use crate::id::{EntityId, IdError};
use crate::schema;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Entity kind discriminator stored with every record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Counter,
    Group,
    User,
    Permission,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Counter => "Counter",
            Self::Group => "Group",
            Self::User => "User",
            Self::Permission => "Permission",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from unmarshaling a stored item
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("missing attribute: {0}")]
    Missing(&'static str),
    #[error("attribute {0} has the wrong form")]
    WrongForm(&'static str),
    #[error("record is {found:?}, expected {expected}")]
    WrongKind { expected: Kind, found: Option<String> },
    #[error("stored id is malformed: {0}")]
    BadId(#[from] IdError),
}

fn get_s<'a>(item: &'a Item, attr: &'static str) -> Result<&'a str, RecordError> {
    item.get(attr)
        .ok_or(RecordError::Missing(attr))?
        .as_s()
        .ok_or(RecordError::WrongForm(attr))
}

fn get_n(item: &Item, attr: &'static str) -> Result<i64, RecordError> {
    item.get(attr)
        .ok_or(RecordError::Missing(attr))?
        .as_n()
        .ok_or(RecordError::WrongForm(attr))
}

fn get_id(item: &Item, attr: &'static str) -> Result<EntityId, RecordError> {
    Ok(EntityId::parse(get_s(item, attr)?)?)
}

/// Read an id set; an absent attribute is an empty set
fn get_id_set(item: &Item, attr: &'static str) -> Result<BTreeSet<EntityId>, RecordError> {
    let Some(value) = item.get(attr) else {
        return Ok(BTreeSet::new());
    };
    let raw = value.as_ss().ok_or(RecordError::WrongForm(attr))?;
    raw.iter()
        .map(|s| Ok(EntityId::parse(s)?))
        .collect()
}

fn check_kind(item: &Item, expected: Kind) -> Result<(), RecordError> {
    let found = item.get(schema::OBJECT_TYPE).and_then(AttrValue::as_s);
    if found == Some(expected.as_str()) {
        Ok(())
    } else {
        Err(RecordError::WrongKind {
            expected,
            found: found.map(str::to_string),
        })
    }
}

/// A counter: an integer value and a step size, owned by one group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counter {
    pub id: EntityId,
    pub name: String,
    pub group_id: EntityId,
    pub value: i64,
    pub step: i64,
}

impl Counter {
    pub fn to_item(&self) -> Item {
        Item::from([
            (schema::OBJECT_ID.to_string(), AttrValue::s(self.id.to_string())),
            (schema::OBJECT_TYPE.to_string(), AttrValue::s(Kind::Counter.as_str())),
            (schema::COUNTER_NAME.to_string(), AttrValue::s(&self.name)),
            (schema::COUNTER_GROUP.to_string(), AttrValue::s(self.group_id.to_string())),
            (schema::COUNT_VAL.to_string(), AttrValue::n(self.value)),
            (schema::STEP_VAL.to_string(), AttrValue::n(self.step)),
        ])
    }

    pub fn from_item(item: &Item) -> Result<Self, RecordError> {
        check_kind(item, Kind::Counter)?;
        Ok(Self {
            id: get_id(item, schema::OBJECT_ID)?,
            name: get_s(item, schema::COUNTER_NAME)?.to_string(),
            group_id: get_id(item, schema::COUNTER_GROUP)?,
            value: get_n(item, schema::COUNT_VAL)?,
            step: get_n(item, schema::STEP_VAL)?,
        })
    }
}

/// A group of counters, owned by the creating user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: EntityId,
    pub name: String,
    pub counter_ids: BTreeSet<EntityId>,
    pub deleted: bool,
}

impl Group {
    pub fn to_item(&self) -> Item {
        let mut item = Item::from([
            (schema::OBJECT_ID.to_string(), AttrValue::s(self.id.to_string())),
            (schema::OBJECT_TYPE.to_string(), AttrValue::s(Kind::Group.as_str())),
            (schema::GROUP_NAME.to_string(), AttrValue::s(&self.name)),
        ]);
        // Empty sets and an unset marker are stored as absent attributes
        if !self.counter_ids.is_empty() {
            item.insert(
                schema::COUNTERS.to_string(),
                AttrValue::ss(self.counter_ids.iter().map(EntityId::to_string)),
            );
        }
        if self.deleted {
            item.insert(schema::DELETED.to_string(), AttrValue::Bool(true));
        }
        item
    }

    pub fn from_item(item: &Item) -> Result<Self, RecordError> {
        check_kind(item, Kind::Group)?;
        let deleted = match item.get(schema::DELETED) {
            Some(value) => value.as_bool().ok_or(RecordError::WrongForm(schema::DELETED))?,
            None => false,
        };
        Ok(Self {
            id: get_id(item, schema::OBJECT_ID)?,
            name: get_s(item, schema::GROUP_NAME)?.to_string(),
            counter_ids: get_id_set(item, schema::COUNTERS)?,
            deleted,
        })
    }
}

/// A user, identified externally by a unique email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: EntityId,
    pub email: String,
    pub group_ids: BTreeSet<EntityId>,
}

impl User {
    pub fn to_item(&self) -> Item {
        let mut item = Item::from([
            (schema::OBJECT_ID.to_string(), AttrValue::s(self.id.to_string())),
            (schema::OBJECT_TYPE.to_string(), AttrValue::s(Kind::User.as_str())),
            (schema::USER_EMAIL.to_string(), AttrValue::s(&self.email)),
        ]);
        if !self.group_ids.is_empty() {
            item.insert(
                schema::GROUPS.to_string(),
                AttrValue::ss(self.group_ids.iter().map(EntityId::to_string)),
            );
        }
        item
    }

    pub fn from_item(item: &Item) -> Result<Self, RecordError> {
        check_kind(item, Kind::User)?;
        Ok(Self {
            id: get_id(item, schema::OBJECT_ID)?,
            email: get_s(item, schema::USER_EMAIL)?.to_string(),
            group_ids: get_id_set(item, schema::GROUPS)?,
        })
    }
}

/// Rights granted to a user over one object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    pub user_id: EntityId,
    pub object_id: EntityId,
    pub rights: BTreeSet<String>,
}

impl Permission {
    pub fn to_item(&self) -> Item {
        let mut item = Item::from([
            (schema::OBJECT_ID.to_string(), AttrValue::s(self.user_id.to_string())),
            (schema::OBJECT_TYPE.to_string(), AttrValue::s(Kind::Permission.as_str())),
            (schema::TARGET_ID.to_string(), AttrValue::s(self.object_id.to_string())),
        ]);
        if !self.rights.is_empty() {
            item.insert(schema::RIGHTS.to_string(), AttrValue::ss(self.rights.iter().cloned()));
        }
        item
    }

    pub fn from_item(item: &Item) -> Result<Self, RecordError> {
        check_kind(item, Kind::Permission)?;
        let rights = match item.get(schema::RIGHTS) {
            Some(value) => value
                .as_ss()
                .ok_or(RecordError::WrongForm(schema::RIGHTS))?
                .clone(),
            None => BTreeSet::new(),
        };
        Ok(Self {
            user_id: get_id(item, schema::OBJECT_ID)?,
            object_id: get_id(item, schema::TARGET_ID)?,
            rights,
        })
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
