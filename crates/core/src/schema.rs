// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-table vocabulary: attribute names and expression placeholders
//!
//! Every record lives in one shared keyspace keyed by
//! (`objectUUID`, `objectType`). These names are part of the stored
//! schema and of the expression strings checked by the store at commit
//! time, so they are centralized here.

/// Primary key: entity UUID
pub const OBJECT_ID: &str = "objectUUID";
/// Primary key: kind discriminator
pub const OBJECT_TYPE: &str = "objectType";

/// Counter display name
pub const COUNTER_NAME: &str = "counterName";
/// Owning group of a counter
pub const COUNTER_GROUP: &str = "counterGroup";
/// Current counter value
pub const COUNT_VAL: &str = "countVal";
/// Increment/decrement step size
pub const STEP_VAL: &str = "stepVal";

/// Group display name
pub const GROUP_NAME: &str = "groupName";
/// Set of counter ids owned by a group
pub const COUNTERS: &str = "counters";
/// Soft-delete marker on a group
pub const DELETED: &str = "deleted";

/// User email, covered by the lookup index
pub const USER_EMAIL: &str = "userEmail";
/// Set of group ids owned by a user
pub const GROUPS: &str = "groups";

/// Target object of a permission record
pub const TARGET_ID: &str = "objectId";
/// Set of rights granted by a permission record
pub const RIGHTS: &str = "rights";

// Expression placeholders. Values bound to these names travel with the
// operation that references them.

/// Initial or replacement step value
pub const STEP_INIT: &str = ":stepinit";
/// Initial counter value
pub const COUNT_INIT: &str = ":countinit";
/// Single-element set for membership edits
pub const VAL1: &str = ":val1";
/// Expected owning group in a counter guard
pub const GRP_ID: &str = ":grpid";
/// Rights set for permission edits
pub const VALS: &str = ":vals";
/// Target object in a permission expression
pub const OBJ_ID: &str = ":obj";
/// Boolean true for the soft-delete marker
pub const TRUE: &str = ":true";
