// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entity identifiers and ID generation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// A caller-supplied identifier that is not a well-formed UUID
#[derive(Debug, Error)]
#[error("invalid entity id: {0}")]
pub struct IdError(#[from] uuid::Error);

/// Unique identifier for a stored entity (UUIDv4)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntityId(Uuid);

impl EntityId {
    /// Parse an id from its canonical string form
    pub fn parse(s: &str) -> Result<Self, IdError> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Generates entity identifiers
pub trait IdGen: Clone + Send + Sync + 'static {
    fn next(&self) -> EntityId;
}

/// Random UUIDv4 generator for production use
#[derive(Clone, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn next(&self) -> EntityId {
        EntityId(Uuid::new_v4())
    }
}

/// Sequential ID generator for deterministic tests
#[derive(Clone)]
pub struct SequentialIdGen {
    counter: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new() -> Self {
        Self {
            counter: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self) -> EntityId {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        EntityId(Uuid::from_u128(u128::from(n)))
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
