// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy of the operation surface
//!
//! Nothing here is recovered locally; every failure propagates to the
//! boundary, which owns the mapping to protocol responses.

use tally_core::{EntityId, IdError, Kind, RecordError};
use tally_store::StoreError;
use thiserror::Error;

/// Errors surfaced by engine operations
#[derive(Debug, Error)]
pub enum Error {
    /// A record could not be unmarshaled; fatal, never retried
    #[error("record error: {0}")]
    Codec(#[from] RecordError),
    /// A transactional guard failed at commit time; nothing was applied
    #[error("precondition failed at op {index}: {reason}")]
    Precondition { index: usize, reason: String },
    /// The email index matched zero or more than one user
    #[error("user lookup matched {matched} records, expected exactly 1")]
    Lookup { matched: usize },
    /// A caller-supplied id was not a well-formed UUID
    #[error("invalid id: {0}")]
    InvalidId(#[from] IdError),
    /// A single-item read found nothing
    #[error("{kind} not found: {id}")]
    NotFound { kind: Kind, id: EntityId },
    /// The record exists but belongs to a different group
    #[error("counter {counter} belongs to another group")]
    WrongGroup { counter: EntityId },
    /// Any other gateway failure
    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Canceled { index, reason } => Self::Precondition { index, reason },
            other => Self::Store(other),
        }
    }
}
