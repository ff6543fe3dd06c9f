// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The item-store capability boundary

use crate::eval::EvalError;
use async_trait::async_trait;
use tally_core::{EntityId, Item, Key, TxnPlan};
use thiserror::Error;

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// A condition failed at commit time; nothing was applied
    #[error("transaction canceled at op {index}: {reason}")]
    Canceled { index: usize, reason: String },
    #[error("expression error: {0}")]
    Expression(#[from] EvalError),
    #[error("unknown index: {0}")]
    UnknownIndex(String),
    #[error("malformed op: {0}")]
    Malformed(String),
}

/// Narrow capability interface onto the backing item store
///
/// One call, one round trip: a transactional multi-op write, a
/// single-item read, or an indexed lookup. Nothing here retries or
/// blocks beyond the call itself.
#[async_trait]
pub trait ItemStore: Clone + Send + Sync + 'static {
    /// Submit a plan as one atomic transactional write
    ///
    /// Returns the plan's result identity on success. A failed
    /// condition aborts the whole batch; partial application is never
    /// observable.
    async fn commit(&self, plan: TxnPlan) -> Result<EntityId, StoreError>;

    /// Read a single record
    async fn get(&self, key: &Key) -> Result<Option<Item>, StoreError>;

    /// Look up records by an indexed attribute
    async fn query_index(
        &self,
        index: &str,
        attr: &str,
        value: &str,
    ) -> Result<Vec<Item>, StoreError>;
}
