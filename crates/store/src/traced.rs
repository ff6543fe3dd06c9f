// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced store wrapper for consistent observability

use crate::store::{ItemStore, StoreError};
use async_trait::async_trait;
use tally_core::{EntityId, Item, Key, TxnPlan};

/// Wrapper that adds tracing to any ItemStore
#[derive(Clone)]
pub struct TracedStore<S> {
    inner: S,
}

impl<S> TracedStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: ItemStore> ItemStore for TracedStore<S> {
    async fn commit(&self, plan: TxnPlan) -> Result<EntityId, StoreError> {
        let span = tracing::info_span!("store.commit", ops = plan.ops.len(), result = %plan.result);
        let _guard = span.enter();

        let start = std::time::Instant::now();
        let result = self.inner.commit(plan).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(id) => tracing::info!(
                %id,
                elapsed_ms = elapsed.as_millis() as u64,
                "committed"
            ),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "commit failed"
            ),
        }

        result
    }

    async fn get(&self, key: &Key) -> Result<Option<Item>, StoreError> {
        let span = tracing::info_span!("store.get", id = %key.id, kind = %key.kind);
        let _guard = span.enter();

        let result = self.inner.get(key).await;
        match &result {
            Ok(item) => tracing::debug!(found = item.is_some(), "read"),
            Err(e) => tracing::error!(error = %e, "read failed"),
        }

        result
    }

    async fn query_index(
        &self,
        index: &str,
        attr: &str,
        value: &str,
    ) -> Result<Vec<Item>, StoreError> {
        let span = tracing::info_span!("store.query", index, attr);
        let _guard = span.enter();

        let result = self.inner.query_index(index, attr, value).await;
        match &result {
            Ok(items) => tracing::debug!(matched = items.len(), "queried"),
            Err(e) => tracing::error!(error = %e, "query failed"),
        }

        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
