// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory transactional item store
//!
//! Implements the backing store's commit-time semantics against a
//! mutex-guarded table: every condition in a batch is checked first,
//! then every op is applied, so a failed condition leaves no trace.
//! Each committed batch is recorded for test assertions.

use crate::eval;
use crate::store::{ItemStore, StoreError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tally_core::{schema, AttrValue, EntityId, Item, Key, StoreConfig, TxnPlan, WriteOp};

type TableKey = (String, String);

#[derive(Default)]
struct Inner {
    items: BTreeMap<TableKey, Item>,
    commits: Vec<TxnPlan>,
    fail_next: Option<String>,
}

/// In-memory store with real commit-time condition semantics
#[derive(Clone)]
pub struct MemoryStore {
    config: StoreConfig,
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Key of a full record, taken from its own attributes
    fn item_key(item: &Item) -> Result<TableKey, StoreError> {
        let id = item
            .get(schema::OBJECT_ID)
            .and_then(AttrValue::as_s)
            .ok_or_else(|| StoreError::Malformed("put item has no objectUUID".to_string()))?;
        let kind = item
            .get(schema::OBJECT_TYPE)
            .and_then(AttrValue::as_s)
            .ok_or_else(|| StoreError::Malformed("put item has no objectType".to_string()))?;
        Ok((id.to_string(), kind.to_string()))
    }

    fn table_key(key: &Key) -> TableKey {
        (key.id.to_string(), key.kind.as_str().to_string())
    }

    /// A fresh item materialized by an update on a missing key
    fn base_item(key: &Key) -> Item {
        Item::from([
            (schema::OBJECT_ID.to_string(), AttrValue::s(key.id.to_string())),
            (schema::OBJECT_TYPE.to_string(), AttrValue::s(key.kind.as_str())),
        ])
    }

    fn op_key(op: &WriteOp) -> Result<TableKey, StoreError> {
        match op {
            WriteOp::Put { item } => Self::item_key(item),
            WriteOp::Update { key, .. } | WriteOp::Delete { key, .. } => Ok(Self::table_key(key)),
        }
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn commit(&self, plan: TxnPlan) -> Result<EntityId, StoreError> {
        let mut inner = self.lock();

        if let Some(reason) = inner.fail_next.take() {
            return Err(StoreError::Canceled { index: 0, reason });
        }

        // Phase one: every condition is checked against the current
        // state before anything is written.
        let empty = tally_core::Values::new();
        for (index, op) in plan.ops.iter().enumerate() {
            let Some(condition) = op.condition() else {
                continue;
            };
            let key = Self::op_key(op)?;
            let current = inner.items.get(&key);
            let values = op.values().unwrap_or(&empty);
            if !eval::eval_condition(condition, current, values)? {
                return Err(StoreError::Canceled {
                    index,
                    reason: condition.to_string(),
                });
            }
        }

        // Phase two: apply in order.
        for op in &plan.ops {
            match op {
                WriteOp::Put { item } => {
                    inner.items.insert(Self::item_key(item)?, item.clone());
                }
                WriteOp::Update {
                    key,
                    expression,
                    values,
                    ..
                } => {
                    let entry = inner
                        .items
                        .entry(Self::table_key(key))
                        .or_insert_with(|| Self::base_item(key));
                    eval::apply_update(expression, entry, values)?;
                }
                WriteOp::Delete { key, .. } => {
                    inner.items.remove(&Self::table_key(key));
                }
            }
        }

        let result = plan.result;
        inner.commits.push(plan);
        Ok(result)
    }

    async fn get(&self, key: &Key) -> Result<Option<Item>, StoreError> {
        Ok(self.lock().items.get(&Self::table_key(key)).cloned())
    }

    async fn query_index(
        &self,
        index: &str,
        attr: &str,
        value: &str,
    ) -> Result<Vec<Item>, StoreError> {
        if index != self.config.email_index {
            return Err(StoreError::UnknownIndex(index.to_string()));
        }
        let inner = self.lock();
        Ok(inner
            .items
            .values()
            .filter(|item| item.get(attr).and_then(AttrValue::as_s) == Some(value))
            .cloned()
            .collect())
    }
}

#[cfg(any(test, feature = "test-support"))]
impl MemoryStore {
    /// All committed batches, in order
    pub fn commits(&self) -> Vec<TxnPlan> {
        self.lock().commits.clone()
    }

    /// Total number of stored items
    pub fn item_count(&self) -> usize {
        self.lock().items.len()
    }

    /// Direct snapshot of one record, bypassing the trait
    pub fn snapshot(&self, key: &Key) -> Option<Item> {
        self.lock().items.get(&Self::table_key(key)).cloned()
    }

    /// Make the next commit fail before any condition is checked
    pub fn fail_next_commit(&self, reason: impl Into<String>) {
        self.lock().fail_next = Some(reason.into());
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
