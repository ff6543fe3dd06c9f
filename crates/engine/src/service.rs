// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The operation surface of the mutation engine
//!
//! One business operation, one store round trip: either a single
//! atomic commit of an assembled plan, or a single read. The inbound
//! collaborator has already resolved the caller to a user id (and
//! group id where applicable) before these are called.

use crate::error::Error;
use crate::ops;
use crate::ops::rights::Right;
use tally_core::{
    schema, Counter, CounterChange, EntityId, Group, IdGen, Key, Kind, SetEdit, StoreConfig,
    TxnPlan, User, UuidIdGen,
};
use tally_store::ItemStore;

/// Business operations over the item store
#[derive(Clone)]
pub struct Service<S, G = UuidIdGen> {
    store: S,
    config: StoreConfig,
    ids: G,
}

impl<S: ItemStore> Service<S> {
    pub fn new(store: S, config: StoreConfig) -> Self {
        Self {
            store,
            config,
            ids: UuidIdGen,
        }
    }
}

impl<S: ItemStore, G: IdGen> Service<S, G> {
    /// Construct with an injected id generator
    pub fn with_ids(store: S, config: StoreConfig, ids: G) -> Self {
        Self { store, config, ids }
    }

    // ------------------------------------------------------------- users

    /// Record a new user under an identity-provider supplied id
    pub async fn user_create(&self, id: EntityId, email: &str) -> Result<EntityId, Error> {
        let mut plan = TxnPlan::new(id);
        ops::user::append_create(&mut plan, id, email);
        let id = self.store.commit(plan).await?;
        tracing::info!(%id, "user created");
        Ok(id)
    }

    /// Record a new user together with their first group, atomically
    ///
    /// Returns the user id and the fresh group id.
    pub async fn user_create_with_group(
        &self,
        id: EntityId,
        email: &str,
        group_name: &str,
    ) -> Result<(EntityId, EntityId), Error> {
        let group_id = self.ids.next();
        let mut plan = TxnPlan::new(id);
        ops::group::append_create(&mut plan, group_id, group_name);
        ops::user::append_create_with_group(&mut plan, id, email, group_id);
        let id = self.store.commit(plan).await?;
        tracing::info!(%id, %group_id, "user created with initial group");
        Ok((id, group_id))
    }

    /// Resolve an email to the single user that owns it
    ///
    /// Zero or multiple matches violate the index-uniqueness invariant
    /// and are an error, never a silent pick.
    pub async fn user_lookup(&self, email: &str) -> Result<EntityId, Error> {
        let items = self
            .store
            .query_index(&self.config.email_index, schema::USER_EMAIL, email)
            .await?;
        if items.len() != 1 {
            return Err(Error::Lookup {
                matched: items.len(),
            });
        }
        let user = User::from_item(&items[0])?;
        Ok(user.id)
    }

    // ------------------------------------------------------------ groups

    /// Create a group and add it to the creator's set, atomically
    pub async fn group_create(&self, user_id: EntityId, name: &str) -> Result<EntityId, Error> {
        let id = self.ids.next();
        let mut plan = TxnPlan::new(id);
        ops::group::append_create(&mut plan, id, name);
        ops::user::append_membership(&mut plan, user_id, SetEdit::Add, id);
        let id = self.store.commit(plan).await?;
        tracing::info!(%id, %user_id, "group created");
        Ok(id)
    }

    /// The ids of the groups a user owns
    pub async fn group_list(&self, user_id: EntityId) -> Result<Vec<EntityId>, Error> {
        let item = self
            .store
            .get(&Key::new(user_id, Kind::User))
            .await?
            .ok_or(Error::NotFound {
                kind: Kind::User,
                id: user_id,
            })?;
        let user = User::from_item(&item)?;
        Ok(user.group_ids.into_iter().collect())
    }

    /// Soft-delete a group and drop it from the owner's set, atomically
    pub async fn group_retire(
        &self,
        user_id: EntityId,
        group_id: EntityId,
    ) -> Result<EntityId, Error> {
        let mut plan = TxnPlan::new(group_id);
        ops::group::append_retire(&mut plan, group_id);
        ops::user::append_membership(&mut plan, user_id, SetEdit::Remove, group_id);
        let id = self.store.commit(plan).await?;
        tracing::info!(%group_id, "group retired");
        Ok(id)
    }

    /// Hard-delete an empty group; blocked while counters remain
    pub async fn group_purge(
        &self,
        user_id: EntityId,
        group_id: EntityId,
    ) -> Result<EntityId, Error> {
        let mut plan = TxnPlan::new(group_id);
        ops::group::append_purge(&mut plan, group_id);
        ops::user::append_membership(&mut plan, user_id, SetEdit::Remove, group_id);
        let id = self.store.commit(plan).await?;
        tracing::info!(%group_id, "group purged");
        Ok(id)
    }

    // ---------------------------------------------------------- counters

    /// Create a counter and add it to the group's set, atomically
    pub async fn counter_create(
        &self,
        group_id: EntityId,
        name: &str,
    ) -> Result<EntityId, Error> {
        let id = self.ids.next();
        let mut plan = TxnPlan::new(id);
        ops::counter::append_create(&mut plan, id, name, group_id);
        ops::group::append_membership(&mut plan, group_id, SetEdit::Add, id);
        let id = self.store.commit(plan).await?;
        tracing::info!(%id, %group_id, "counter created");
        Ok(id)
    }

    /// Read one counter, verifying group membership after the read
    pub async fn counter_read(
        &self,
        group_id: EntityId,
        counter_id: EntityId,
    ) -> Result<Counter, Error> {
        let item = self
            .store
            .get(&Key::new(counter_id, Kind::Counter))
            .await?
            .ok_or(Error::NotFound {
                kind: Kind::Counter,
                id: counter_id,
            })?;
        let counter = Counter::from_item(&item)?;
        if counter.group_id != group_id {
            return Err(Error::WrongGroup {
                counter: counter_id,
            });
        }
        Ok(counter)
    }

    /// Apply one arithmetic change to a counter
    ///
    /// The group-match guard in the update's condition is the only
    /// authorization check: a foreign group id aborts the transaction.
    pub async fn counter_update(
        &self,
        group_id: EntityId,
        counter_id: EntityId,
        change: CounterChange,
    ) -> Result<EntityId, Error> {
        let mut plan = TxnPlan::new(counter_id);
        ops::counter::append_change(&mut plan, group_id, counter_id, change);
        let id = self.store.commit(plan).await?;
        tracing::debug!(%counter_id, ?change, "counter updated");
        Ok(id)
    }

    /// Delete a counter and drop it from the group's set, atomically
    pub async fn counter_delete(
        &self,
        group_id: EntityId,
        counter_id: EntityId,
    ) -> Result<EntityId, Error> {
        let mut plan = TxnPlan::new(counter_id);
        ops::counter::append_delete(&mut plan, group_id, counter_id);
        ops::group::append_membership(&mut plan, group_id, SetEdit::Remove, counter_id);
        let id = self.store.commit(plan).await?;
        tracing::info!(%counter_id, %group_id, "counter deleted");
        Ok(id)
    }

    /// The ids of the counters a group owns
    pub async fn counter_list(&self, group_id: EntityId) -> Result<Vec<EntityId>, Error> {
        let item = self
            .store
            .get(&Key::new(group_id, Kind::Group))
            .await?
            .ok_or(Error::NotFound {
                kind: Kind::Group,
                id: group_id,
            })?;
        let group = Group::from_item(&item)?;
        Ok(group.counter_ids.into_iter().collect())
    }

    // ------------------------------------------------------------ rights

    /// Grant rights over an object to a user
    pub async fn rights_grant(
        &self,
        user_id: EntityId,
        object_id: EntityId,
        rights: &[Right],
    ) -> Result<EntityId, Error> {
        let mut plan = TxnPlan::new(user_id);
        ops::rights::append_grant(&mut plan, user_id, object_id, rights);
        Ok(self.store.commit(plan).await?)
    }

    /// Revoke rights over an object from a user
    pub async fn rights_revoke(
        &self,
        user_id: EntityId,
        object_id: EntityId,
        rights: &[Right],
    ) -> Result<EntityId, Error> {
        let mut plan = TxnPlan::new(user_id);
        ops::rights::append_revoke(&mut plan, user_id, object_id, rights);
        Ok(self.store.commit(plan).await?)
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
