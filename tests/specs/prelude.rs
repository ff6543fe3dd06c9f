//! Shared helpers for tally specs

use tally_core::{IdGen, SequentialIdGen, StoreConfig, UuidIdGen};
use tally_engine::Service;

pub use tally_core::{CounterChange, EntityId, Key, Kind, WriteOp};
pub use tally_engine::{Error, Right};
pub use tally_store::MemoryStore;

/// A random id no record was written under
pub fn fresh_id() -> EntityId {
    UuidIdGen.next()
}

/// One engine wired to a fresh in-memory store
pub struct World {
    pub store: MemoryStore,
    pub engine: Service<MemoryStore, SequentialIdGen>,
}

pub fn world() -> World {
    let store = MemoryStore::new(StoreConfig::default());
    let engine = Service::with_ids(
        store.clone(),
        StoreConfig::default(),
        SequentialIdGen::new(),
    );
    World { store, engine }
}

impl World {
    /// A user recorded under a fresh external id
    pub async fn user(&self, email: &str) -> EntityId {
        let id = UuidIdGen.next();
        self.engine.user_create(id, email).await.unwrap();
        id
    }

    /// A live group owned by the given user
    pub async fn group(&self, user: EntityId) -> EntityId {
        self.engine.group_create(user, "specs").await.unwrap()
    }
}
