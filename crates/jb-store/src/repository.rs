//! # Repository Layer
//!
//! Typed access to a collection with the locking discipline the flat-file
//! store demands.
//!
//! ## Why this exists
//!
//! The store only supports whole-collection save, so any read-modify-write
//! is vulnerable to lost updates if two writers interleave. The repository
//! serializes the physical cycle with one commit mutex per collection:
//! snapshot → mutate copy → save → swap. The cache swap happens only after a
//! successful save, so a failed save leaves readers on the last known-good
//! snapshot and the caller sees a clean `Persistence` error.
//!
//! ## Entity locks
//!
//! Logical transitions span more than one commit (a deposit confirmation
//! reads the request, credits the user, then writes the request). Those
//! sequences take a per-entity lock from [`LockRegistry`] before the first
//! read and hold it until the last write. Cross-entity operations acquire
//! the request/transaction lock before the user lock, in that fixed order.

use crate::collection::Collection;
use crate::ports::CollectionStore;
use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::{PlatformError, PlatformResult};
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::sync::Arc;
use tracing::debug;

/// Handle to a single entity's mutual-exclusion scope.
pub type EntityLock = Arc<Mutex<()>>;

/// Hands out one lock per entity key, created lazily.
#[derive(Debug, Default)]
pub struct LockRegistry<K: Eq + Hash + Clone> {
    entries: Mutex<HashMap<K, EntityLock>>,
}

impl<K: Eq + Hash + Clone> LockRegistry<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Get (or create) the lock for `key`. Callers lock the returned handle
    /// and keep the guard alive for the whole read-check-write sequence.
    pub fn acquire(&self, key: &K) -> EntityLock {
        let mut entries = self.entries.lock();
        entries
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Number of keys that ever took a lock.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// An entity type that lives in a store collection.
pub trait Persistable:
    Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Key type used for lookups and entity locks.
    type Key: Eq + Hash + Clone + Display + Send + Sync;

    /// The collection this entity is stored in.
    const COLLECTION: Collection;

    /// Human-readable entity name for error reporting.
    const ENTITY: &'static str;

    fn key(&self) -> Self::Key;
}

/// Snapshot-cached, commit-serialized view of one collection.
pub struct Repository<T: Persistable> {
    store: Arc<dyn CollectionStore>,
    /// Last known-good snapshot; swapped only after a successful save.
    cache: RwLock<Arc<Vec<T>>>,
    /// Serializes the snapshot → save → swap cycle.
    commit_lock: Mutex<()>,
    /// Per-entity locks for multi-commit transitions.
    locks: LockRegistry<T::Key>,
}

impl<T: Persistable> Repository<T> {
    /// Open the repository, loading the current collection contents.
    /// A collection that was never written starts empty.
    pub fn open(store: Arc<dyn CollectionStore>) -> PlatformResult<Self> {
        let initial: Vec<T> = match store.load(T::COLLECTION)? {
            Some(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                PlatformError::Persistence(format!(
                    "corrupt {} collection: {e}",
                    T::COLLECTION
                ))
            })?,
            None => Vec::new(),
        };

        debug!(
            collection = %T::COLLECTION,
            entities = initial.len(),
            "Repository opened"
        );

        Ok(Self {
            store,
            cache: RwLock::new(Arc::new(initial)),
            commit_lock: Mutex::new(()),
            locks: LockRegistry::new(),
        })
    }

    /// Current snapshot. Cheap to clone, safe to read without locks.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Vec<T>> {
        self.cache.read().clone()
    }

    /// Look up one entity by key in the current snapshot.
    #[must_use]
    pub fn get(&self, key: &T::Key) -> Option<T> {
        self.snapshot().iter().find(|e| e.key() == *key).cloned()
    }

    /// Look up one entity or fail with `NotFound`.
    pub fn require(&self, key: &T::Key) -> PlatformResult<T> {
        self.get(key)
            .ok_or_else(|| PlatformError::not_found(T::ENTITY, key))
    }

    /// The per-entity lock for `key`.
    pub fn entity_lock(&self, key: &T::Key) -> EntityLock {
        self.locks.acquire(key)
    }

    /// Run a mutation against a copy of the collection and persist it.
    ///
    /// The commit mutex serializes concurrent commits; the cache is swapped
    /// to the mutated copy only after the store accepted the save. If the
    /// closure fails, nothing is saved; if the save fails, the cache keeps
    /// the previous snapshot.
    pub fn commit<R>(
        &self,
        mutate: impl FnOnce(&mut Vec<T>) -> PlatformResult<R>,
    ) -> PlatformResult<R> {
        let _serial = self.commit_lock.lock();

        let mut working: Vec<T> = self.cache.read().as_ref().clone();
        let out = mutate(&mut working)?;

        let bytes = serde_json::to_vec_pretty(&working).map_err(|e| {
            PlatformError::Persistence(format!(
                "failed to encode {} collection: {e}",
                T::COLLECTION
            ))
        })?;
        self.store.save(T::COLLECTION, &bytes)?;

        *self.cache.write() = Arc::new(working);
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// Entity bindings
// ---------------------------------------------------------------------------

use shared_types::{
    CategoryOverride, DepositRequest, DropPoint, Product, RedemptionTransaction, User, UserId,
};

impl Persistable for User {
    type Key = UserId;
    const COLLECTION: Collection = Collection::Users;
    const ENTITY: &'static str = "user";

    fn key(&self) -> UserId {
        self.id
    }
}

impl Persistable for Product {
    type Key = u64;
    const COLLECTION: Collection = Collection::Products;
    const ENTITY: &'static str = "product";

    fn key(&self) -> u64 {
        self.id
    }
}

impl Persistable for DropPoint {
    type Key = u64;
    const COLLECTION: Collection = Collection::DropPoints;
    const ENTITY: &'static str = "drop point";

    fn key(&self) -> u64 {
        self.id
    }
}

impl Persistable for DepositRequest {
    type Key = u64;
    const COLLECTION: Collection = Collection::DepositRequests;
    const ENTITY: &'static str = "deposit request";

    fn key(&self) -> u64 {
        self.id
    }
}

impl Persistable for RedemptionTransaction {
    type Key = String;
    const COLLECTION: Collection = Collection::Transactions;
    const ENTITY: &'static str = "transaction";

    fn key(&self) -> String {
        self.id.clone()
    }
}

impl Persistable for CategoryOverride {
    type Key = UserId;
    const COLLECTION: Collection = Collection::Leaderboard;
    const ENTITY: &'static str = "leaderboard category";

    fn key(&self) -> UserId {
        self.user_id
    }
}
