//! In-memory implementation of `CollectionStore` for testing.
//!
//! Besides plain storage it can inject save failures for one collection (or
//! all of them), which is how the rollback paths of the workflows get
//! exercised without a real disk.

use crate::collection::Collection;
use crate::ports::CollectionStore;
use parking_lot::RwLock;
use shared_types::{PlatformError, PlatformResult};
use std::collections::HashMap;

/// Failure-injectable in-memory store.
#[derive(Default)]
pub struct InMemoryStore {
    data: RwLock<HashMap<Collection, Vec<u8>>>,
    /// When set, saves against the named collection (or all, for `All`)
    /// fail with a persistence error.
    failing: RwLock<Option<FailureScope>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FailureScope {
    All,
    One(Collection),
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make saves fail: `Some(collection)` fails only that collection,
    /// `None` clears any injected failure.
    pub fn fail_saves_for(&self, collection: Option<Collection>) {
        *self.failing.write() = collection.map(FailureScope::One);
    }

    /// Make every save fail until cleared with `fail_saves_for(None)`.
    pub fn fail_all_saves(&self) {
        *self.failing.write() = Some(FailureScope::All);
    }

    fn should_fail(&self, collection: Collection) -> bool {
        match *self.failing.read() {
            Some(FailureScope::All) => true,
            Some(FailureScope::One(c)) => c == collection,
            None => false,
        }
    }
}

impl CollectionStore for InMemoryStore {
    fn load(&self, collection: Collection) -> PlatformResult<Option<Vec<u8>>> {
        Ok(self.data.read().get(&collection).cloned())
    }

    fn save(&self, collection: Collection, bytes: &[u8]) -> PlatformResult<()> {
        if self.should_fail(collection) {
            return Err(PlatformError::Persistence(format!(
                "injected save failure for {collection}"
            )));
        }
        self.data.write().insert(collection, bytes.to_vec());
        Ok(())
    }
}
