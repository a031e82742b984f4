//! Store abstraction.

use crate::collection::Collection;
use shared_types::PlatformResult;

/// Whole-collection persistence.
///
/// The contract is deliberately minimal: load a full collection, save a full
/// collection, nothing else. No partial updates and no transactions - the
/// repository layer above owns read-modify-write atomicity.
pub trait CollectionStore: Send + Sync {
    /// Load the raw bytes of a collection. `None` means the collection has
    /// never been written, which callers treat as empty.
    fn load(&self, collection: Collection) -> PlatformResult<Option<Vec<u8>>>;

    /// Durably replace the whole collection.
    fn save(&self, collection: Collection, bytes: &[u8]) -> PlatformResult<()>;
}
