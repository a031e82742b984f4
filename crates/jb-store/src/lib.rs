//! # jb-store
//!
//! Persistence for the points platform.
//!
//! ## Role in System
//!
//! The durable store is a directory of flat JSON files, one per entity
//! collection, and it only supports whole-collection load/save - there is no
//! partial-update primitive. Everything that makes that safe to use under
//! concurrent requests lives here:
//!
//! - [`ports::CollectionStore`] - the load/save seam, with a file-backed
//!   adapter for deployment and an in-memory adapter for tests
//! - [`repository::Repository`] - snapshot cache plus serialized
//!   read-modify-write commits and per-entity locks, so workflows never
//!   touch raw collections
//!
//! A failed save never corrupts the view: the repository keeps serving the
//! last snapshot that was durably written.

pub mod adapters;
pub mod collection;
pub mod ports;
pub mod repository;

pub use adapters::{InMemoryStore, JsonFileStore};
pub use collection::Collection;
pub use ports::CollectionStore;
pub use repository::{EntityLock, LockRegistry, Persistable, Repository};
