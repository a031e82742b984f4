//! Flat-file JSON store.
//!
//! One pretty-printed JSON file per collection in a single data directory.
//! Saves go through a temp file plus rename so a crash mid-write can never
//! leave a half-written collection behind. An fs2 advisory lock on a `LOCK`
//! file keeps a second process from opening the same directory.

use crate::collection::Collection;
use crate::ports::CollectionStore;
use fs2::FileExt;
use shared_types::{PlatformError, PlatformResult};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Directory-of-JSON-files store.
pub struct JsonFileStore {
    dir: PathBuf,
    /// Held for the store's lifetime; released when the store is dropped.
    _lock: File,
}

impl JsonFileStore {
    /// Open (creating if needed) a data directory and take its lock.
    pub fn open(dir: impl Into<PathBuf>) -> PlatformResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| PlatformError::Persistence(format!("create {}: {e}", dir.display())))?;

        let lock_path = dir.join("LOCK");
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| PlatformError::Persistence(format!("open LOCK file: {e}")))?;
        lock.try_lock_exclusive().map_err(|e| {
            PlatformError::Persistence(format!(
                "data directory {} is locked by another process: {e}",
                dir.display()
            ))
        })?;

        info!(dir = %dir.display(), "Opened flat-file store");
        Ok(Self { dir, _lock: lock })
    }

    fn path_for(&self, collection: Collection) -> PathBuf {
        self.dir.join(collection.file_name())
    }
}

impl CollectionStore for JsonFileStore {
    fn load(&self, collection: Collection) -> PlatformResult<Option<Vec<u8>>> {
        let path = self.path_for(collection);
        match fs::read(&path) {
            Ok(bytes) => {
                debug!(collection = %collection, bytes = bytes.len(), "Collection loaded");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PlatformError::Persistence(format!(
                "read {}: {e}",
                path.display()
            ))),
        }
    }

    fn save(&self, collection: Collection, bytes: &[u8]) -> PlatformResult<()> {
        let path = self.path_for(collection);
        let tmp = self.dir.join(format!("{}.tmp", collection.file_name()));

        let write_result = (|| {
            let mut file = File::create(&tmp)?;
            file.write_all(bytes)?;
            file.sync_all()?;
            fs::rename(&tmp, &path)
        })();

        match write_result {
            Ok(()) => {
                debug!(collection = %collection, bytes = bytes.len(), "Collection saved");
                Ok(())
            }
            Err(e) => {
                warn!(collection = %collection, error = %e, "Collection save failed");
                let _ = fs::remove_file(&tmp);
                Err(PlatformError::Persistence(format!(
                    "write {}: {e}",
                    path.display()
                )))
            }
        }
    }
}
