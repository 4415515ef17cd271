//! Per-file reader/writer locking.
//!
//! Two layers guard each category file: an in-process `RwLock` from a
//! registry keyed by path (threads of one process), and an advisory
//! `fd_lock::RwLock` on a sidecar lock file (separate processes).

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex, PoisonError, RwLock};

use tracker_core::StoreError;

static REGISTRY: LazyLock<Mutex<HashMap<PathBuf, Arc<RwLock<()>>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

fn process_lock(path: &Path) -> Arc<RwLock<()>> {
    let mut registry = REGISTRY.lock().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(registry.entry(path.to_path_buf()).or_default())
}

fn open_lock_file(lock_path: &Path) -> Result<fd_lock::RwLock<std::fs::File>, StoreError> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(lock_path)
        .map_err(|source| StoreError::Io {
            path: lock_path.to_path_buf(),
            source,
        })?;
    Ok(fd_lock::RwLock::new(file))
}

fn lock_error(lock_path: &Path, err: std::io::Error) -> StoreError {
    StoreError::Lock {
        path: lock_path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Run `f` while holding a shared lock on `lock_path`.
pub(crate) fn with_shared<T>(
    lock_path: &Path,
    f: impl FnOnce() -> Result<T, StoreError>,
) -> Result<T, StoreError> {
    let in_process = process_lock(lock_path);
    // The guarded data is `()`, so a poisoned lock carries no broken state.
    let _local = in_process.read().unwrap_or_else(PoisonError::into_inner);

    let lock = open_lock_file(lock_path)?;
    let _guard = lock.read().map_err(|e| lock_error(lock_path, e))?;
    tracing::trace!(lock = %lock_path.display(), "acquired shared lock");
    f()
}

/// Run `f` while holding an exclusive lock on `lock_path`.
pub(crate) fn with_exclusive<T>(
    lock_path: &Path,
    f: impl FnOnce() -> Result<T, StoreError>,
) -> Result<T, StoreError> {
    let in_process = process_lock(lock_path);
    let _local = in_process.write().unwrap_or_else(PoisonError::into_inner);

    let mut lock = open_lock_file(lock_path)?;
    let _guard = lock.write().map_err(|e| lock_error(lock_path, e))?;
    tracing::trace!(lock = %lock_path.display(), "acquired exclusive lock");
    f()
}
