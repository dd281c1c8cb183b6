//! Client-side key/value storage.
//!
//! A browser keeps client state in three places: cookies, local storage and
//! session storage. The storefront models them as three [`StorageArea`]s of a
//! single [`KeyValueStore`]. The CLI backs them with a JSON file
//! ([`FileStore`]); tests use [`MemoryStore`].

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Storage keys shared by the token store, auth session and cart session.
pub mod keys {
    /// Shopper bearer token (cookie area).
    pub const USER_TOKEN: &str = "userJwtToken";

    /// Admin bearer token (cookie and local areas).
    pub const ADMIN_TOKEN: &str = "adminJwtToken";

    /// Shopper profile JSON.
    pub const USER_PROFILE: &str = "user";

    /// Admin profile JSON.
    pub const ADMIN_PROFILE: &str = "admin";

    /// Refresh token handed out at login, if any.
    pub const REFRESH_TOKEN: &str = "refreshToken";

    /// Pending-cart snapshot written before a login redirect (session area).
    pub const CHECKOUT_CART: &str = "checkoutCart";

    /// Pending-cart snapshot under its older name (local area).
    pub const PENDING_CART: &str = "pendingCart";

    /// Where to go after logging in (session area).
    pub const RETURN_TO: &str = "returnTo";
}

/// One of the three client storage areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageArea {
    Cookie,
    Local,
    Session,
}

impl StorageArea {
    pub const ALL: [Self; 3] = [Self::Cookie, Self::Local, Self::Session];
}

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

/// A backend for the three storage areas.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, area: StorageArea, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, area: StorageArea, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, area: StorageArea, key: &str) -> Result<(), StorageError>;

    /// Delete every value in an area.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn clear(&self, area: StorageArea) -> Result<(), StorageError>;
}

type Areas = HashMap<StorageArea, BTreeMap<String, String>>;

fn lock(areas: &Mutex<Areas>) -> Result<MutexGuard<'_, Areas>, StorageError> {
    areas.lock().map_err(|_| StorageError::Poisoned)
}

// =============================================================================
// MemoryStore
// =============================================================================

/// Storage kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    areas: Mutex<Areas>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, area: StorageArea, key: &str) -> Result<Option<String>, StorageError> {
        Ok(lock(&self.areas)?
            .get(&area)
            .and_then(|values| values.get(key))
            .cloned())
    }

    fn set(&self, area: StorageArea, key: &str, value: &str) -> Result<(), StorageError> {
        lock(&self.areas)?
            .entry(area)
            .or_default()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, area: StorageArea, key: &str) -> Result<(), StorageError> {
        if let Some(values) = lock(&self.areas)?.get_mut(&area) {
            values.remove(key);
        }
        Ok(())
    }

    fn clear(&self, area: StorageArea) -> Result<(), StorageError> {
        lock(&self.areas)?.remove(&area);
        Ok(())
    }
}

// =============================================================================
// FileStore
// =============================================================================

/// Storage persisted as one JSON document.
///
/// The whole document is rewritten on every change. There is no locking
/// across processes.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    areas: Mutex<Areas>,
}

impl FileStore {
    /// Open a state file, starting empty if it does not exist.
    ///
    /// A file that cannot be parsed is treated as empty and will be
    /// overwritten on the next change.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let areas = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Discarding unreadable state file");
                Areas::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Areas::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), "Opened state file");
        Ok(Self {
            path,
            areas: Mutex::new(areas),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, areas: &Areas) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(areas)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, area: StorageArea, key: &str) -> Result<Option<String>, StorageError> {
        Ok(lock(&self.areas)?
            .get(&area)
            .and_then(|values| values.get(key))
            .cloned())
    }

    fn set(&self, area: StorageArea, key: &str, value: &str) -> Result<(), StorageError> {
        let mut areas = lock(&self.areas)?;
        areas
            .entry(area)
            .or_default()
            .insert(key.to_owned(), value.to_owned());
        self.persist(&areas)
    }

    fn remove(&self, area: StorageArea, key: &str) -> Result<(), StorageError> {
        let mut areas = lock(&self.areas)?;
        let removed = areas
            .get_mut(&area)
            .and_then(|values| values.remove(key))
            .is_some();
        if removed {
            self.persist(&areas)?;
        }
        Ok(())
    }

    fn clear(&self, area: StorageArea) -> Result<(), StorageError> {
        let mut areas = lock(&self.areas)?;
        if areas.remove(&area).is_some() {
            self.persist(&areas)?;
        }
        Ok(())
    }
}

// =============================================================================
// Storage handle
// =============================================================================

/// Shared handle to a storage backend.
///
/// Cheaply cloneable; all clones see the same backend.
#[derive(Clone)]
pub struct Storage {
    inner: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}

impl Storage {
    #[must_use]
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// In-memory storage.
    #[must_use]
    pub fn memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// File-backed storage.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read.
    pub fn file(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        Ok(Self::new(FileStore::open(path)?))
    }

    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn get(&self, area: StorageArea, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(area, key)
    }

    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    pub fn set(&self, area: StorageArea, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set(area, key, value)
    }

    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    pub fn remove(&self, area: StorageArea, key: &str) -> Result<(), StorageError> {
        self.inner.remove(area, key)
    }

    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    pub fn clear(&self, area: StorageArea) -> Result<(), StorageError> {
        self.inner.clear(area)
    }

    /// Read and decode a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Json`] if the stored value is not valid JSON
    /// for `T`.
    pub fn get_json<T: DeserializeOwned>(
        &self,
        area: StorageArea,
        key: &str,
    ) -> Result<Option<T>, StorageError> {
        self.get(area, key)?
            .map(|raw| serde_json::from_str(&raw).map_err(StorageError::from))
            .transpose()
    }

    /// Encode and write a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn set_json<T: Serialize>(
        &self,
        area: StorageArea,
        key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        self.set(area, key, &serde_json::to_string(value)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_areas_are_separate() {
        let storage = Storage::memory();
        storage.set(StorageArea::Cookie, "k", "cookie").unwrap();
        storage.set(StorageArea::Local, "k", "local").unwrap();

        assert_eq!(storage.get(StorageArea::Cookie, "k").unwrap().as_deref(), Some("cookie"));
        assert_eq!(storage.get(StorageArea::Local, "k").unwrap().as_deref(), Some("local"));
        assert_eq!(storage.get(StorageArea::Session, "k").unwrap(), None);

        storage.clear(StorageArea::Cookie).unwrap();
        assert_eq!(storage.get(StorageArea::Cookie, "k").unwrap(), None);
        assert!(storage.get(StorageArea::Local, "k").unwrap().is_some());
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let storage = Storage::memory();
        storage.remove(StorageArea::Session, keys::RETURN_TO).unwrap();
    }

    #[test]
    fn test_json_helpers() {
        let storage = Storage::memory();
        storage
            .set_json(StorageArea::Local, "n", &vec![1, 2, 3])
            .unwrap();
        let back: Option<Vec<u32>> = storage.get_json(StorageArea::Local, "n").unwrap();
        assert_eq!(back, Some(vec![1, 2, 3]));

        storage.set(StorageArea::Local, "bad", "{not json").unwrap();
        assert!(matches!(
            storage.get_json::<Vec<u32>>(StorageArea::Local, "bad"),
            Err(StorageError::Json(_))
        ));
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let storage = Storage::file(&path).unwrap();
        storage.set(StorageArea::Cookie, keys::USER_TOKEN, "abc").unwrap();
        storage.set(StorageArea::Session, keys::RETURN_TO, "/cart").unwrap();
        drop(storage);

        let reopened = Storage::file(&path).unwrap();
        assert_eq!(
            reopened.get(StorageArea::Cookie, keys::USER_TOKEN).unwrap().as_deref(),
            Some("abc")
        );
        reopened.clear(StorageArea::Session).unwrap();
        drop(reopened);

        let again = FileStore::open(&path).unwrap();
        assert_eq!(again.get(StorageArea::Session, keys::RETURN_TO).unwrap(), None);
        assert_eq!(again.path(), path.as_path());
    }

    #[test]
    fn test_file_store_tolerates_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "garbage").unwrap();

        let storage = Storage::file(&path).unwrap();
        assert_eq!(storage.get(StorageArea::Local, "x").unwrap(), None);
        storage.set(StorageArea::Local, "x", "1").unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("\"local\""));
    }
}
