//! On-device state persistence.
//!
//! The register mirrors its state into three JSON documents, one per
//! [`StateKey`]. Every document is wrapped in a versioned envelope:
//!
//! ```json
//! { "version": 1, "data": ... }
//! ```
//!
//! A missing document, a parse failure, or a version mismatch all load as
//! "no prior state". Corrupt and mismatched documents are logged at WARN
//! and deleted so they cannot poison the next load.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

/// Current schema version for all state documents.
pub const SCHEMA_VERSION: u32 = 1;

/// The three persisted register documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    /// The active cart line sequence.
    Cart,
    /// The selected customer (null for walk-in).
    Customer,
    /// The saved-cart shelf.
    SavedCarts,
}

impl StateKey {
    /// All keys, in display order.
    pub const ALL: [Self; 3] = [Self::Cart, Self::Customer, Self::SavedCarts];

    /// File stem of the backing document.
    #[must_use]
    pub const fn file_stem(self) -> &'static str {
        match self {
            Self::Cart => "cart",
            Self::Customer => "customer",
            Self::SavedCarts => "saved_carts",
        }
    }
}

impl core::fmt::Display for StateKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.file_stem())
    }
}

/// Errors from the state store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("state i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding state to JSON failed.
    #[error("state encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Raw document storage keyed by [`StateKey`].
///
/// Implementations store opaque JSON documents; envelope versioning and the
/// discard policy live in [`load_state`] / [`save_state`] so every store
/// behaves identically.
pub trait StateStore: Send + Sync {
    /// Read the raw document for `key`, if present.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the backing storage cannot be read.
    fn read(&self, key: StateKey) -> Result<Option<String>, StoreError>;

    /// Replace the document for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the document cannot be written.
    fn write(&self, key: StateKey, document: &str) -> Result<(), StoreError>;

    /// Delete the document for `key`. Deleting an absent document is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the backing storage cannot be modified.
    fn delete(&self, key: StateKey) -> Result<(), StoreError>;
}

impl<S: StateStore + ?Sized> StateStore for &S {
    fn read(&self, key: StateKey) -> Result<Option<String>, StoreError> {
        (**self).read(key)
    }

    fn write(&self, key: StateKey, document: &str) -> Result<(), StoreError> {
        (**self).write(key, document)
    }

    fn delete(&self, key: StateKey) -> Result<(), StoreError> {
        (**self).delete(key)
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
struct Envelope {
    version: u32,
    data: serde_json::Value,
}

/// Load and unwrap a state document.
///
/// Returns `Ok(None)` when there is no usable prior state: the document is
/// absent, unparseable, from a different schema version, or its payload no
/// longer matches `T`. The unusable document is deleted.
///
/// # Errors
///
/// Returns an error only for I/O failures; corruption is a discard, not an
/// error.
pub fn load_state<T: DeserializeOwned>(
    store: &dyn StateStore,
    key: StateKey,
) -> Result<Option<T>, StoreError> {
    let Some(document) = store.read(key)? else {
        return Ok(None);
    };

    let envelope: Envelope = match serde_json::from_str(&document) {
        Ok(envelope) => envelope,
        Err(error) => {
            warn!(%key, %error, "discarding unparseable state document");
            store.delete(key)?;
            return Ok(None);
        }
    };

    if envelope.version != SCHEMA_VERSION {
        warn!(
            %key,
            found = envelope.version,
            expected = SCHEMA_VERSION,
            "discarding state document from another schema version"
        );
        store.delete(key)?;
        return Ok(None);
    }

    match serde_json::from_value(envelope.data) {
        Ok(value) => Ok(Some(value)),
        Err(error) => {
            warn!(%key, %error, "discarding state document with mismatched payload");
            store.delete(key)?;
            Ok(None)
        }
    }
}

/// Wrap a value in the versioned envelope and persist it.
///
/// # Errors
///
/// Returns an error if the value cannot be encoded or the document cannot
/// be written.
pub fn save_state<T: Serialize>(
    store: &dyn StateStore,
    key: StateKey,
    value: &T,
) -> Result<(), StoreError> {
    let envelope = Envelope {
        version: SCHEMA_VERSION,
        data: serde_json::to_value(value)?,
    };
    store.write(key, &serde_json::to_string_pretty(&envelope)?)
}

// =============================================================================
// FileStore
// =============================================================================

/// File-backed store: one `<key>.json` per key under a state directory.
///
/// Writes land in a temp file in the same directory and are renamed into
/// place, so a crash mid-write leaves the previous document intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The state directory this store writes under.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: StateKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.file_stem()))
    }
}

impl StateStore for FileStore {
    fn read(&self, key: StateKey) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path(key)) {
            Ok(document) => Ok(Some(document)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn write(&self, key: StateKey, document: &str) -> Result<(), StoreError> {
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(document.as_bytes())?;
        tmp.persist(self.path(key)).map_err(|error| error.error)?;
        Ok(())
    }

    fn delete(&self, key: StateKey) -> Result<(), StoreError> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

// =============================================================================
// MemoryStore
// =============================================================================

/// In-memory store for tests and ephemeral registers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: Mutex<HashMap<StateKey, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn read(&self, key: StateKey) -> Result<Option<String>, StoreError> {
        Ok(self
            .docs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&key)
            .cloned())
    }

    fn write(&self, key: StateKey, document: &str) -> Result<(), StoreError> {
        self.docs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key, document.to_string());
        Ok(())
    }

    fn delete(&self, key: StateKey) -> Result<(), StoreError> {
        self.docs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(&key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        save_state(&store, StateKey::Cart, &vec![1u32, 2, 3]).unwrap();
        let restored: Option<Vec<u32>> = load_state(&store, StateKey::Cart).unwrap();
        assert_eq!(restored, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_missing_document_loads_as_none() {
        let store = MemoryStore::new();
        let restored: Option<Vec<u32>> = load_state(&store, StateKey::Cart).unwrap();
        assert_eq!(restored, None);
    }

    #[test]
    fn test_corrupt_document_is_discarded() {
        let store = MemoryStore::new();
        store.write(StateKey::Cart, "{not json").unwrap();

        let restored: Option<Vec<u32>> = load_state(&store, StateKey::Cart).unwrap();
        assert_eq!(restored, None);
        // The corrupt document is gone, not left to fail again.
        assert!(store.read(StateKey::Cart).unwrap().is_none());
    }

    #[test]
    fn test_version_mismatch_is_discarded() {
        let store = MemoryStore::new();
        store
            .write(StateKey::SavedCarts, r#"{"version":99,"data":[]}"#)
            .unwrap();

        let restored: Option<Vec<u32>> = load_state(&store, StateKey::SavedCarts).unwrap();
        assert_eq!(restored, None);
        assert!(store.read(StateKey::SavedCarts).unwrap().is_none());
    }

    #[test]
    fn test_mismatched_payload_is_discarded() {
        let store = MemoryStore::new();
        store
            .write(StateKey::Cart, r#"{"version":1,"data":"not a list"}"#)
            .unwrap();

        let restored: Option<Vec<u32>> = load_state(&store, StateKey::Cart).unwrap();
        assert_eq!(restored, None);
    }

    #[test]
    fn test_file_store_delete_absent_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.delete(StateKey::Customer).unwrap();
    }

    #[test]
    fn test_file_store_overwrite_replaces_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        save_state(&store, StateKey::Customer, &"alice").unwrap();
        save_state(&store, StateKey::Customer, &"bob").unwrap();

        let restored: Option<String> = load_state(&store, StateKey::Customer).unwrap();
        assert_eq!(restored.as_deref(), Some("bob"));
    }
}
