//! Register state inspection and cleanup.
//!
//! # Usage
//!
//! ```bash
//! # Show all persisted documents
//! ct-cli state show --state-dir ./state
//!
//! # Clear just the saved-cart shelf
//! ct-cli state clear --state-dir ./state --key saved-carts
//! ```
//!
//! Documents are shown as their raw envelopes (`{"version": ..., "data":
//! ...}`) so a schema mismatch is visible instead of silently discarded the
//! way the terminal treats it on load.

use std::path::Path;

use thiserror::Error;

use countertop_register::{FileStore, StateKey, StateStore, StoreError};

/// Errors that can occur during state operations.
#[derive(Debug, Error)]
pub enum StateCmdError {
    /// The state store could not be opened or accessed.
    #[error("State store error: {0}")]
    Store(#[from] StoreError),

    /// A persisted document is not valid JSON.
    #[error("Unreadable document {key}: {source}")]
    Unreadable {
        key: StateKey,
        source: serde_json::Error,
    },
}

/// Pretty-print every persisted register document.
///
/// # Errors
///
/// Returns an error if the store cannot be read or a document is not JSON.
pub fn show(state_dir: &Path) -> Result<(), StateCmdError> {
    let store = FileStore::open(state_dir)?;

    for key in StateKey::ALL {
        match store.read(key)? {
            None => tracing::info!("{key}: <absent>"),
            Some(document) => {
                let value: serde_json::Value = serde_json::from_str(&document)
                    .map_err(|source| StateCmdError::Unreadable { key, source })?;
                let pretty = serde_json::to_string_pretty(&value)
                    .map_err(|source| StateCmdError::Unreadable { key, source })?;
                tracing::info!("{key}:\n{pretty}");
            }
        }
    }

    Ok(())
}

/// Delete persisted register documents - one key, or all of them.
///
/// # Errors
///
/// Returns an error if a document cannot be deleted.
pub fn clear(state_dir: &Path, key: Option<StateKey>) -> Result<(), StateCmdError> {
    let store = FileStore::open(state_dir)?;

    let keys: &[StateKey] = match key {
        Some(ref single) => std::slice::from_ref(single),
        None => &StateKey::ALL,
    };

    for key in keys {
        store.delete(*key)?;
        tracing::info!("{key}: cleared");
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use countertop_register::{save_state, StateKey};

    use super::*;

    #[test]
    fn test_clear_single_key_leaves_others() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        save_state(&store, StateKey::Cart, &vec![1u32]).unwrap();
        save_state(&store, StateKey::SavedCarts, &vec![2u32]).unwrap();

        clear(dir.path(), Some(StateKey::Cart)).unwrap();

        let store = FileStore::open(dir.path()).unwrap();
        assert!(store.read(StateKey::Cart).unwrap().is_none());
        assert!(store.read(StateKey::SavedCarts).unwrap().is_some());
    }

    #[test]
    fn test_clear_all_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        save_state(&store, StateKey::Cart, &vec![1u32]).unwrap();
        save_state(&store, StateKey::Customer, &Some("walk-in")).unwrap();

        clear(dir.path(), None).unwrap();

        for key in StateKey::ALL {
            assert!(store.read(key).unwrap().is_none());
        }
    }

    #[test]
    fn test_show_tolerates_absent_documents() {
        let dir = tempfile::tempdir().unwrap();
        show(dir.path()).unwrap();
    }
}
