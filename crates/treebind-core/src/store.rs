#![forbid(unsafe_code)]

//! Pluggable persistent key-value stores for the local cache.
//!
//! The cache adapter in the engine crate treats every store as best-effort:
//! read misses are normal, write failures are logged and swallowed. Stores
//! therefore keep their contract minimal: string in, string out.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing key | First run, evicted entry | `get` returns `None` |
//! | Unreadable backend | Corrupt/locked file | `get` returns `None` |
//! | Rejected write | Quota, read-only backend | `set` returns `Err`, caller logs |

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::StoreError;

/// Persistent key-value capability used by the local cache.
///
/// A store may be shared across many binding instances; cache keys are
/// per-(path, query), so cross-binding collisions are impossible and
/// same-key writes are benign last-write-wins.
pub trait KeyValueStore {
    /// Look up a stored value. Absence is not an error.
    fn get(&self, key: &str) -> Option<String>;

    /// Store a value under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Shared in-memory store, the default cache backend.
///
/// Cloning shares the underlying map, so several bindings handed clones of
/// the same `MemoryStore` see each other's writes.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// JSON-file-backed store for cross-session cache persistence.
///
/// The whole store is one JSON object on disk, re-read on every `get` and
/// rewritten on every `set`. Cache traffic is low (one write per live update
/// per binding) and the file stays human-inspectable.
#[cfg(feature = "file-store")]
#[derive(Clone, Debug)]
pub struct FileStore {
    path: std::path::PathBuf,
}

#[cfg(feature = "file-store")]
impl FileStore {
    /// Create a store backed by the JSON file at `path`. The file is created
    /// on first write.
    #[must_use]
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Option<HashMap<String, String>> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&raw).ok()
    }
}

#[cfg(feature = "file-store")]
impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.load()?.remove(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.load().unwrap_or_default();
        entries.insert(key.to_owned(), value.to_owned());
        let raw = serde_json::to_string(&entries)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}
