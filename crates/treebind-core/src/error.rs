#![forbid(unsafe_code)]

//! Error types shared across the treebind crates.
//!
//! Two distinct propagation policies apply:
//!
//! - [`ConfigError`] is fatal: a binding refuses to mount or update with an
//!   invalid configuration rather than silently subscribing to an undefined
//!   location.
//! - [`StoreError`] is advisory: the local cache is strictly best-effort, so
//!   store failures are caught at the cache-adapter boundary, logged, and
//!   never surfaced to the binding's caller.

use thiserror::Error;

/// Fatal configuration errors, reported at mount/update time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The binding path was empty. Subscribing to an undefined location is
    /// refused outright.
    #[error("binding path must not be empty")]
    EmptyPath,
}

/// Failures reported by a [`KeyValueStore`](crate::KeyValueStore) write.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failure (file-backed stores).
    #[error("store I/O failure: {0}")]
    Io(#[from] std::io::Error),
    /// The stored payload could not be serialized or re-read.
    #[error("store serialization failure: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The store refused the write (quota, read-only backend, ...).
    #[error("store rejected write: {0}")]
    Rejected(String),
}
