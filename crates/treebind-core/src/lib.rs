#![forbid(unsafe_code)]

//! Data model and capability seams for treebind.
//!
//! This crate provides:
//! - [`QuerySpec`]: declarative filter/order/limit description of a remote query
//! - [`Snapshot`]: point-in-time keyed collection for a (path, query) pair
//! - [`RemoteTree`] / [`QueryHandle`]: the capability seam over the remote,
//!   subscribable key-value tree
//! - [`KeyValueStore`]: the persistence seam, with [`MemoryStore`] and
//!   (feature `file-store`) a JSON-file backend
//! - [`FakeTree`](fake::FakeTree) (feature `test-helpers`): a deterministic
//!   in-memory transport for testing binding lifecycles
//!
//! The binding engine itself lives in the `treebind` crate; everything here is
//! deliberately free of lifecycle logic so that alternate transports and
//! stores can be substituted behind the traits.

pub mod error;
#[cfg(any(test, feature = "test-helpers"))]
pub mod fake;
pub mod query;
pub mod snapshot;
pub mod store;
pub mod tree;

pub use error::{ConfigError, StoreError};
pub use query::{EqualTo, QuerySpec};
pub use snapshot::Snapshot;
#[cfg(feature = "file-store")]
pub use store::FileStore;
pub use store::{KeyValueStore, MemoryStore};
pub use tree::{Detach, QueryHandle, RemoteTree, ValueCallback};
