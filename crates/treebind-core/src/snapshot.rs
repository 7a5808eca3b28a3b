#![forbid(unsafe_code)]

//! Point-in-time keyed collection returned by the remote source.
//!
//! # Invariants
//!
//! 1. **Empty is a value**: a path with zero items yields an empty snapshot,
//!    which is distinct from "no snapshot yet" (`Option::None` at the
//!    binding-state level).
//!
//! 2. **Deterministic order**: entries are kept in a `BTreeMap`, so iteration
//!    and serialization order are stable. Cache round-trips depend on this.
//!
//! 3. **Structural equality**: snapshots compare by content. Remote payloads
//!    are freshly deserialized on every callback, so identity comparison
//!    would always register "changed".

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Keyed item collection for a (path, query) subscription.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    entries: BTreeMap<String, Value>,
}

impl Snapshot {
    /// Create an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize a raw remote payload into a snapshot.
    ///
    /// - absent or `null` payloads become the empty snapshot ("no children"
    ///   and "path has zero items" are the same thing),
    /// - objects map entries one-to-one,
    /// - arrays become index-keyed entries (`null` holes are skipped, matching
    ///   the remote source's sparse-array representation),
    /// - scalar leaves have no children, so they also normalize to empty.
    #[must_use]
    pub fn from_remote(payload: Option<Value>) -> Self {
        match payload {
            None | Some(Value::Null) => Self::new(),
            Some(Value::Object(map)) => map.into_iter().collect(),
            Some(Value::Array(items)) => items
                .into_iter()
                .enumerate()
                .filter(|(_, item)| !item.is_null())
                .map(|(index, item)| (index.to_string(), item))
                .collect(),
            Some(_) => Self::new(),
        }
    }

    /// Look up an item by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Insert an item, replacing any previous value under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate items in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }
}

impl FromIterator<(String, Value)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
