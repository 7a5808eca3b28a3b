#![forbid(unsafe_code)]

//! Local cache adapter: deterministic keys, best-effort read/write.
//!
//! The cache exists purely to give a freshly mounted binding a synchronous
//! head start while the live subscription warms up. Every failure mode is
//! non-fatal:
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing key | First run, evicted entry | [`CacheRead::Miss`] |
//! | Malformed JSON | Schema drift, torn write | [`CacheRead::Corrupt`], logged |
//! | Write failure | Quota, store error | Logged at `warn`, swallowed |
//!
//! Keys are injective over (path, canonical query), so a shared store can
//! serve many bindings without collisions; two bindings on an identical
//! (path, query) pair share an entry with benign last-write-wins semantics.

use treebind_core::{KeyValueStore, QuerySpec, Snapshot};

/// Namespace prefix so cache entries coexist with other users of a store.
const KEY_PREFIX: &str = "treebind:";

/// Key segment for "no query constraints".
const NO_QUERY_TOKEN: &str = "all";

/// Outcome of a cache probe.
///
/// Modeled as a sum type rather than a nullable value so the "never
/// propagate" rule is visible at the type level: there is no error variant
/// to bubble up.
#[derive(Clone, Debug, PartialEq)]
pub enum CacheRead {
    /// A well-formed entry was found.
    Hit(Snapshot),
    /// No entry under this key.
    Miss,
    /// An entry existed but did not parse; it has been logged and ignored.
    Corrupt,
}

/// Deterministic cache key for a (path, query) pair.
///
/// Structurally equal queries yield identical keys (canonical JSON; absent
/// fields serialize to nothing), and differing paths or queries yield
/// differing keys.
#[must_use]
pub fn cache_key(path: &str, query: Option<&QuerySpec>) -> String {
    let query_part = match query {
        Some(spec) => serde_json::to_string(spec).unwrap_or_else(|_| String::from("{}")),
        None => String::from(NO_QUERY_TOKEN),
    };
    format!("{KEY_PREFIX}{path}:{query_part}")
}

/// Probe the store for a cached snapshot.
pub fn read(store: &dyn KeyValueStore, path: &str, query: Option<&QuerySpec>) -> CacheRead {
    let key = cache_key(path, query);
    let Some(raw) = store.get(&key) else {
        return CacheRead::Miss;
    };
    match serde_json::from_str::<Snapshot>(&raw) {
        Ok(snapshot) => CacheRead::Hit(snapshot),
        Err(err) => {
            tracing::warn!(path, error = %err, "ignoring corrupt cache entry");
            CacheRead::Corrupt
        }
    }
}

/// Persist `data` for a (path, query) pair. Best-effort: failures are logged
/// and swallowed, never propagated.
pub fn write(store: &dyn KeyValueStore, path: &str, query: Option<&QuerySpec>, data: &Snapshot) {
    let key = cache_key(path, query);
    let payload = match serde_json::to_string(data) {
        Ok(payload) => payload,
        Err(err) => {
            tracing::warn!(path, error = %err, "cache serialization failed");
            return;
        }
    };
    if let Err(err) = store.set(&key, &payload) {
        tracing::warn!(path, error = %err, "cache write failed");
    }
}
