#![forbid(unsafe_code)]

//! Binding configuration: the external surface of a mounted binding.

use std::collections::BTreeMap;

use serde_json::Value;
use treebind_core::{ConfigError, QuerySpec};

/// Configuration of one binding instance.
///
/// Immutable per render pass; a prop/state transition replaces it wholesale.
/// Structural equality (`PartialEq`) is what decides whether two configs are
/// "the same"; identity never matters.
///
/// `props` carries every externally supplied key the binding does not itself
/// recognize; they pass through unmodified to the wrapped view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BindingConfig {
    /// Remote location to subscribe to. Required; an empty path is a fatal
    /// configuration error.
    pub path: String,
    /// Filter/order/limit applied via the query compiler.
    pub query: Option<QuerySpec>,
    /// Enables local-cache read-through and write-behind.
    pub cache_locally: bool,
    /// Promotes lifecycle trace messages to `debug` level.
    pub debug: bool,
    /// Pass-through properties for the wrapped view.
    pub props: BTreeMap<String, Value>,
}

impl BindingConfig {
    /// Config subscribing to `path` with no query, no cache, no extra props.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Set the query spec.
    #[must_use]
    pub fn query(mut self, query: QuerySpec) -> Self {
        self.query = Some(query);
        self
    }

    /// Enable or disable the local-cache fast path.
    #[must_use]
    pub fn cache_locally(mut self, enabled: bool) -> Self {
        self.cache_locally = enabled;
        self
    }

    /// Enable or disable debug-level lifecycle logging.
    #[must_use]
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Add a pass-through property.
    #[must_use]
    pub fn prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    /// Reject configurations the binding refuses to mount with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.is_empty() {
            return Err(ConfigError::EmptyPath);
        }
        Ok(())
    }

    /// Whether `next` targets a different subscription (path or query changed
    /// structurally), which forces an epoch reset.
    #[must_use]
    pub fn retargets(&self, next: &Self) -> bool {
        self.path != next.path || self.query != next.query
    }
}
