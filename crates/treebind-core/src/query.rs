#![forbid(unsafe_code)]

//! Declarative filter/order/limit specification for a remote query.
//!
//! A [`QuerySpec`] describes *what* to constrain; the engine's query compiler
//! decides *in which order* the constraints are applied to a remote handle
//! (the underlying API is order-sensitive for combinable constraints).
//!
//! # Invariants
//!
//! 1. **Structural equality**: two specs are "the same" iff they are
//!    field-wise equal. Identity never matters; specs are rebuilt freshly on
//!    every render pass.
//!
//! 2. **Canonical serialization**: absent fields serialize to nothing, so
//!    structurally equal specs always produce byte-identical JSON. Cache keys
//!    rely on this.
//!
//! 3. **No mutual-exclusion validation**: at most one `order_by_*` variant is
//!    meaningful, but setting several is not rejected here; the compiler's
//!    fixed application order makes the last applied one win.

use serde::{Deserialize, Serialize};
use serde_json::Value;

fn is_false(flag: &bool) -> bool {
    !flag
}

/// `equal_to` constraint: match entries whose ordered value equals `value`,
/// optionally disambiguated by `key`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EqualTo {
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// Declarative filter/order/limit description, compiled into chained calls on
/// a remote [`QueryHandle`](crate::QueryHandle).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_at: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_at: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equal_to: Option<EqualTo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_to_first: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_to_last: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by_child: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub order_by_key: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub order_by_priority: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub order_by_value: bool,
}

impl QuerySpec {
    /// Create an unconstrained spec.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain results to ordered values >= `value`.
    #[must_use]
    pub fn start_at(mut self, value: impl Into<Value>) -> Self {
        self.start_at = Some(value.into());
        self
    }

    /// Constrain results to ordered values <= `value`.
    #[must_use]
    pub fn end_at(mut self, value: impl Into<Value>) -> Self {
        self.end_at = Some(value.into());
        self
    }

    /// Constrain results to ordered values equal to `value`.
    #[must_use]
    pub fn equal_to(mut self, value: impl Into<Value>) -> Self {
        self.equal_to = Some(EqualTo {
            value: value.into(),
            key: None,
        });
        self
    }

    /// Constrain results to ordered values equal to `value`, starting at `key`.
    #[must_use]
    pub fn equal_to_key(mut self, value: impl Into<Value>, key: impl Into<String>) -> Self {
        self.equal_to = Some(EqualTo {
            value: value.into(),
            key: Some(key.into()),
        });
        self
    }

    /// Keep only the first `n` results.
    #[must_use]
    pub fn limit_to_first(mut self, n: u32) -> Self {
        self.limit_to_first = Some(n);
        self
    }

    /// Keep only the last `n` results.
    #[must_use]
    pub fn limit_to_last(mut self, n: u32) -> Self {
        self.limit_to_last = Some(n);
        self
    }

    /// Order by the named child field.
    #[must_use]
    pub fn order_by_child(mut self, child: impl Into<String>) -> Self {
        self.order_by_child = Some(child.into());
        self
    }

    /// Order by entry key.
    #[must_use]
    pub fn order_by_key(mut self) -> Self {
        self.order_by_key = true;
        self
    }

    /// Order by entry priority.
    #[must_use]
    pub fn order_by_priority(mut self) -> Self {
        self.order_by_priority = true;
        self
    }

    /// Order by entry value.
    #[must_use]
    pub fn order_by_value(mut self) -> Self {
        self.order_by_value = true;
        self
    }

    /// Whether the spec constrains anything at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
