#![forbid(unsafe_code)]

//! Query compiler: a [`QuerySpec`] becomes an ordered chain of handle calls.

use treebind_core::{QueryHandle, QuerySpec};

/// Apply `spec` to `handle`, one chained call per present field.
///
/// The remote API is order-sensitive for combinable constraints, so the
/// application order is fixed: `start_at`, `equal_to`, `end_at`,
/// `order_by_value`, `order_by_priority`, `order_by_key`, `order_by_child`,
/// `limit_to_last`, `limit_to_first`. Absent fields contribute nothing.
///
/// Mutually exclusive combinations (several `order_by_*` variants) are not
/// validated here; the fixed order makes the last applied call win.
#[must_use]
pub fn apply_query<H: QueryHandle>(mut handle: H, spec: &QuerySpec) -> H {
    if let Some(value) = &spec.start_at {
        handle = handle.start_at(value.clone());
    }
    if let Some(equal) = &spec.equal_to {
        handle = handle.equal_to(equal.value.clone(), equal.key.clone());
    }
    if let Some(value) = &spec.end_at {
        handle = handle.end_at(value.clone());
    }
    if spec.order_by_value {
        handle = handle.order_by_value();
    }
    if spec.order_by_priority {
        handle = handle.order_by_priority();
    }
    if spec.order_by_key {
        handle = handle.order_by_key();
    }
    if let Some(child) = &spec.order_by_child {
        handle = handle.order_by_child(child);
    }
    if let Some(n) = spec.limit_to_last {
        handle = handle.limit_to_last(n);
    }
    if let Some(n) = spec.limit_to_first {
        handle = handle.limit_to_first(n);
    }
    handle
}
