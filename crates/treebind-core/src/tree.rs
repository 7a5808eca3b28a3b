#![forbid(unsafe_code)]

//! Capability seam over the remote, subscribable key-value tree.
//!
//! The remote data source is opaque to the binding engine: any transport that
//! can resolve a path to a [`QueryHandle`], apply the chainable constraints,
//! and deliver value-change events is substitutable. This is what makes the
//! lifecycle deterministic to test (see `fake::FakeTree` under the
//! `test-helpers` feature).
//!
//! # Invariants
//!
//! 1. Chain methods consume and return the handle, so a compiled query is a
//!    single expression and partial application cannot leak.
//!
//! 2. [`QueryHandle::on_value`] registers exactly one listener and returns the
//!    closure that detaches exactly that listener. Transports must tolerate
//!    detach running after the source itself is gone.
//!
//! 3. Transports deliver updates on a single ordered callback channel; no two
//!    callbacks for the same listener run concurrently.

use std::rc::Rc;

use serde_json::Value;

/// Callback invoked with the raw payload on every value-change event.
///
/// `None` means the path currently holds nothing; the engine normalizes that
/// to an empty [`Snapshot`](crate::Snapshot).
pub type ValueCallback = Rc<dyn Fn(Option<Value>)>;

/// Detaches the listener registered by [`QueryHandle::on_value`].
pub type Detach = Box<dyn FnOnce()>;

/// A remote location with chainable query constraints.
///
/// The chain methods are order-sensitive on real transports; callers are
/// expected to apply them through the engine's query compiler rather than
/// ad hoc.
pub trait QueryHandle: Sized {
    fn start_at(self, value: Value) -> Self;
    fn equal_to(self, value: Value, key: Option<String>) -> Self;
    fn end_at(self, value: Value) -> Self;
    fn order_by_value(self) -> Self;
    fn order_by_priority(self) -> Self;
    fn order_by_key(self) -> Self;
    fn order_by_child(self, child: &str) -> Self;
    fn limit_to_last(self, n: u32) -> Self;
    fn limit_to_first(self, n: u32) -> Self;

    /// Register `callback` for value-change events and return the detach
    /// closure for exactly this registration.
    fn on_value(self, callback: ValueCallback) -> Detach;
}

/// The remote tree: resolves paths to query handles.
pub trait RemoteTree {
    type Handle: QueryHandle;

    /// Resolve `path` to a fresh, unconstrained handle.
    fn reference(&self, path: &str) -> Self::Handle;
}
