#![forbid(unsafe_code)]

//! Reactive bindings from a remote keyed tree to views.
//!
//! A [`Binding`] subscribes a view to one location of a remote, mutable,
//! tree-structured data source, optionally filtered by a [`QuerySpec`],
//! caches the last successful result in a pluggable store, and decides on
//! every prop/state transition whether the view needs to re-render.
//!
//! The moving parts, leaf to root:
//!
//! - [`compile::apply_query`]: translates a [`QuerySpec`] into an ordered
//!   chain of calls on an opaque remote handle.
//! - [`cache`]: deterministic cache keys plus best-effort read/write against
//!   any [`KeyValueStore`](treebind_core::KeyValueStore).
//! - [`subscribe::SubscriptionManager`]: exactly one live remote subscription
//!   per binding, with epoch tagging to discard stale in-flight callbacks.
//! - [`state::BindingState`]: the `Pending` → `FromCache` → `Live` loading
//!   lifecycle.
//! - [`render::render_decision`]: structural-equality re-render gate.
//! - [`Binding`]: the orchestrator tying the above to a [`View`].
//!
//! # Invariants
//!
//! 1. At most one live remote subscription exists per binding; opening a new
//!    one always releases the previous one first.
//! 2. `Live` status never reverts within a subscription epoch; a path/query
//!    change starts a new epoch back at `Pending`.
//! 3. A callback tagged with a stale epoch never mutates binding state.
//! 4. Cache failures are logged and swallowed; they never block or break the
//!    live-data path and never alter the load status.
//! 5. All change detection is structural. Remote payloads are freshly
//!    deserialized on every callback, so identity comparison is meaningless.

pub mod binding;
pub mod cache;
pub mod compile;
pub mod config;
pub mod render;
pub mod state;
pub mod subscribe;
pub mod view;

pub use binding::{Binding, BindingOptions};
pub use cache::CacheRead;
pub use config::BindingConfig;
pub use render::{RenderReason, render_decision, should_render};
pub use state::{BindingState, LoadStatus};
pub use subscribe::{Epoch, SubscriptionManager};
pub use treebind_core::{ConfigError, QuerySpec, Snapshot};
pub use view::{Loader, Props, View, ViewProps};
