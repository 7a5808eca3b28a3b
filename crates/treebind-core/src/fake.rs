#![forbid(unsafe_code)]

//! Deterministic in-memory transport for lifecycle tests.
//!
//! `FakeTree` implements [`RemoteTree`] without any notion of time: it never
//! fires a callback on registration, and only delivers payloads when a test
//! calls [`FakeTree::put`] or [`FakeTree::clear`]. Every handle records the
//! chain calls applied to it, so tests can assert the exact constraint order
//! the query compiler produced.
//!
//! Released listeners are kept (marked inactive) rather than removed. That
//! lets tests both count live listeners and simulate the stale-delivery race
//! via [`FakeTree::deliver_stale`]: a payload handed to a listener whose
//! detach already ran, as happens when an in-flight update crosses a release.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use crate::tree::{Detach, QueryHandle, RemoteTree, ValueCallback};

/// One recorded chain call on a [`FakeHandle`].
#[derive(Clone, Debug, PartialEq)]
pub enum QueryOp {
    StartAt(Value),
    EqualTo { value: Value, key: Option<String> },
    EndAt(Value),
    OrderByValue,
    OrderByPriority,
    OrderByKey,
    OrderByChild(String),
    LimitToLast(u32),
    LimitToFirst(u32),
}

struct ListenerSlot {
    path: String,
    ops: Vec<QueryOp>,
    callback: ValueCallback,
    active: bool,
}

#[derive(Default)]
struct FakeInner {
    listeners: Vec<ListenerSlot>,
}

/// In-memory [`RemoteTree`] with test-controlled delivery.
#[derive(Clone, Default)]
pub struct FakeTree {
    inner: Rc<RefCell<FakeInner>>,
}

impl FakeTree {
    /// Create a tree with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `value` to every active listener registered at `path`.
    pub fn put(&self, path: &str, value: Value) {
        self.deliver(path, Some(value), false);
    }

    /// Deliver "nothing here" to every active listener registered at `path`.
    pub fn clear(&self, path: &str) {
        self.deliver(path, None, false);
    }

    /// Deliver `value` to *released* listeners at `path`, simulating an
    /// in-flight update that crosses a release.
    pub fn deliver_stale(&self, path: &str, value: Value) {
        self.deliver(path, Some(value), true);
    }

    fn deliver(&self, path: &str, payload: Option<Value>, to_released: bool) {
        // Snapshot the callbacks first: a callback may re-enter the tree
        // (e.g. a binding resubscribing), which would otherwise hit the
        // RefCell while it is still borrowed.
        let callbacks: Vec<ValueCallback> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .filter(|slot| slot.path == path && slot.active != to_released)
            .map(|slot| Rc::clone(&slot.callback))
            .collect();
        for callback in callbacks {
            callback(payload.clone());
        }
    }

    /// Number of live listeners registered at `path`.
    #[must_use]
    pub fn active_listeners(&self, path: &str) -> usize {
        self.inner
            .borrow()
            .listeners
            .iter()
            .filter(|slot| slot.active && slot.path == path)
            .count()
    }

    /// Number of live listeners across all paths.
    #[must_use]
    pub fn total_active(&self) -> usize {
        self.inner
            .borrow()
            .listeners
            .iter()
            .filter(|slot| slot.active)
            .count()
    }

    /// Chain calls recorded by the most recent registration at `path`,
    /// whether or not it is still active.
    #[must_use]
    pub fn last_recorded_ops(&self, path: &str) -> Option<Vec<QueryOp>> {
        self.inner
            .borrow()
            .listeners
            .iter()
            .rev()
            .find(|slot| slot.path == path)
            .map(|slot| slot.ops.clone())
    }
}

impl RemoteTree for FakeTree {
    type Handle = FakeHandle;

    fn reference(&self, path: &str) -> FakeHandle {
        FakeHandle {
            inner: Rc::clone(&self.inner),
            path: path.to_owned(),
            ops: Vec::new(),
        }
    }
}

/// Handle produced by [`FakeTree::reference`]; records every chain call.
pub struct FakeHandle {
    inner: Rc<RefCell<FakeInner>>,
    path: String,
    ops: Vec<QueryOp>,
}

impl FakeHandle {
    fn record(mut self, op: QueryOp) -> Self {
        self.ops.push(op);
        self
    }
}

impl QueryHandle for FakeHandle {
    fn start_at(self, value: Value) -> Self {
        self.record(QueryOp::StartAt(value))
    }

    fn equal_to(self, value: Value, key: Option<String>) -> Self {
        self.record(QueryOp::EqualTo { value, key })
    }

    fn end_at(self, value: Value) -> Self {
        self.record(QueryOp::EndAt(value))
    }

    fn order_by_value(self) -> Self {
        self.record(QueryOp::OrderByValue)
    }

    fn order_by_priority(self) -> Self {
        self.record(QueryOp::OrderByPriority)
    }

    fn order_by_key(self) -> Self {
        self.record(QueryOp::OrderByKey)
    }

    fn order_by_child(self, child: &str) -> Self {
        self.record(QueryOp::OrderByChild(child.to_owned()))
    }

    fn limit_to_last(self, n: u32) -> Self {
        self.record(QueryOp::LimitToLast(n))
    }

    fn limit_to_first(self, n: u32) -> Self {
        self.record(QueryOp::LimitToFirst(n))
    }

    fn on_value(self, callback: ValueCallback) -> Detach {
        let index = {
            let mut inner = self.inner.borrow_mut();
            inner.listeners.push(ListenerSlot {
                path: self.path,
                ops: self.ops,
                callback,
                active: true,
            });
            inner.listeners.len() - 1
        };
        let inner = self.inner;
        Box::new(move || {
            if let Some(slot) = inner.borrow_mut().listeners.get_mut(index) {
                slot.active = false;
            }
        })
    }
}
