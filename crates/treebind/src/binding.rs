#![forbid(unsafe_code)]

//! The binding orchestrator: ties transport, cache, state, and view together.
//!
//! A [`Binding`] owns one live remote subscription, the loading state machine,
//! and the render-decision gate for one mounted view. Lifecycle:
//!
//! 1. **Mount**: validate the config, probe the cache synchronously (fast
//!    path to `FromCache`), then open the live subscription.
//! 2. **Live update**: the callback checks its epoch tag, replaces the data
//!    wholesale, runs the render decision, and (with `cache_locally`) writes
//!    the snapshot behind.
//! 3. **Update**: a new config passes through the render decision; a path or
//!    query change releases the old subscription, resets the state machine,
//!    re-probes the cache, and opens a new subscription under a new epoch.
//! 4. **Release/Drop**: tears the subscription down; release is idempotent
//!    and any update still in flight is discarded by the epoch guard.
//!
//! Shared-ownership model as in single-threaded reactive code: the mutable
//! core lives in an `Rc<RefCell<Inner>>`, subscriptions hold a `Weak` to it,
//! and each callback runs to completion before the next is accepted.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde_json::Value;
use treebind_core::{
    ConfigError, KeyValueStore, MemoryStore, QueryHandle, QuerySpec, RemoteTree, Snapshot,
    ValueCallback,
};

use crate::cache::{self, CacheRead};
use crate::compile::apply_query;
use crate::config::BindingConfig;
use crate::render::render_decision;
use crate::state::{BindingState, LoadStatus};
use crate::subscribe::{Epoch, SubscriptionManager};
use crate::view::{Loader, Props, View, ViewProps};

/// Non-comparable mount collaborators: the loader and the store override.
pub struct BindingOptions<O> {
    /// Rendered in place of the wrapped view while status is `Pending`.
    pub loader: Option<Loader<O>>,
    /// Overrides the default [`MemoryStore`] cache backend.
    pub store: Option<Rc<dyn KeyValueStore>>,
}

impl<O> Default for BindingOptions<O> {
    fn default() -> Self {
        Self {
            loader: None,
            store: None,
        }
    }
}

impl<O> BindingOptions<O> {
    /// Set the pending-state loader.
    #[must_use]
    pub fn loader(mut self, loader: impl Fn(&Props) -> O + 'static) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }

    /// Override the cache store.
    #[must_use]
    pub fn store(mut self, store: Rc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }
}

struct Inner {
    config: BindingConfig,
    state: BindingState,
    subs: SubscriptionManager,
    dirty: bool,
}

/// One mounted binding: a view subscribed to a (path, query) of a remote tree.
pub struct Binding<T: RemoteTree, V: View> {
    tree: T,
    view: V,
    loader: Option<Loader<V::Output>>,
    store: Rc<dyn KeyValueStore>,
    inner: Rc<RefCell<Inner>>,
}

impl<T: RemoteTree, V: View> Binding<T, V> {
    /// Mount a binding: synchronous cache probe, then live subscription.
    ///
    /// Fails fast on an invalid config rather than subscribing to an
    /// undefined location.
    pub fn mount(
        tree: T,
        view: V,
        config: BindingConfig,
        options: BindingOptions<V::Output>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let store = options
            .store
            .unwrap_or_else(|| Rc::new(MemoryStore::new()) as Rc<dyn KeyValueStore>);
        let inner = Rc::new(RefCell::new(Inner {
            config,
            state: BindingState::pending(),
            subs: SubscriptionManager::new(),
            dirty: false,
        }));
        let binding = Self {
            tree,
            view,
            loader: options.loader,
            store,
            inner,
        };
        binding.probe_cache();
        binding.resubscribe();
        Ok(binding)
    }

    /// Apply a new configuration.
    ///
    /// A structural path or query change releases the current subscription,
    /// resets the state machine to `Pending`, re-probes the cache, and opens
    /// a fresh subscription under a new epoch. Returns whether the transition
    /// warrants a re-render.
    pub fn update(&mut self, next_config: BindingConfig) -> Result<bool, ConfigError> {
        next_config.validate()?;
        let (decision, retarget, debug, path) = {
            let inner = self.inner.borrow();
            (
                render_decision(&inner.config, &next_config, &inner.state, &inner.state),
                inner.config.retargets(&next_config),
                next_config.debug,
                next_config.path.clone(),
            )
        };
        {
            let mut inner = self.inner.borrow_mut();
            inner.config = next_config;
            if retarget {
                inner.state.reset();
            }
            if decision.is_some() {
                inner.dirty = true;
            }
        }
        if retarget {
            lifecycle(debug, &path, "retargeting subscription");
            self.probe_cache();
            self.resubscribe();
        }
        if let Some(reason) = decision {
            lifecycle(debug, &path, &format!("re-render warranted: {reason}"));
        }
        Ok(decision.is_some())
    }

    /// Render the current state.
    ///
    /// While `Pending`, the loader output (or nothing) is produced from the
    /// pass-through props alone; otherwise the wrapped view receives the data
    /// snapshot plus the pass-through props.
    #[must_use]
    pub fn render(&self) -> Option<V::Output> {
        let inner = self.inner.borrow();
        if inner.state.status().is_pending() {
            return self
                .loader
                .as_ref()
                .map(|loader| loader(&inner.config.props));
        }
        let props = ViewProps {
            data: inner.state.data().cloned().unwrap_or_default(),
            props: inner.config.props.clone(),
        };
        Some(self.view.render(&props))
    }

    /// Current loading status.
    #[must_use]
    pub fn status(&self) -> LoadStatus {
        self.inner.borrow().state.status()
    }

    /// Current data snapshot, if any.
    #[must_use]
    pub fn data(&self) -> Option<Snapshot> {
        self.inner.borrow().state.data().cloned()
    }

    /// Whether an accepted update has warranted a re-render since the last
    /// [`take_dirty`](Self::take_dirty).
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.inner.borrow().dirty
    }

    /// Consume the dirty flag. Hosts typically poll this once per frame.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.inner.borrow_mut().dirty)
    }

    /// Release the live subscription. Idempotent; any update still in flight
    /// afterwards is discarded by the epoch guard.
    pub fn release(&mut self) {
        let (debug, path) = {
            let inner = self.inner.borrow();
            (inner.config.debug, inner.config.path.clone())
        };
        self.inner.borrow_mut().subs.release();
        lifecycle(debug, &path, "released subscription");
    }

    /// Synchronous cache fast path; only effective while `Pending` and with
    /// `cache_locally` set.
    fn probe_cache(&self) {
        let mut inner = self.inner.borrow_mut();
        if !inner.config.cache_locally {
            return;
        }
        let read = cache::read(
            self.store.as_ref(),
            &inner.config.path,
            inner.config.query.as_ref(),
        );
        match read {
            CacheRead::Hit(snapshot) => {
                lifecycle(inner.config.debug, &inner.config.path, "cache hit");
                inner.state.apply_cache_hit(snapshot);
            }
            CacheRead::Miss | CacheRead::Corrupt => {}
        }
    }

    /// Open the subscription for the current config under a fresh epoch,
    /// releasing whatever was live before.
    fn resubscribe(&self) {
        let (epoch, path, query, cache_locally, debug) = {
            let mut inner = self.inner.borrow_mut();
            (
                inner.subs.begin(),
                inner.config.path.clone(),
                inner.config.query.clone(),
                inner.config.cache_locally,
                inner.config.debug,
            )
        };
        let mut handle = self.tree.reference(&path);
        if let Some(spec) = &query {
            handle = apply_query(handle, spec);
        }
        let callback = self.live_callback(epoch, path.clone(), query, cache_locally, debug);
        let detach = handle.on_value(callback);
        self.inner.borrow_mut().subs.attach(epoch, detach);
        lifecycle(debug, &path, "subscribed");
    }

    fn live_callback(
        &self,
        epoch: Epoch,
        path: String,
        query: Option<QuerySpec>,
        cache_locally: bool,
        debug: bool,
    ) -> ValueCallback {
        let weak: Weak<RefCell<Inner>> = Rc::downgrade(&self.inner);
        let store = Rc::clone(&self.store);
        Rc::new(move |payload: Option<Value>| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let snapshot = Snapshot::from_remote(payload);
            {
                let mut inner = inner.borrow_mut();
                if !inner.subs.is_live(epoch) {
                    lifecycle(debug, &path, "discarding stale-epoch update");
                    return;
                }
                let previous = inner.state.clone();
                inner.state.apply_live(snapshot.clone());
                let decision =
                    render_decision(&inner.config, &inner.config, &previous, &inner.state);
                if let Some(reason) = decision {
                    inner.dirty = true;
                    lifecycle(debug, &path, &format!("live update: {reason}"));
                } else {
                    lifecycle(debug, &path, "live update: unchanged, render suppressed");
                }
            }
            // Write-behind after the state transition has committed; cache
            // failures are logged inside and never reach this path.
            if cache_locally {
                cache::write(store.as_ref(), &path, query.as_ref(), &snapshot);
            }
        })
    }
}

impl<T: RemoteTree, V: View> Drop for Binding<T, V> {
    fn drop(&mut self) {
        self.release();
    }
}

fn lifecycle(debug: bool, path: &str, message: &str) {
    if debug {
        tracing::debug!(target: "treebind::lifecycle", path, "{}", message);
    } else {
        tracing::trace!(target: "treebind::lifecycle", path, "{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use treebind_core::fake::FakeTree;

    fn joined_view() -> impl View<Output = String> {
        |props: &ViewProps| {
            props
                .data
                .iter()
                .map(|(key, value)| format!("{key}:{value}"))
                .collect::<Vec<_>>()
                .join(",")
        }
    }

    #[test]
    fn mount_rejects_empty_path() {
        let result = Binding::mount(
            FakeTree::new(),
            joined_view(),
            BindingConfig::new(""),
            BindingOptions::default(),
        );
        assert!(matches!(result, Err(ConfigError::EmptyPath)));
    }

    #[test]
    fn mount_opens_exactly_one_subscription() {
        let tree = FakeTree::new();
        let binding = Binding::mount(
            tree.clone(),
            joined_view(),
            BindingConfig::new("items"),
            BindingOptions::default(),
        )
        .unwrap();
        assert_eq!(tree.active_listeners("items"), 1);
        assert_eq!(binding.status(), LoadStatus::Pending);
    }

    #[test]
    fn update_rejects_empty_path_and_keeps_subscription() {
        let tree = FakeTree::new();
        let mut binding = Binding::mount(
            tree.clone(),
            joined_view(),
            BindingConfig::new("items"),
            BindingOptions::default(),
        )
        .unwrap();
        assert!(binding.update(BindingConfig::new("")).is_err());
        assert_eq!(tree.active_listeners("items"), 1);
    }

    #[test]
    fn cache_write_behind_uses_current_path_and_query() {
        let tree = FakeTree::new();
        let store = Rc::new(MemoryStore::new());
        let spec = QuerySpec::new().order_by_key();
        let _binding = Binding::mount(
            tree.clone(),
            joined_view(),
            BindingConfig::new("items")
                .query(spec.clone())
                .cache_locally(true),
            BindingOptions::default().store(Rc::clone(&store) as Rc<dyn KeyValueStore>),
        )
        .unwrap();

        tree.put("items", json!({"a": 1}));
        let cached = cache::read(store.as_ref(), "items", Some(&spec));
        assert_eq!(
            cached,
            CacheRead::Hit(Snapshot::from_remote(Some(json!({"a": 1}))))
        );
    }
}
