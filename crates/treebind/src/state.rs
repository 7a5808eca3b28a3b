#![forbid(unsafe_code)]

//! Binding state machine: the three-state loading lifecycle.
//!
//! Transitions per subscription epoch:
//!
//! ```text
//! Pending ──cache hit──▶ FromCache ──live update──▶ Live ⟲ live update
//!    │                                               ▲
//!    └───────────────live update─────────────────────┘
//! ```
//!
//! # Invariants
//!
//! 1. `Live` is terminal for its epoch: no later cache hit can demote it.
//! 2. The cache fast path only fires from `Pending` (it runs synchronously in
//!    the same pass as mount/reset, before the subscription opens).
//! 3. Every live update replaces `data` wholesale, even when the payload is
//!    unchanged; suppressing redundant renders is the render-decision
//!    engine's job, not this one's.
//! 4. An epoch reset returns to `Pending` with no data.

use treebind_core::Snapshot;

/// Where the binding's current data came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing loaded yet for this epoch.
    Pending,
    /// Data pre-filled synchronously from the local cache; superseded by the
    /// first live update.
    FromCache,
    /// Data delivered by the live subscription. Terminal for this epoch.
    Live,
}

impl LoadStatus {
    /// Whether the binding is still waiting for its first data.
    #[must_use]
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Loading status plus the current data snapshot. Owned exclusively by the
/// binding; the render-decision engine reads it but never mutates it.
#[derive(Clone, Debug, PartialEq)]
pub struct BindingState {
    status: LoadStatus,
    data: Option<Snapshot>,
}

impl BindingState {
    /// Initial state for a fresh epoch.
    #[must_use]
    pub fn pending() -> Self {
        Self {
            status: LoadStatus::Pending,
            data: None,
        }
    }

    /// Current loading status.
    #[must_use]
    pub fn status(&self) -> LoadStatus {
        self.status
    }

    /// Current snapshot, if any. Empty and absent are distinct: a live update
    /// with zero items yields `Some` of an empty snapshot.
    #[must_use]
    pub fn data(&self) -> Option<&Snapshot> {
        self.data.as_ref()
    }

    /// Synchronous cache fast path. Only takes effect while `Pending`; a
    /// cache hit can never demote live data.
    pub fn apply_cache_hit(&mut self, snapshot: Snapshot) {
        if self.status.is_pending() {
            self.status = LoadStatus::FromCache;
            self.data = Some(snapshot);
        }
    }

    /// A live update: status becomes `Live` and data is replaced wholesale,
    /// on every invocation.
    pub fn apply_live(&mut self, snapshot: Snapshot) {
        self.status = LoadStatus::Live;
        self.data = Some(snapshot);
    }

    /// Epoch reset: back to `Pending` with no data.
    pub fn reset(&mut self) {
        *self = Self::pending();
    }
}

impl Default for BindingState {
    fn default() -> Self {
        Self::pending()
    }
}
