#![forbid(unsafe_code)]

//! Subscription lifecycle: exactly one live remote listener per binding.
//!
//! The manager owns an epoch counter and at most one release closure. Each
//! `begin` releases whatever was live and starts a new epoch; callbacks
//! registered under an earlier epoch are recognized as stale via
//! [`SubscriptionManager::is_live`] and must be discarded by the caller.
//!
//! The epoch exists because release alone is not enough: an update can be in
//! flight when the release is requested, arriving after the new subscription
//! is already live. Tagging every registration with its epoch makes the
//! discard rule explicit instead of relying on closure-capture timing.
//!
//! # Invariants
//!
//! 1. At most one release closure is held at any time.
//! 2. `begin` strictly increases the epoch and releases the predecessor
//!    before the caller can open a successor.
//! 3. `release` is idempotent and safe before any update has fired.
//! 4. `is_live(epoch)` is true only for the current epoch while its
//!    subscription is attached.

use treebind_core::Detach;

/// Monotonically increasing identifier for successive subscriptions opened by
/// one binding.
pub type Epoch = u64;

/// Owns the lifecycle of a binding's single remote subscription. Holds no
/// data; it is a pure lifecycle wrapper.
#[derive(Default)]
pub struct SubscriptionManager {
    epoch: Epoch,
    release: Option<Detach>,
}

impl SubscriptionManager {
    /// Manager with no live subscription, at epoch zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Release any live subscription and start a new epoch. The caller opens
    /// the replacement subscription and hands its detach closure back via
    /// [`attach`](Self::attach).
    pub fn begin(&mut self) -> Epoch {
        self.release();
        self.epoch += 1;
        self.epoch
    }

    /// Attach the release closure for the subscription opened under `epoch`.
    ///
    /// If `epoch` is no longer current (the binding retargeted between open
    /// and attach), the subscription is released immediately instead of kept.
    pub fn attach(&mut self, epoch: Epoch, detach: Detach) {
        if epoch != self.epoch {
            tracing::trace!(epoch, current = self.epoch, "releasing stale attach");
            detach();
            return;
        }
        if let Some(previous) = self.release.take() {
            previous();
        }
        self.release = Some(detach);
    }

    /// Release the live subscription, if any. Idempotent.
    pub fn release(&mut self) {
        if let Some(detach) = self.release.take() {
            detach();
        }
    }

    /// The current epoch.
    #[must_use]
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Whether a callback tagged with `epoch` belongs to the currently
    /// attached subscription.
    #[must_use]
    pub fn is_live(&self, epoch: Epoch) -> bool {
        epoch == self.epoch && self.release.is_some()
    }
}

impl Drop for SubscriptionManager {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for SubscriptionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionManager")
            .field("epoch", &self.epoch)
            .field("live", &self.release.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting_detach(counter: &Rc<Cell<u32>>) -> Detach {
        let counter = Rc::clone(counter);
        Box::new(move || counter.set(counter.get() + 1))
    }

    #[test]
    fn begin_increments_epoch() {
        let mut subs = SubscriptionManager::new();
        assert_eq!(subs.begin(), 1);
        assert_eq!(subs.begin(), 2);
        assert_eq!(subs.epoch(), 2);
    }

    #[test]
    fn begin_releases_previous_subscription() {
        let released = Rc::new(Cell::new(0));
        let mut subs = SubscriptionManager::new();

        let epoch = subs.begin();
        subs.attach(epoch, counting_detach(&released));
        assert_eq!(released.get(), 0);

        subs.begin();
        assert_eq!(released.get(), 1, "old subscription released on begin");
    }

    #[test]
    fn release_is_idempotent_and_safe_when_empty() {
        let released = Rc::new(Cell::new(0));
        let mut subs = SubscriptionManager::new();
        subs.release();

        let epoch = subs.begin();
        subs.attach(epoch, counting_detach(&released));
        subs.release();
        subs.release();
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn stale_attach_is_released_immediately() {
        let released = Rc::new(Cell::new(0));
        let mut subs = SubscriptionManager::new();

        let stale = subs.begin();
        let _current = subs.begin();
        subs.attach(stale, counting_detach(&released));
        assert_eq!(released.get(), 1);
        assert!(!subs.is_live(stale));
    }

    #[test]
    fn is_live_tracks_current_epoch_only() {
        let mut subs = SubscriptionManager::new();
        let first = subs.begin();
        subs.attach(first, Box::new(|| {}));
        assert!(subs.is_live(first));

        let second = subs.begin();
        assert!(!subs.is_live(first));
        assert!(!subs.is_live(second), "not live until attached");

        subs.attach(second, Box::new(|| {}));
        assert!(subs.is_live(second));
    }

    #[test]
    fn released_epoch_is_not_live() {
        let mut subs = SubscriptionManager::new();
        let epoch = subs.begin();
        subs.attach(epoch, Box::new(|| {}));
        subs.release();
        assert!(!subs.is_live(epoch));
    }

    #[test]
    fn drop_releases() {
        let released = Rc::new(Cell::new(0));
        {
            let mut subs = SubscriptionManager::new();
            let epoch = subs.begin();
            subs.attach(epoch, counting_detach(&released));
        }
        assert_eq!(released.get(), 1);
    }
}
