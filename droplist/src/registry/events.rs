//! Registry notifications and the subscriptions that receive them.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock, Weak};

use tokio::sync::mpsc;

use super::item::ItemHandle;
use super::state::RegistryInner;

/// Identifies one registry subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(usize);

impl SubscriberId {
    pub(crate) fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__subscriber_{}", self.0)
    }
}

/// Notification raised by an [`ItemRegistry`](super::ItemRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryEvent {
    /// Membership or order changed. Re-read the items.
    Changed {
        /// Registry version after the change.
        version: u64,
    },
    /// An item's label or disabled flag changed. Membership did not.
    Updated(ItemHandle),
    /// An item was activated (clicked, tapped, picked).
    Activated(ItemHandle),
}

/// Receiving end of a registry subscription.
///
/// Events arrive in the order the registry raised them. Dropping the
/// subscription unsubscribes.
#[derive(Debug)]
pub struct RegistrySubscription<K> {
    pub(crate) id: SubscriberId,
    pub(crate) rx: mpsc::UnboundedReceiver<RegistryEvent>,
    pub(crate) registry: Weak<RwLock<RegistryInner<K>>>,
}

impl<K> RegistrySubscription<K> {
    /// This subscriber's ID, used when watching items.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Take the next pending event without waiting.
    pub fn try_next(&mut self) -> Option<RegistryEvent> {
        self.rx.try_recv().ok()
    }
}

impl<K> Drop for RegistrySubscription<K> {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            inner.write().unwrap_or_else(PoisonError::into_inner).unsubscribe(self.id);
        }
    }
}

/// Per-item activation subscription.
///
/// While the guard lives, activations of its item are delivered to its
/// subscriber. Dropping it releases the watch.
#[derive(Debug)]
pub struct ActivationGuard<K> {
    pub(crate) handle: ItemHandle,
    pub(crate) subscriber: SubscriberId,
    pub(crate) registry: Weak<RwLock<RegistryInner<K>>>,
}

impl<K> ActivationGuard<K> {
    /// The watched item.
    pub fn handle(&self) -> ItemHandle {
        self.handle
    }
}

impl<K> Drop for ActivationGuard<K> {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            inner
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .unwatch(self.handle, self.subscriber);
        }
    }
}
