//! Item registry state.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::mpsc;

use super::events::{ActivationGuard, RegistryEvent, RegistrySubscription, SubscriberId};
use super::item::{ItemDescriptor, ItemHandle};

#[derive(Debug)]
struct Entry<K> {
    item: ItemDescriptor<K>,
    /// Subscribers watching this item's activations
    watchers: Vec<SubscriberId>,
}

#[derive(Debug)]
struct Subscriber {
    id: SubscriberId,
    tx: mpsc::UnboundedSender<RegistryEvent>,
    /// Registry version this subscriber last read the items at
    synced: u64,
}

impl Subscriber {
    fn is_behind(&self, version: u64) -> bool {
        self.synced < version
    }
}

#[derive(Debug)]
struct Slot<K> {
    generation: u32,
    entry: Option<Entry<K>>,
}

/// Internal state for an item registry.
#[derive(Debug)]
pub(crate) struct RegistryInner<K> {
    slots: Vec<Slot<K>>,
    /// Indices of vacant slots
    free: Vec<u32>,
    /// Live handles in declaration order
    order: Vec<ItemHandle>,
    version: u64,
    subscribers: Vec<Subscriber>,
}

impl<K> Default for RegistryInner<K> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            order: Vec::new(),
            version: 0,
            subscribers: Vec::new(),
        }
    }
}

impl<K: Clone> RegistryInner<K> {
    fn items(&self) -> Vec<(ItemHandle, ItemDescriptor<K>)> {
        self.order
            .iter()
            .filter_map(|h| self.entry(*h).map(|e| (*h, e.item.clone())))
            .collect()
    }
}

impl<K> RegistryInner<K> {
    fn entry(&self, handle: ItemHandle) -> Option<&Entry<K>> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.entry.as_ref())
    }

    fn entry_mut(&mut self, handle: ItemHandle) -> Option<&mut Entry<K>> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.entry.as_mut())
    }

    fn insert(&mut self, item: ItemDescriptor<K>) -> ItemHandle {
        let entry = Entry {
            item,
            watchers: Vec::new(),
        };
        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.entry = Some(entry);
                ItemHandle {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    entry: Some(entry),
                });
                ItemHandle {
                    index,
                    generation: 0,
                }
            }
        };
        self.order.push(handle);
        handle
    }

    fn remove(&mut self, handle: ItemHandle) -> Option<ItemDescriptor<K>> {
        let slot = self
            .slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)?;
        let entry = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.order.retain(|h| *h != handle);
        Some(entry.item)
    }

    /// Bump the version and tell every subscriber, dropping closed ones.
    fn notify_changed(&mut self) {
        self.version += 1;
        let event = RegistryEvent::Changed {
            version: self.version,
        };
        self.subscribers.retain(|sub| sub.tx.send(event).is_ok());
    }

    /// Tell every subscriber that an item's properties changed.
    fn notify_updated(&mut self, handle: ItemHandle) {
        let event = RegistryEvent::Updated(handle);
        self.subscribers.retain(|sub| sub.tx.send(event).is_ok());
    }

    fn subscribe(&mut self) -> (SubscriberId, mpsc::UnboundedReceiver<RegistryEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = SubscriberId::new();
        self.subscribers.push(Subscriber {
            id,
            tx,
            synced: self.version,
        });
        (id, rx)
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.retain(|sub| sub.id != id);
        for slot in &mut self.slots {
            if let Some(entry) = slot.entry.as_mut() {
                entry.watchers.retain(|w| *w != id);
            }
        }
    }

    pub(crate) fn unwatch(&mut self, handle: ItemHandle, subscriber: SubscriberId) {
        if let Some(entry) = self.entry_mut(handle)
            && let Some(pos) = entry.watchers.iter().position(|w| *w == subscriber)
        {
            entry.watchers.remove(pos);
        }
    }
}

/// Live set of selectable items declared by the UI layer.
///
/// `ItemRegistry` is a cheap-to-clone shared handle. The UI layer registers
/// and removes items as it declares them; controllers subscribe to learn
/// about membership changes and watch individual items for activations.
///
/// An activation reaches a subscriber that watches the item, and also any
/// subscriber that has not yet read the items since the last membership
/// change. That subscriber still has a `Changed` event queued ahead of the
/// activation, so it can rewire before it looks at the activation.
///
/// A poisoned lock is recovered rather than reported. Every operation sees
/// the last written state.
///
/// # Example
///
/// ```
/// use droplist::{ItemDescriptor, ItemRegistry, RegistryEvent};
///
/// let registry = ItemRegistry::new();
/// let mut sub = registry.subscribe();
///
/// let low = registry.register(ItemDescriptor::new(1, "Low"));
/// assert!(matches!(sub.try_next(), Some(RegistryEvent::Changed { .. })));
///
/// // Not read since the change, so the activation is still queued for it.
/// assert!(registry.activate(low));
/// assert_eq!(sub.try_next(), Some(RegistryEvent::Activated(low)));
///
/// let items = registry.sync(sub.id());
/// assert_eq!(items.len(), 1);
/// let guard = registry.watch(low, sub.id()).unwrap();
/// assert!(registry.activate(low));
/// assert_eq!(sub.try_next(), Some(RegistryEvent::Activated(low)));
///
/// drop(guard);
/// assert!(!registry.activate(low));
/// ```
#[derive(Debug)]
pub struct ItemRegistry<K> {
    inner: Arc<RwLock<RegistryInner<K>>>,
}

impl<K> ItemRegistry<K> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(RegistryInner::default())),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryInner<K>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryInner<K>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    // -------------------------------------------------------------------------
    // Membership
    // -------------------------------------------------------------------------

    /// Declare an item, appending it to the order.
    pub fn register(&self, item: impl Into<ItemDescriptor<K>>) -> ItemHandle {
        let mut guard = self.write();
        let handle = guard.insert(item.into());
        guard.notify_changed();
        handle
    }

    /// Remove an item. Returns its descriptor if the handle was live.
    pub fn deregister(&self, handle: ItemHandle) -> Option<ItemDescriptor<K>> {
        let mut guard = self.write();
        let item = guard.remove(handle)?;
        guard.notify_changed();
        Some(item)
    }

    /// Move an item to a new position in the order.
    ///
    /// The index is clamped to the end. Returns false for a stale handle.
    pub fn move_to(&self, handle: ItemHandle, index: usize) -> bool {
        let mut guard = self.write();
        let Some(pos) = guard.order.iter().position(|h| *h == handle) else {
            return false;
        };
        let target = index.min(guard.order.len() - 1);
        if pos == target {
            return true;
        }
        guard.order.remove(pos);
        guard.order.insert(target, handle);
        guard.notify_changed();
        true
    }

    /// Whether the handle names a live item.
    pub fn contains(&self, handle: ItemHandle) -> bool {
        self.read().entry(handle).is_some()
    }

    /// Number of live items.
    pub fn len(&self) -> usize {
        self.read().order.len()
    }

    /// Check if no item is declared.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Version counter, bumped on every membership or order change.
    pub fn version(&self) -> u64 {
        self.read().version
    }

    /// Live handles in order.
    pub fn handles(&self) -> Vec<ItemHandle> {
        self.read().order.clone()
    }

    // -------------------------------------------------------------------------
    // Item properties
    // -------------------------------------------------------------------------

    /// Label of a live item.
    pub fn label(&self, handle: ItemHandle) -> Option<String> {
        self.read().entry(handle).map(|e| e.item.label.clone())
    }

    /// Disabled flag of a live item.
    pub fn is_disabled(&self, handle: ItemHandle) -> Option<bool> {
        self.read().entry(handle).map(|e| e.item.disabled)
    }

    /// Change an item's label.
    ///
    /// Not a membership change: subscribers get [`RegistryEvent::Updated`]
    /// and the version stays put. Returns false for a stale handle.
    pub fn set_label(&self, handle: ItemHandle, label: impl Into<String>) -> bool {
        let mut guard = self.write();
        let Some(entry) = guard.entry_mut(handle) else {
            return false;
        };
        let label = label.into();
        if entry.item.label != label {
            entry.item.label = label;
            guard.notify_updated(handle);
        }
        true
    }

    /// Enable or disable an item. Raises [`RegistryEvent::Updated`] like
    /// [`set_label`](Self::set_label).
    pub fn set_disabled(&self, handle: ItemHandle, disabled: bool) -> bool {
        let mut guard = self.write();
        let Some(entry) = guard.entry_mut(handle) else {
            return false;
        };
        if entry.item.disabled != disabled {
            entry.item.disabled = disabled;
            guard.notify_updated(handle);
        }
        true
    }

    // -------------------------------------------------------------------------
    // Subscriptions
    // -------------------------------------------------------------------------

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> RegistrySubscription<K> {
        let (id, rx) = self.write().subscribe();
        RegistrySubscription {
            id,
            rx,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Route an item's activations to a subscriber.
    ///
    /// Returns `None` for a stale handle.
    pub fn watch(&self, handle: ItemHandle, subscriber: SubscriberId) -> Option<ActivationGuard<K>> {
        let mut guard = self.write();
        let entry = guard.entry_mut(handle)?;
        entry.watchers.push(subscriber);
        Some(ActivationGuard {
            handle,
            subscriber,
            registry: Arc::downgrade(&self.inner),
        })
    }

    /// Raise an activation for an item.
    ///
    /// The event goes to every subscriber watching the item and to every
    /// subscriber that has not synced since the last membership change.
    /// Disabled items filter their own activations. Returns true if at least
    /// one subscriber received the event.
    pub fn activate(&self, handle: ItemHandle) -> bool {
        let guard = self.read();
        let Some(entry) = guard.entry(handle) else {
            return false;
        };
        if entry.item.disabled {
            return false;
        }

        let mut delivered = false;
        for sub in &guard.subscribers {
            let routed = entry.watchers.contains(&sub.id) || sub.is_behind(guard.version);
            if routed && sub.tx.send(RegistryEvent::Activated(handle)).is_ok() {
                delivered = true;
            }
        }
        delivered
    }
}

impl<K: Clone> ItemRegistry<K> {
    /// Fresh snapshot of the live items in order.
    pub fn items(&self) -> Vec<(ItemHandle, ItemDescriptor<K>)> {
        self.read().items()
    }

    /// Snapshot the live items and mark `subscriber` as caught up.
    ///
    /// From here on the subscriber only receives activations of items it
    /// watches, until the next membership change.
    pub fn sync(&self, subscriber: SubscriberId) -> Vec<(ItemHandle, ItemDescriptor<K>)> {
        let mut guard = self.write();
        let version = guard.version;
        if let Some(sub) = guard.subscribers.iter_mut().find(|sub| sub.id == subscriber) {
            sub.synced = version;
        }
        guard.items()
    }

    /// Descriptor of a live item.
    pub fn get(&self, handle: ItemHandle) -> Option<ItemDescriptor<K>> {
        self.read().entry(handle).map(|e| e.item.clone())
    }
}

impl<K: PartialEq> ItemRegistry<K> {
    /// First live item whose key equals `key`.
    pub fn find(&self, key: &K) -> Option<ItemHandle> {
        let guard = self.read();
        guard
            .order
            .iter()
            .copied()
            .find(|h| guard.entry(*h).is_some_and(|e| e.item.key == *key))
    }
}

impl<K> Clone for ItemRegistry<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K> Default for ItemRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}
