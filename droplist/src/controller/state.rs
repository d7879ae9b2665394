//! Select controller state.

use std::collections::{HashMap, HashSet};
use std::fmt;

use log::{debug, trace};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::config::SelectConfig;
use crate::registry::{ActivationGuard, ItemHandle, ItemRegistry, RegistryEvent, RegistrySubscription};
use crate::selection::{SelectMode, SelectionModel};
use crate::value::SelectValue;
use crate::visibility::{OverlayAnchor, Visibility};

/// Callback receiving every accepted value change.
pub type ChangeFn<K> = Box<dyn FnMut(&SelectValue<K>)>;

/// Callback receiving touch notifications.
pub type TouchFn = Box<dyn FnMut()>;

/// Unique identifier for a select controller instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectId(Uuid);

impl SelectId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for SelectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "__select_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Ready,
    TornDown,
}

/// One item as seen at the last rewiring.
#[derive(Debug, Clone)]
struct SnapshotEntry<K> {
    handle: ItemHandle,
    key: K,
}

/// Engine behind a dropdown select.
///
/// `SelectController` owns the selection and the open/closed state, keeps
/// itself wired to the live items of an [`ItemRegistry`], and reports
/// value changes to whatever binds to it.
///
/// Construction runs initialization to completion: the selection is seeded
/// from the configured value, the registry is subscribed, and the current
/// items are wired before `new` returns.
///
/// # Example
///
/// ```
/// use droplist::{ItemDescriptor, ItemRegistry, SelectConfig, SelectController, SelectValue};
///
/// let registry = ItemRegistry::new();
/// registry.register(ItemDescriptor::new(1, "a"));
/// let b = registry.register(ItemDescriptor::new(2, "b"));
///
/// let mut select = SelectController::new(SelectConfig::new(), &registry);
/// assert_eq!(select.label(), "Choose a item");
///
/// select.open();
/// registry.activate(b);
/// select.dispatch();
///
/// assert_eq!(select.value(), SelectValue::Single(Some(2)));
/// assert_eq!(select.label(), "b");
/// assert!(!select.is_open());
/// ```
pub struct SelectController<K> {
    id: SelectId,
    registry: ItemRegistry<K>,
    subscription: Option<RegistrySubscription<K>>,
    /// Activation watches for the items in `snapshot`
    guards: HashMap<ItemHandle, ActivationGuard<K>>,
    snapshot: Vec<SnapshotEntry<K>>,
    selection: SelectionModel<K>,
    visibility: Visibility,
    disabled: bool,
    placeholder: String,
    separator: String,
    label: String,
    overlay_width: Option<f32>,
    on_change: ChangeFn<K>,
    on_touched: TouchFn,
    listeners: Vec<mpsc::UnboundedSender<SelectValue<K>>>,
    dirty: bool,
    lifecycle: Lifecycle,
}

impl<K: Clone + PartialEq> SelectController<K> {
    /// Create a controller bound to `registry`.
    pub fn new(config: SelectConfig<K>, registry: &ItemRegistry<K>) -> Self {
        let SelectConfig {
            mode,
            value,
            placeholder,
            disabled,
            separator,
        } = config;

        let subscription = registry.subscribe();
        let mut controller = Self {
            id: SelectId::new(),
            registry: registry.clone(),
            subscription: Some(subscription),
            guards: HashMap::new(),
            snapshot: Vec::new(),
            selection: SelectionModel::with_value(mode, value),
            visibility: Visibility::new(),
            disabled,
            label: placeholder.clone(),
            placeholder,
            separator,
            overlay_width: None,
            on_change: Box::new(|_: &SelectValue<K>| {}),
            on_touched: Box::new(|| {}),
            listeners: Vec::new(),
            dirty: false,
            lifecycle: Lifecycle::Ready,
        };
        controller.rewire();
        debug!("{}: initialized in {:?} mode", controller.id, mode);
        controller
    }

    // -------------------------------------------------------------------------
    // Registry events
    // -------------------------------------------------------------------------

    /// Process pending registry events in the order they were raised.
    ///
    /// Each change notification is fully handled, rewiring included, before
    /// the next event is looked at, so an activation queued behind a change
    /// is judged against the new item set. Returns the number of events
    /// processed.
    pub fn dispatch(&mut self) -> usize {
        let mut processed = 0;
        loop {
            let Some(event) = self.subscription.as_mut().and_then(|sub| sub.try_next()) else {
                break;
            };
            processed += 1;
            match event {
                RegistryEvent::Changed { version } => {
                    trace!("{}: registry changed (version {})", self.id, version);
                    self.rewire();
                }
                RegistryEvent::Updated(handle) => {
                    if self.guards.contains_key(&handle) {
                        trace!("{}: {} updated", self.id, handle);
                        self.refresh_label();
                    }
                }
                RegistryEvent::Activated(handle) => {
                    if self.guards.contains_key(&handle) {
                        self.handle_activation(handle);
                    } else {
                        trace!("{}: dropped activation of unwired {}", self.id, handle);
                    }
                }
            }
        }
        processed
    }

    /// Replace the snapshot with the registry's current items and move the
    /// activation watches to match.
    fn rewire(&mut self) {
        if self.lifecycle == Lifecycle::TornDown {
            return;
        }
        let Some(subscriber) = self.subscription.as_ref().map(|sub| sub.id()) else {
            return;
        };

        let items = self.registry.sync(subscriber);
        let live: HashSet<ItemHandle> = items.iter().map(|(handle, _)| *handle).collect();

        let before = self.guards.len();
        self.guards.retain(|handle, _| live.contains(handle));
        let detached = before - self.guards.len();

        let mut attached = 0;
        for (handle, _) in &items {
            if self.guards.contains_key(handle) {
                continue;
            }
            if let Some(guard) = self.registry.watch(*handle, subscriber) {
                self.guards.insert(*handle, guard);
                attached += 1;
            }
        }

        self.snapshot = items
            .into_iter()
            .map(|(handle, item)| SnapshotEntry { handle, key: item.key })
            .collect();

        if attached > 0 || detached > 0 {
            debug!(
                "{}: rewired {} items ({} attached, {} detached)",
                self.id,
                self.snapshot.len(),
                attached,
                detached
            );
        }

        self.refresh_label();
    }

    // -------------------------------------------------------------------------
    // Activation
    // -------------------------------------------------------------------------

    /// Activate a wired item directly, as if it had been clicked.
    ///
    /// Returns true if the selection changed.
    pub fn activate(&mut self, handle: ItemHandle) -> bool {
        self.handle_activation(handle)
    }

    /// Select the first item whose key equals `key`, through the same path
    /// as a user pick.
    ///
    /// If no current item matches, the selection is left as it is. Returns
    /// true if the selection changed.
    pub fn write_key(&mut self, key: &K) -> bool {
        if self.lifecycle == Lifecycle::TornDown {
            return false;
        }
        match self.snapshot.iter().find(|entry| entry.key == *key) {
            Some(entry) => {
                let handle = entry.handle;
                self.handle_activation(handle)
            }
            None => {
                debug!("{}: written value matches no item, keeping selection", self.id);
                false
            }
        }
    }

    fn handle_activation(&mut self, handle: ItemHandle) -> bool {
        if self.lifecycle == Lifecycle::TornDown || self.disabled {
            trace!("{}: activation of {} ignored, control inactive", self.id, handle);
            return false;
        }
        let Some(key) = self
            .snapshot
            .iter()
            .find(|entry| entry.handle == handle)
            .map(|entry| entry.key.clone())
        else {
            return false;
        };
        if self.registry.is_disabled(handle).unwrap_or(true) {
            trace!("{}: activation of {} ignored, item disabled", self.id, handle);
            return false;
        }

        let changed = self.selection.pick(key);
        trace!("{}: activation of {} (changed: {})", self.id, handle, changed);
        if !changed {
            return false;
        }

        if !self.selection.is_multiple_selection() {
            self.close();
        }
        self.refresh_label();
        self.dirty = true;
        self.emit();
        true
    }

    fn emit(&mut self) {
        let value = self.selection.value();
        (self.on_change)(&value);
        self.listeners.retain(|tx| tx.send(value.clone()).is_ok());
    }

    /// Join the labels of selected items in item order, or fall back to the
    /// placeholder.
    fn refresh_label(&mut self) {
        let labels: Vec<String> = self
            .snapshot
            .iter()
            .filter(|entry| self.selection.is_selected(&entry.key))
            .filter_map(|entry| self.registry.label(entry.handle))
            .collect();

        let label = if labels.is_empty() {
            self.placeholder.clone()
        } else {
            labels.join(&self.separator)
        };
        if label != self.label {
            self.label = label;
            self.dirty = true;
        }
    }

    // -------------------------------------------------------------------------
    // Selection state
    // -------------------------------------------------------------------------

    /// Current external value.
    pub fn value(&self) -> SelectValue<K> {
        self.selection.value()
    }

    /// Selected keys in the order they were picked.
    pub fn selected(&self) -> &[K] {
        self.selection.selected()
    }

    /// Check if a key is selected.
    pub fn is_selected(&self, key: &K) -> bool {
        self.selection.is_selected(key)
    }

    /// Keys of the wired items, in item order.
    pub fn item_keys(&self) -> Vec<K> {
        self.snapshot.iter().map(|entry| entry.key.clone()).collect()
    }

    /// Change the placeholder text.
    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
        self.refresh_label();
    }
}

impl<K> SelectController<K> {
    /// Get the unique ID for this controller.
    pub fn id(&self) -> SelectId {
        self.id
    }

    /// Selection mode, fixed at construction.
    pub fn mode(&self) -> SelectMode {
        self.selection.mode()
    }

    /// Text to show in the closed control.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Handles of the wired items, in item order.
    pub fn handles(&self) -> Vec<ItemHandle> {
        self.snapshot.iter().map(|entry| entry.handle).collect()
    }

    /// Whether the controller is wired to the registry.
    pub fn is_ready(&self) -> bool {
        self.lifecycle == Lifecycle::Ready
    }

    // -------------------------------------------------------------------------
    // Open/close state
    // -------------------------------------------------------------------------

    /// Check if the overlay is open.
    pub fn is_open(&self) -> bool {
        self.visibility.is_open()
    }

    /// Open the overlay.
    pub fn open(&mut self) {
        if self.lifecycle == Lifecycle::TornDown {
            return;
        }
        let was_open = self.visibility.is_open();
        if self.visibility.open(self.disabled) {
            trace!("{}: open", self.id);
            self.dirty |= !was_open;
            (self.on_touched)();
        }
    }

    /// Open the overlay, sized to the anchor's width.
    pub fn open_anchored(&mut self, anchor: &impl OverlayAnchor) {
        if self.lifecycle == Lifecycle::TornDown || self.disabled {
            return;
        }
        self.overlay_width = Some(anchor.bounding_width());
        self.open();
    }

    /// Close the overlay.
    pub fn close(&mut self) {
        if self.lifecycle == Lifecycle::TornDown {
            return;
        }
        let was_open = self.visibility.is_open();
        if self.visibility.close(self.disabled) {
            trace!("{}: close", self.id);
            self.dirty |= was_open;
            (self.on_touched)();
        }
    }

    /// Toggle the overlay open/closed.
    pub fn toggle(&mut self) {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    /// Width recorded by the last anchored open.
    pub fn overlay_width(&self) -> Option<f32> {
        self.overlay_width
    }

    // -------------------------------------------------------------------------
    // Disabled state
    // -------------------------------------------------------------------------

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Enable or disable the whole control.
    pub fn set_disabled(&mut self, disabled: bool) {
        if self.disabled != disabled {
            self.disabled = disabled;
            self.dirty = true;
        }
    }

    // -------------------------------------------------------------------------
    // Outputs
    // -------------------------------------------------------------------------

    /// Replace the value change callback.
    pub fn on_change(&mut self, f: impl FnMut(&SelectValue<K>) + 'static) {
        self.on_change = Box::new(f);
    }

    /// Replace the touch callback.
    pub fn on_touched(&mut self, f: impl FnMut() + 'static) {
        self.on_touched = Box::new(f);
    }

    pub(crate) fn set_change_fn(&mut self, f: ChangeFn<K>) {
        self.on_change = f;
    }

    pub(crate) fn set_touch_fn(&mut self, f: TouchFn) {
        self.on_touched = f;
    }

    /// Stream of accepted value changes.
    ///
    /// Every receiver gets every change raised after it was created.
    pub fn value_changes(&mut self) -> mpsc::UnboundedReceiver<SelectValue<K>> {
        let (tx, rx) = mpsc::unbounded_channel();
        if self.lifecycle == Lifecycle::Ready {
            self.listeners.push(tx);
        }
        rx
    }

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    /// Check if visible state changed since the last clear.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    // -------------------------------------------------------------------------
    // Teardown
    // -------------------------------------------------------------------------

    /// Release every activation watch and the registry subscription.
    ///
    /// Runs once. Afterwards dispatch, activation, writes and open/close do nothing.
    pub fn teardown(&mut self) {
        if self.lifecycle == Lifecycle::TornDown {
            return;
        }
        self.lifecycle = Lifecycle::TornDown;
        let released = self.guards.len();
        self.guards.clear();
        self.subscription = None;
        self.listeners.clear();
        debug!("{}: torn down, released {} item watches", self.id, released);
    }
}

impl<K> Drop for SelectController<K> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<K: fmt::Debug> fmt::Debug for SelectController<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectController")
            .field("id", &self.id)
            .field("selection", &self.selection)
            .field("is_open", &self.visibility.is_open())
            .field("disabled", &self.disabled)
            .field("label", &self.label)
            .field("items", &self.snapshot.len())
            .finish_non_exhaustive()
    }
}
