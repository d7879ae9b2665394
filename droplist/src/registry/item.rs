//! Item descriptors and the handles that name them.

use std::fmt;

/// One selectable entry declared by the UI layer.
///
/// # Example
///
/// ```
/// use droplist::ItemDescriptor;
///
/// let item = ItemDescriptor::new(2, "Medium").with_disabled(true);
/// assert_eq!(item.key, 2);
/// assert!(item.disabled);
///
/// let from_pair: ItemDescriptor<u32> = (1, "Low").into();
/// assert_eq!(from_pair.label, "Low");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDescriptor<K> {
    /// Domain value of the entry. Membership is decided by equality.
    pub key: K,
    /// Display text, owned by the UI layer.
    pub label: String,
    /// Disabled entries cannot be activated.
    pub disabled: bool,
}

impl<K> ItemDescriptor<K> {
    pub fn new(key: K, label: impl Into<String>) -> Self {
        Self {
            key,
            label: label.into(),
            disabled: false,
        }
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

impl<K, L: Into<String>> From<(K, L)> for ItemDescriptor<K> {
    fn from((key, label): (K, L)) -> Self {
        Self::new(key, label)
    }
}

/// Handle to a registered item.
///
/// Handles carry a generation, so a handle kept after its item was
/// deregistered never resolves to a later item reusing the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemHandle {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl fmt::Display for ItemHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "__item_{}v{}", self.index, self.generation)
    }
}
