//! Selection state for the select control.
//!
//! Keys are compared by value, never by identity. The selected keys keep
//! insertion order so multi-select values are emitted in the order they
//! were picked.

use serde::{Deserialize, Serialize};

use crate::value::SelectValue;

/// Cardinality of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectMode {
    /// At most one key selected; picking replaces it.
    #[default]
    Single,
    /// Any number of distinct keys; picking toggles.
    Multi,
}

/// Tracks selected keys for a single- or multi-select control.
///
/// The mode is fixed at construction. Changing it means building a new
/// model.
#[derive(Debug, Clone)]
pub struct SelectionModel<K> {
    mode: SelectMode,
    selected: Vec<K>,
}

impl<K> SelectionModel<K> {
    /// Whether more than one key may be selected.
    pub fn is_multiple_selection(&self) -> bool {
        self.mode == SelectMode::Multi
    }

    /// The fixed selection mode.
    pub fn mode(&self) -> SelectMode {
        self.mode
    }

    /// Selected keys in insertion order.
    pub fn selected(&self) -> &[K] {
        &self.selected
    }

    /// Number of selected keys.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

impl<K: Clone + PartialEq> SelectionModel<K> {
    /// Create an empty selection.
    pub fn new(mode: SelectMode) -> Self {
        Self {
            mode,
            selected: Vec::new(),
        }
    }

    /// Create a selection seeded from an initial value.
    ///
    /// A scalar seeds a multi selection with one key; a list seeds a single
    /// selection with its first key. Duplicates are dropped, keeping the
    /// first occurrence.
    pub fn with_value(mode: SelectMode, value: Option<SelectValue<K>>) -> Self {
        let mut model = Self::new(mode);
        let keys = match value {
            None | Some(SelectValue::Single(None)) => Vec::new(),
            Some(SelectValue::Single(Some(key))) => vec![key],
            Some(SelectValue::Multi(keys)) => keys,
        };

        match mode {
            SelectMode::Single => {
                if let Some(first) = keys.into_iter().next() {
                    model.selected.push(first);
                }
            }
            SelectMode::Multi => {
                for key in keys {
                    model.select(key);
                }
            }
        }
        model
    }

    /// Check if a key is selected.
    pub fn is_selected(&self, key: &K) -> bool {
        self.selected.contains(key)
    }

    /// Select a key. Returns true if the selection changed.
    ///
    /// In single mode the key replaces the current one; selecting the key
    /// that is already selected is a no-op, not a toggle.
    pub fn select(&mut self, key: K) -> bool {
        match self.mode {
            SelectMode::Single => {
                if self.selected.len() == 1 && self.selected[0] == key {
                    return false;
                }
                self.selected.clear();
                self.selected.push(key);
                true
            }
            SelectMode::Multi => {
                if self.selected.contains(&key) {
                    return false;
                }
                self.selected.push(key);
                true
            }
        }
    }

    /// Deselect a key. Returns true if it was selected.
    pub fn deselect(&mut self, key: &K) -> bool {
        match self.selected.iter().position(|k| k == key) {
            Some(pos) => {
                self.selected.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Multi mode toggle, single mode select. Returns true if changed.
    pub fn pick(&mut self, key: K) -> bool {
        match self.mode {
            SelectMode::Single => {
                if self.is_selected(&key) {
                    false
                } else {
                    self.select(key)
                }
            }
            SelectMode::Multi => {
                if self.is_selected(&key) {
                    self.deselect(&key)
                } else {
                    self.select(key)
                }
            }
        }
    }

    /// The selection as an external value.
    ///
    /// Single mode yields the sole key or no value; multi mode yields every
    /// key in insertion order.
    pub fn value(&self) -> SelectValue<K> {
        match self.mode {
            SelectMode::Single => SelectValue::Single(self.selected.first().cloned()),
            SelectMode::Multi => SelectValue::Multi(self.selected.clone()),
        }
    }
}
