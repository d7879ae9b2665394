//! External value of a select control.

use serde::{Deserialize, Serialize};

/// Value exchanged with whatever binds to the control.
///
/// Serialized untagged: `null` or a scalar for single selection, an array
/// for multi selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectValue<K> {
    /// Array form.
    Multi(Vec<K>),
    /// Scalar form; `None` means no value.
    Single(Option<K>),
}

impl<K> SelectValue<K> {
    /// The no-value single form.
    pub fn none() -> Self {
        Self::Single(None)
    }

    /// Check if the value holds no key at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(key) => key.is_none(),
            Self::Multi(keys) => keys.is_empty(),
        }
    }

    /// Keys held by this value, in order.
    pub fn keys(&self) -> Vec<&K> {
        match self {
            Self::Single(key) => key.iter().collect(),
            Self::Multi(keys) => keys.iter().collect(),
        }
    }
}

impl<K> Default for SelectValue<K> {
    fn default() -> Self {
        Self::none()
    }
}

impl<K> From<K> for SelectValue<K> {
    fn from(key: K) -> Self {
        Self::Single(Some(key))
    }
}

impl<K> From<Vec<K>> for SelectValue<K> {
    fn from(keys: Vec<K>) -> Self {
        Self::Multi(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_null_as_no_value() {
        let value: SelectValue<u32> = serde_json::from_str("null").unwrap();
        assert_eq!(value, SelectValue::Single(None));
        assert!(value.is_empty());
    }

    #[test]
    fn deserializes_scalar_and_array() {
        let single: SelectValue<u32> = serde_json::from_str("3").unwrap();
        assert_eq!(single, SelectValue::Single(Some(3)));

        let multi: SelectValue<u32> = serde_json::from_str("[1, 2]").unwrap();
        assert_eq!(multi, SelectValue::Multi(vec![1, 2]));
    }

    #[test]
    fn serializes_untagged() {
        assert_eq!(serde_json::to_string(&SelectValue::Single(Some("a"))).unwrap(), "\"a\"");
        assert_eq!(serde_json::to_string(&SelectValue::<u8>::none()).unwrap(), "null");
        assert_eq!(serde_json::to_string(&SelectValue::Multi(vec![1, 2])).unwrap(), "[1,2]");
    }
}
