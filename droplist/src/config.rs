//! Select control configuration.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::selection::SelectMode;
use crate::value::SelectValue;

/// Placeholder used when no other placeholder is configured.
pub const DEFAULT_PLACEHOLDER: &str = "Choose a item";

/// Separator used to join the labels of several selected items.
pub const DEFAULT_SEPARATOR: &str = " ";

/// Application-wide overrides for select defaults.
///
/// Unset fields fall back to the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectDefaults {
    pub placeholder: Option<String>,
    pub mode: Option<SelectMode>,
}

/// Options recognized by a select controller.
///
/// # Example
///
/// ```
/// use droplist::{SelectConfig, SelectMode};
///
/// let config = SelectConfig::<u32>::new()
///     .with_mode(SelectMode::Multi)
///     .with_value(vec![1, 2])
///     .with_placeholder("Pick some");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "K: Deserialize<'de>"))]
pub struct SelectConfig<K> {
    /// Single or multi selection, fixed for the controller's lifetime.
    pub mode: SelectMode,
    /// Initial value; absent means empty.
    pub value: Option<SelectValue<K>>,
    /// Text shown while nothing visible is selected.
    pub placeholder: String,
    /// Initial disabled state.
    pub disabled: bool,
    /// Join string for multi-item labels.
    pub separator: String,
}

impl<K> Default for SelectConfig<K> {
    fn default() -> Self {
        Self {
            mode: SelectMode::default(),
            value: None,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            disabled: false,
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl<K> SelectConfig<K> {
    /// Create a configuration with built-in defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply application-wide defaults.
    ///
    /// Call before the per-control `with_*` methods so explicit settings win.
    pub fn with_defaults(mut self, defaults: &SelectDefaults) -> Self {
        if let Some(placeholder) = &defaults.placeholder {
            self.placeholder = placeholder.clone();
        }
        if let Some(mode) = defaults.mode {
            self.mode = mode;
        }
        self
    }

    pub fn with_mode(mut self, mode: SelectMode) -> Self {
        self.mode = mode;
        self
    }

    /// Shorthand for multi mode.
    pub fn multi(self) -> Self {
        self.with_mode(SelectMode::Multi)
    }

    pub fn with_value(mut self, value: impl Into<SelectValue<K>>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Check that the configuration can drive a controller.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.placeholder.trim().is_empty() {
            return Err(ConfigError::EmptyPlaceholder);
        }
        Ok(())
    }
}

impl<K: DeserializeOwned> SelectConfig<K> {
    /// Parse and validate a configuration from JSON.
    ///
    /// Missing fields take their built-in defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
