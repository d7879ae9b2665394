//! Selection engine for dropdown select controls
//!
//! Tracks a changing set of items declared by a UI layer, keeps single- or
//! multi-selection state, reconciles it with values pushed by a form, and
//! exposes the open/closed state of the overlay. Drawing is left to the UI
//! layer.

pub mod config;
pub mod controller;
pub mod error;
pub mod registry;
pub mod selection;
pub mod value;
pub mod visibility;

pub use config::{SelectConfig, SelectDefaults};
pub use controller::{SelectController, SelectId, ValueAccessor};
pub use error::ConfigError;
pub use registry::{ActivationGuard, ItemDescriptor, ItemHandle, ItemRegistry, RegistryEvent, RegistrySubscription};
pub use selection::{SelectMode, SelectionModel};
pub use value::SelectValue;
pub use visibility::{OverlayAnchor, Visibility};

pub mod prelude {
    pub use crate::config::{SelectConfig, SelectDefaults};
    pub use crate::controller::{SelectController, ValueAccessor};
    pub use crate::registry::{ItemDescriptor, ItemHandle, ItemRegistry};
    pub use crate::selection::SelectMode;
    pub use crate::value::SelectValue;
}
