//! Registry of the items a select control can pick from.

mod events;
mod item;
mod state;

pub use events::{ActivationGuard, RegistryEvent, RegistrySubscription, SubscriberId};
pub use item::{ItemDescriptor, ItemHandle};
pub use state::ItemRegistry;
