//! Select controller - orchestrates registry, selection and visibility.

mod accessor;
mod state;

pub use accessor::ValueAccessor;
pub use state::{ChangeFn, SelectController, SelectId, TouchFn};
