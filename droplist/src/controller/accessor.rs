//! Form binding protocol.

use log::debug;

use super::state::{ChangeFn, SelectController, TouchFn};

/// Contract between a form control and the form that binds its value.
///
/// The form pushes values in with [`write_value`](Self::write_value) and
/// learns about user changes through the registered callbacks.
pub trait ValueAccessor<K> {
    /// Synchronize the control with a value pushed by the form.
    fn write_value(&mut self, value: Option<K>);

    /// Called once per accepted value change with the new value.
    fn register_on_change(&mut self, f: ChangeFn<K>);

    /// Called whenever the user interacts with the control.
    fn register_on_touched(&mut self, f: TouchFn);

    fn set_disabled_state(&mut self, disabled: bool);
}

impl<K: Clone + PartialEq> ValueAccessor<K> for SelectController<K> {
    /// A value matching no current item, or no value at all, leaves the
    /// selection unchanged.
    fn write_value(&mut self, value: Option<K>) {
        match value {
            Some(key) => {
                self.write_key(&key);
            }
            None => debug!("{}: empty value written, keeping selection", self.id()),
        }
    }

    fn register_on_change(&mut self, f: ChangeFn<K>) {
        self.set_change_fn(f);
    }

    fn register_on_touched(&mut self, f: TouchFn) {
        self.set_touch_fn(f);
    }

    fn set_disabled_state(&mut self, disabled: bool) {
        self.set_disabled(disabled);
    }
}
