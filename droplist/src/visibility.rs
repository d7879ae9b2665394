//! Open/closed state of the overlay.

/// Whether the overlay is shown.
///
/// Both transitions are refused while the owning control is disabled. An
/// accepted call reports `true` so the caller can fire its touch
/// notification, even when the state did not flip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Visibility {
    is_open: bool,
}

impl Visibility {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Show the overlay unless `disabled`. Returns whether the call was accepted.
    pub fn open(&mut self, disabled: bool) -> bool {
        if disabled {
            return false;
        }
        self.is_open = true;
        true
    }

    /// Hide the overlay unless `disabled`. Returns whether the call was accepted.
    pub fn close(&mut self, disabled: bool) -> bool {
        if disabled {
            return false;
        }
        self.is_open = false;
        true
    }
}

/// Geometry source for sizing the overlay.
///
/// The controller only reads the width and hands it back unchanged.
pub trait OverlayAnchor {
    /// Width of the control's bounding box.
    fn bounding_width(&self) -> f32;
}

impl OverlayAnchor for f32 {
    fn bounding_width(&self) -> f32 {
        *self
    }
}
