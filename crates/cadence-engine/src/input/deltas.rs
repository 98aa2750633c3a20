use std::collections::HashSet;

use super::types::{Key, MouseButton};

/// Input transitions not yet observed by a logical update.
///
/// Deltas accumulate across frames that run zero updates and are cleared once
/// a frame has run at least one.
#[derive(Debug, Clone, Default)]
pub struct InputDeltas {
    pub keys_pressed: HashSet<Key>,
    pub keys_released: HashSet<Key>,
    pub buttons_pressed: HashSet<MouseButton>,
    pub buttons_released: HashSet<MouseButton>,
    /// Accumulated wheel movement `(dx, dy)`.
    pub wheel: (f64, f64),
    /// Committed text.
    pub text: String,
}

impl InputDeltas {
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.wheel = (0.0, 0.0);
        self.text.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.keys_pressed.is_empty()
            && self.keys_released.is_empty()
            && self.buttons_pressed.is_empty()
            && self.buttons_released.is_empty()
            && self.wheel == (0.0, 0.0)
            && self.text.is_empty()
    }
}
