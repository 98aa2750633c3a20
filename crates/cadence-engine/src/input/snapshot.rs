use super::deltas::InputDeltas;
use super::state::InputState;
use super::types::{Key, MouseButton};

/// Immutable view of input for one frame.
///
/// Every logical update within a frame receives the same snapshot.
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    pub state: InputState,
    pub deltas: InputDeltas,
    /// Pointer mapped into the game's logical coordinates.
    ///
    /// `None` when the pointer is outside the window or the screen geometry
    /// is not established yet.
    pub cursor: Option<(f64, f64)>,
}

impl InputSnapshot {
    #[inline]
    pub fn key_down(&self, key: Key) -> bool {
        self.state.key_down(key)
    }

    #[inline]
    pub fn key_just_pressed(&self, key: Key) -> bool {
        self.deltas.keys_pressed.contains(&key)
    }

    #[inline]
    pub fn key_just_released(&self, key: Key) -> bool {
        self.deltas.keys_released.contains(&key)
    }

    #[inline]
    pub fn button_down(&self, button: MouseButton) -> bool {
        self.state.button_down(button)
    }

    #[inline]
    pub fn button_just_pressed(&self, button: MouseButton) -> bool {
        self.deltas.buttons_pressed.contains(&button)
    }
}
