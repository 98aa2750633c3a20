use std::collections::HashSet;

use super::deltas::InputDeltas;
use super::types::{ButtonState, InputEvent, Key, Modifiers, MouseButton};

/// Held input state.
///
/// Tracks what is currently down and where the pointer is. Transitions are
/// recorded into [`InputDeltas`] as events are applied.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,
    /// Pointer in device-independent pixels, `None` outside the window.
    pub pointer: Option<(f64, f64)>,
    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    pub fn apply(&mut self, deltas: &mut InputDeltas, ev: InputEvent) {
        match ev {
            InputEvent::Key { key, state } => match state {
                ButtonState::Pressed => {
                    if self.keys_down.insert(key) {
                        deltas.keys_pressed.insert(key);
                    }
                }
                ButtonState::Released => {
                    if self.keys_down.remove(&key) {
                        deltas.keys_released.insert(key);
                    }
                }
            },

            InputEvent::ModifiersChanged(m) => self.modifiers = m,

            InputEvent::PointerMoved { x, y } => self.pointer = Some((x, y)),

            InputEvent::PointerLeft => self.pointer = None,

            InputEvent::Button { button, state } => match state {
                ButtonState::Pressed => {
                    if self.buttons_down.insert(button) {
                        deltas.buttons_pressed.insert(button);
                    }
                }
                ButtonState::Released => {
                    if self.buttons_down.remove(&button) {
                        deltas.buttons_released.insert(button);
                    }
                }
            },

            InputEvent::Wheel { dx, dy } => {
                deltas.wheel.0 += dx;
                deltas.wheel.1 += dy;
            }

            InputEvent::Text(text) => deltas.text.push_str(&text),

            InputEvent::Focused(focused) => {
                self.focused = focused;
                if !focused {
                    // Releases are lost while unfocused; drop held sets so
                    // nothing stays stuck down.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }
}
