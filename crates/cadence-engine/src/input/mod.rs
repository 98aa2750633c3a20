//! Input snapshots.
//!
//! Device polling and event translation belong to the platform. This module
//! only queues the translated events and freezes them into one
//! [`InputSnapshot`] per frame.

mod deltas;
mod hub;
mod snapshot;
mod state;
mod types;

pub use deltas::InputDeltas;
pub use hub::InputHub;
pub use snapshot::InputSnapshot;
pub use state::InputState;
pub use types::{ButtonState, InputEvent, Key, Modifiers, MouseButton};
