//! Render target contract and lifecycle.
//!
//! The runtime never constructs targets itself: the game's factory methods do.
//! The runtime decides *when* a target must be replaced and guarantees the old
//! one is disposed before its replacement exists.

mod lifecycle;
mod render_target;

pub use lifecycle::TargetSlots;
pub use render_target::{RenderTarget, TargetKind, WriteNotifier};
