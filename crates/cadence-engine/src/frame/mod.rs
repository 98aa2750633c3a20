//! Per-frame orchestration.
//!
//! [`FrameContext`] runs one frame at a time: input snapshot, layout
//! negotiation, 0..N logical updates, then the draw pass with frame skipping.

mod context;
mod skip;

pub use context::{BeforeUpdateHook, FrameContext, FramePhase};
pub use skip::{MAX_SKIP_COUNT, SkipCounter};
