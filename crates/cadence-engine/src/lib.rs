//! Cadence engine crate.
//!
//! Frame orchestration for games: paces logical updates against wall-clock
//! time, manages the offscreen and screen render targets, skips redundant
//! composites, and coordinates the main, render and game threads. Windowing,
//! input translation and GPU work stay with the host through the traits in
//! [`core`].

pub mod config;
pub mod coords;
pub mod core;
pub mod error;
pub mod fault;
pub mod frame;
pub mod input;
pub mod logging;
pub mod target;
pub mod thread;
pub mod time;

pub use config::{RunOptions, RuntimeSettings};
pub use coords::{ScaleOffsets, ScreenGeometry, Viewport};
pub use self::core::{FrameParams, FrameRequest, Game, GraphicsDriver, Platform};
pub use error::{Result, RuntimeError};
pub use fault::FaultLatch;
pub use frame::{FrameContext, FramePhase};
pub use input::{InputEvent, InputHub, InputSnapshot};
pub use target::{RenderTarget, TargetKind, WriteNotifier};
pub use thread::{ContextHandle, Coordinator, ExecutionContext};
pub use time::{TickClock, TickRate};
