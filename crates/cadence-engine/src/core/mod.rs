//! Collaborator contracts.
//!
//! This module defines the interface between the runtime and the code around
//! it: the host's [`Game`], the windowing [`Platform`], and the
//! [`GraphicsDriver`] that owns command submission. Nothing here depends on a
//! particular windowing or graphics library.

mod driver;
mod game;
mod platform;

pub use driver::GraphicsDriver;
pub use game::Game;
pub use platform::{FrameParams, FrameRequest, Platform};
