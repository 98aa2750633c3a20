//! Coordinate mapping between the logical game surface and the physical screen.
//!
//! Conventions:
//! - origin top-left, +X right, +Y down
//! - "outside" sizes are device-independent pixels reported by the platform
//! - screen sizes are physical pixels (outside × device scale factor)
//! - offscreen sizes are logical pixels chosen by the game's layout

mod geometry;
mod viewport;

pub use geometry::{ScaleOffsets, ScreenGeometry};
pub use viewport::Viewport;
