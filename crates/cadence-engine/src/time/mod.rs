//! Time subsystem.
//!
//! Converts wall-clock samples into a count of logical update steps.
//! Intended usage:
//! - one `TickClock` per frame loop
//! - call `ticks_owed()` once per frame, before running updates

mod tick_clock;

pub use tick_clock::{TickClock, TickRate};
