//! Process-wide fault channel.
//!
//! The first runtime error observed on any execution context is latched here.
//! Every frame and every logical update checks the latch first and stops as
//! soon as it is set.

mod latch;

pub use latch::FaultLatch;
