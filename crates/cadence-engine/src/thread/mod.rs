//! Thread coordination.
//!
//! Work that must run on a particular OS thread is expressed as a [`Job`]
//! submitted to an [`ExecutionContext`]. The [`Coordinator`] wires the main,
//! render and game contexts together and owns the run loop.

mod cancel;
mod context;
mod coordinator;
mod group;

pub use cancel::CancelToken;
pub use context::{ContextHandle, ExecutionContext, InlineThread, Job, OsThread, call_on};
pub use coordinator::Coordinator;
pub use group::TaskGroup;
