//! Run configuration.
//!
//! [`RunOptions`] is fixed for the duration of a run. [`RuntimeSettings`] holds
//! the subset that may change while frames are running and is shared across
//! threads.

mod options;
mod settings;

pub use options::{ENV_SINGLE_THREAD, ENV_TPS, RunOptions};
pub use settings::RuntimeSettings;
