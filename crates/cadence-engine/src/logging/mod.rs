//! Logging utilities.
//!
//! The runtime logs through the `log` facade only. Hosts that want the default
//! `env_logger` backend call [`init_logging`] early in `main`.

mod init;

pub use init::{ENV_LOG, LoggingConfig, init_logging};
