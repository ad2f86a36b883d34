//! Logging bootstrap.
//!
//! Everything in the workspace logs through the `log` facade; this module only
//! decides which backend receives the records (`env_logger`) and how it filters.

mod init;

pub use init::{init_logging, LoggingConfig};
