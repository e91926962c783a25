//! Common module
//!
//! This module contains the error type, logging backend and file helpers
//! shared by the rest of the crate.

pub mod error;
pub mod fs;
pub mod log;

// Re-export commonly used types and functions
pub use error::{AppConfigError, Result};
pub use log::{configure_logger, init_logger, override_log_level};
