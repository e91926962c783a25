//! Error handling module
//!
//! This module defines the error type and result type alias used by every
//! part of the configuration bootstrap. Loading is all-or-nothing, so every
//! failure ends up as an `AppConfigError` returned to the caller.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// AppConfig error type
#[derive(Error, Debug)]
pub enum AppConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A required file could not be found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// A properties file could not be parsed
    #[error("Parse error in {origin} at line {line}: {message}")]
    Parse {
        /// File name or other description of the input
        origin: String,
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },

    /// A setting holds a value that cannot be used
    #[error("Invalid value for '{0}': {1}")]
    InvalidValue(String, String),

    /// A setting that must be present is missing
    #[error("Missing required configuration value: {0}")]
    MissingRequiredValue(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Logging backend error
    #[error("Logging error: {0}")]
    Logging(String),
}

/// Result type alias
///
/// This is a `Result` type alias that uses our custom `AppConfigError`.
pub type Result<T> = std::result::Result<T, AppConfigError>;

impl From<config::ConfigError> for AppConfigError {
    fn from(err: config::ConfigError) -> Self {
        AppConfigError::Config(err.to_string())
    }
}
