//! AppConfig: layered configuration bootstrap
//!
//! This library resolves a small set of internal settings from programmatic
//! options, system properties, environment variables and a bundled defaults
//! file, then uses them to find and load environment-specific property files
//! into one layered configuration. Logging is bootstrapped before the
//! property files are read and reconfigured from the logging files.
//!
//! # Main Features
//!
//! - Settings precedence: options > system properties > environment > defaults
//! - Type inference of property values (boolean, list, null, string)
//! - `{prefix}-{environment}.{suffix}` files with a `{prefix}-defaults.{suffix}` fallback
//! - External directory, package directory and resource root lookup
//! - `env_logger` backend configured from logging property files
//!
//! # Example
//!
//! ```no_run
//! use appconfig::{AppConfig, Result};
//!
//! fn main() -> Result<()> {
//!     let mut app = AppConfig::new();
//!     app.set_application_properties_package_name("com.example")
//!         .set_run_time_environment("production");
//!
//!     let configuration = app.configure()?;
//!     let port: u16 = configuration.get_parsed_or("server.port", 8080)?;
//!     println!("listening on {}", port);
//!
//!     Ok(())
//! }
//! ```

// Public modules
pub mod app;
pub mod common;
pub mod config;

// Re-export commonly used structures and functions for convenience
pub use app::{load_settings, system_or_environment_value, AppConfig};
pub use common::{AppConfigError, Result};
pub use config::{Configuration, ExtendedProperties, Options, PropertyValue};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
