//! Configuration module
//!
//! This module handles the settings chain (options, system properties,
//! environment variables, defaults file), the naming of the property files
//! derived from it, and the combined configuration they are loaded into.

// Submodules
pub mod builder;
pub mod configuration;
pub mod defaults;
pub mod extended;
pub mod logging;
pub mod manager;
pub mod naming;
pub mod options;
pub mod properties;
pub mod resolver;
pub mod source;
pub mod validator;
pub mod value;

// Re-export types and traits
pub use self::builder::ConfigurationBuilder;
pub use self::configuration::Configuration;
pub use self::extended::ExtendedProperties;
pub use self::logging::LoggingSetup;
pub use self::manager::{add_listener, get, initialize, is_initialized, update, ConfigChangeEvent};
pub use self::naming::{CandidateFile, ConfigurationKind, FileLocation};
pub use self::options::Options;
pub use self::resolver::{check_run_time_environment, resolve, SettingsResolver};
pub use self::source::{system_properties, EnvSource, SettingSource, SystemPropertiesSource, ValueSource};
pub use self::validator::{check_warnings, validate_settings};
pub use self::value::PropertyValue;
