//! Setting sources
//!
//! This module defines the trait and implementations for the sources of the
//! settings chain. Each source answers a lookup by exact setting name.

use std::collections::BTreeMap;
use std::env;
use std::fmt;

use log::trace;

use crate::config::extended::ExtendedProperties;
use crate::config::options::Options;
use crate::config::value::PropertyValue;

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueSource {
    /// Programmatic options
    Options,
    /// System property registry
    SystemProperty,
    /// Process environment variable
    Environment,
    /// Defaults file
    Defaults,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::Options => write!(f, "options"),
            ValueSource::SystemProperty => write!(f, "system property"),
            ValueSource::Environment => write!(f, "environment"),
            ValueSource::Defaults => write!(f, "defaults"),
        }
    }
}

/// Setting source trait
#[cfg_attr(test, mockall::automock)]
pub trait SettingSource {
    /// Look a setting up by exact name
    fn lookup(&self, name: &str) -> Option<PropertyValue>;

    /// Get the source type
    fn source_type(&self) -> ValueSource;
}

/// Programmatic options source
pub struct OptionsSource<'a> {
    options: &'a Options,
}

impl<'a> OptionsSource<'a> {
    /// Create a new options source
    pub fn new(options: &'a Options) -> Self {
        Self { options }
    }
}

impl SettingSource for OptionsSource<'_> {
    fn lookup(&self, name: &str) -> Option<PropertyValue> {
        self.options.get(name).cloned()
    }

    fn source_type(&self) -> ValueSource {
        ValueSource::Options
    }
}

/// System properties source, backed by a snapshot of the registry
pub struct SystemPropertiesSource {
    properties: BTreeMap<String, String>,
}

impl SystemPropertiesSource {
    /// Snapshot the process-wide registry
    pub fn from_registry() -> Self {
        Self {
            properties: system_properties::snapshot(),
        }
    }

    /// Use an explicit set of properties
    pub fn from_map(properties: BTreeMap<String, String>) -> Self {
        Self { properties }
    }

    /// The properties as an `ExtendedProperties` list
    pub fn to_properties(&self) -> ExtendedProperties {
        ExtendedProperties::from_pairs(self.properties.iter().map(|(k, v)| (k.clone(), v)))
    }
}

impl SettingSource for SystemPropertiesSource {
    fn lookup(&self, name: &str) -> Option<PropertyValue> {
        self.properties.get(name).map(|raw| PropertyValue::infer(raw))
    }

    fn source_type(&self) -> ValueSource {
        ValueSource::SystemProperty
    }
}

/// Environment variable source
///
/// Variables are matched by exact name, e.g. `appconfig.runTimeEnvironment`.
pub struct EnvSource {
    vars: Option<BTreeMap<String, String>>,
}

impl EnvSource {
    /// Read the process environment on every lookup
    pub fn from_process() -> Self {
        Self { vars: None }
    }

    /// Use an injected set of variables
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }
}

impl SettingSource for EnvSource {
    fn lookup(&self, name: &str) -> Option<PropertyValue> {
        let raw = match &self.vars {
            Some(vars) => vars.get(name).cloned(),
            None => env::var(name).ok(),
        };
        if let Some(ref value) = raw {
            trace!("Found environment variable {}={}", name, value);
        }
        raw.map(|value| PropertyValue::infer(&value))
    }

    fn source_type(&self) -> ValueSource {
        ValueSource::Environment
    }
}

/// Defaults file source
pub struct DefaultsSource<'a> {
    defaults: &'a ExtendedProperties,
}

impl<'a> DefaultsSource<'a> {
    /// Create a new defaults source
    pub fn new(defaults: &'a ExtendedProperties) -> Self {
        Self { defaults }
    }
}

impl SettingSource for DefaultsSource<'_> {
    fn lookup(&self, name: &str) -> Option<PropertyValue> {
        self.defaults.get(name).cloned()
    }

    fn source_type(&self) -> ValueSource {
        ValueSource::Defaults
    }
}

/// Process-wide system properties
///
/// Filled by the binaries from `-D key=value` flags, or by the embedding
/// program before the bootstrap runs.
pub mod system_properties {
    use std::collections::BTreeMap;
    use std::sync::RwLock;

    use once_cell::sync::Lazy;

    static REGISTRY: Lazy<RwLock<BTreeMap<String, String>>> =
        Lazy::new(|| RwLock::new(BTreeMap::new()));

    /// Set a property, returning the previous value
    pub fn set(name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        match REGISTRY.write() {
            Ok(mut guard) => guard.insert(name.into(), value.into()),
            Err(poisoned) => poisoned.into_inner().insert(name.into(), value.into()),
        }
    }

    /// Get a property
    pub fn get(name: &str) -> Option<String> {
        match REGISTRY.read() {
            Ok(guard) => guard.get(name).cloned(),
            Err(poisoned) => poisoned.into_inner().get(name).cloned(),
        }
    }

    /// Remove a property, returning its value
    pub fn remove(name: &str) -> Option<String> {
        match REGISTRY.write() {
            Ok(mut guard) => guard.remove(name),
            Err(poisoned) => poisoned.into_inner().remove(name),
        }
    }

    /// Copy of every property
    pub fn snapshot() -> BTreeMap<String, String> {
        match REGISTRY.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Remove every property
    pub fn clear() {
        match REGISTRY.write() {
            Ok(mut guard) => guard.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }

    /// Parse a `key=value` definition as given to `-D`.
    ///
    /// A definition without `=` sets the property to the empty string.
    pub fn parse_definition(definition: &str) -> Option<(String, String)> {
        let (name, value) = match definition.split_once('=') {
            Some((name, value)) => (name.trim(), value),
            None => (definition.trim(), ""),
        };
        if name.is_empty() {
            return None;
        }
        Some((name.to_string(), value.to_string()))
    }
}
