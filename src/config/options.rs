//! Programmatic options
//!
//! The highest-priority source of the settings chain: values handed to the
//! bootstrap by the embedding program.

use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::config::defaults;
use crate::config::value::PropertyValue;

/// Runtime options supplied by the application
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    settings: BTreeMap<String, PropertyValue>,
}

impl Options {
    /// Create an empty set of options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option; strings go through the usual type inference
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> &mut Self {
        self.settings.insert(name.into(), value.into());
        self
    }

    /// Builder form of `set`
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Get an option
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.settings.get(name)
    }

    /// Get an option as a string; `None` when missing or null
    pub fn get_string(&self, name: &str) -> Option<String> {
        self.get(name).and_then(PropertyValue::as_string)
    }

    /// Remove an option
    pub fn remove(&mut self, name: &str) -> Option<PropertyValue> {
        self.settings.remove(name)
    }

    /// Whether no option is set
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Iterate over options in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropertyValue)> {
        self.settings.iter()
    }

    /// Package holding the application's property files, e.g. `com.example`
    pub fn set_application_properties_package_name(&mut self, package: &str) -> &mut Self {
        self.set(defaults::APPLICATION_PROPERTIES_PACKAGE_NAME, package)
    }

    /// Directory searched before the package directory
    pub fn set_external_configuration_directory(&mut self, dir: &str) -> &mut Self {
        self.set(defaults::EXTERNAL_CONFIGURATION_DIRECTORY, dir)
    }

    /// Run-time environment, e.g. `test`
    pub fn set_run_time_environment(&mut self, env: &str) -> &mut Self {
        self.set(defaults::RUN_TIME_ENVIRONMENT, env)
    }

    /// Roots the package directory is resolved against
    pub fn set_resource_roots(&mut self, roots: &[String]) -> &mut Self {
        self.set(defaults::RESOURCE_ROOTS, roots.to_vec())
    }

    /// Write `name=value` lines
    pub fn dump<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (name, value) in &self.settings {
            writeln!(out, "{}={}", name, value)?;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for Options {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = Options::new();
        for (name, value) in iter {
            options.set(name, value);
        }
        options
    }
}
