//! Configuration file naming
//!
//! Turns the internal settings into the ordered list of candidate property
//! files for each kind of configuration. The first list entry has the
//! highest priority.

use std::fmt;
use std::path::{Path, PathBuf};

use log::trace;
use serde::Serialize;

use crate::common::fs::find_in_roots;
use crate::config::defaults;
use crate::config::extended::ExtendedProperties;

/// Kind of configuration a file belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigurationKind {
    /// Application settings
    Application,
    /// Database settings
    Database,
    /// Logging settings
    Logging,
}

impl ConfigurationKind {
    /// Setting holding the file prefix of this kind
    fn prefix_setting(self) -> &'static str {
        match self {
            ConfigurationKind::Application => defaults::APPLICATION_CONFIGURATION_PREFIX,
            ConfigurationKind::Database => defaults::DATABASE_CONFIGURATION_PREFIX,
            ConfigurationKind::Logging => defaults::LOGGING_CONFIGURATION_PREFIX,
        }
    }

    /// Setting holding the file suffix of this kind
    fn suffix_setting(self) -> &'static str {
        match self {
            ConfigurationKind::Logging => defaults::LOGGING_CONFIGURATION_NAME_SUFFIX,
            _ => defaults::CONFIGURATION_NAME_SUFFIX,
        }
    }
}

impl fmt::Display for ConfigurationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationKind::Application => write!(f, "application"),
            ConfigurationKind::Database => write!(f, "database"),
            ConfigurationKind::Logging => write!(f, "logging"),
        }
    }
}

/// Where a candidate file is looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileLocation {
    /// A path in the external configuration directory
    External,
    /// A name resolved against the resource roots
    Resource,
}

/// A property file that may be loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateFile {
    /// Path (external) or resource name
    pub name: String,
    /// Lookup location
    pub location: FileLocation,
    /// Whether loading fails when the file is missing
    pub required: bool,
}

impl CandidateFile {
    fn external(name: String) -> Self {
        Self {
            name,
            location: FileLocation::External,
            required: false,
        }
    }

    fn resource(name: String, required: bool) -> Self {
        Self {
            name,
            location: FileLocation::Resource,
            required,
        }
    }

    /// Locate the file; `None` when it does not exist
    pub fn locate<P: AsRef<Path>>(&self, resource_roots: &[P]) -> Option<PathBuf> {
        match self.location {
            FileLocation::External => {
                let path = PathBuf::from(&self.name);
                path.is_file().then_some(path)
            }
            FileLocation::Resource => find_in_roots(&self.name, resource_roots),
        }
    }
}

impl fmt::Display for CandidateFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = match self.location {
            FileLocation::External => "external",
            FileLocation::Resource => "resource",
        };
        let required = if self.required { "required" } else { "optional" };
        write!(f, "{} ({}, {})", self.name, location, required)
    }
}

/// `{prefix}-{name}.{suffix}`
pub fn configuration_file_name(prefix: &str, name: &str, suffix: &str) -> String {
    format!("{}-{}.{}", prefix, name, suffix)
}

/// Generate the candidate files of one kind, highest priority first.
///
/// 1. `{externalDir}/{prefix}-{env}.{suffix}` when an external directory is set
/// 2. `{packageDir}/{prefix}-{env}.{suffix}`
/// 3. `{packageDir}/{prefix}-{defaultName}.{suffix}`: required for the
///    application kind, and only generated for database and logging when
///    their default configuration is enabled
pub fn generate_configuration_names(
    properties: &ExtendedProperties,
    kind: ConfigurationKind,
) -> Vec<CandidateFile> {
    let prefix = properties.get_string(kind.prefix_setting()).unwrap_or_default();
    let suffix = properties.get_string(kind.suffix_setting()).unwrap_or_default();
    let env = properties.get_string(defaults::RUN_TIME_ENVIRONMENT).unwrap_or_default();
    let default_name = properties.get_string(defaults::DEFAULT_CONFIGURATION_NAME).unwrap_or_default();
    let path_prefix = properties
        .get_non_empty(defaults::APPLICATION_PROPERTIES_PACKAGE_DIR)
        .map(|dir| format!("{}/", dir.trim_end_matches('/')))
        .unwrap_or_default();

    let mut names = Vec::with_capacity(3);

    if let Some(dir) = properties.get_non_empty(defaults::EXTERNAL_CONFIGURATION_DIRECTORY) {
        names.push(CandidateFile::external(format!(
            "{}/{}",
            dir.trim_end_matches('/'),
            configuration_file_name(&prefix, &env, &suffix)
        )));
    }

    names.push(CandidateFile::resource(
        format!("{}{}", path_prefix, configuration_file_name(&prefix, &env, &suffix)),
        false,
    ));

    let default_file = format!("{}{}", path_prefix, configuration_file_name(&prefix, &default_name, &suffix));
    match kind {
        ConfigurationKind::Application => names.push(CandidateFile::resource(default_file, true)),
        ConfigurationKind::Database => {
            if properties.get_bool(defaults::DATABASE_DEFAULT_CONFIGURATION_ENABLED) {
                names.push(CandidateFile::resource(default_file, false));
            }
        }
        ConfigurationKind::Logging => {
            if properties.get_bool(defaults::LOGGING_DEFAULT_CONFIGURATION_ENABLED) {
                names.push(CandidateFile::resource(default_file, false));
            }
        }
    }

    for name in &names {
        trace!("{} configuration candidate {}", kind, name);
    }
    names
}
