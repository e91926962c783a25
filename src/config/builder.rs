//! Configuration builder
//!
//! This module provides a builder that turns validated internal settings
//! into a `Configuration` by loading the candidate property files.

use std::path::PathBuf;

use log::{debug, error, info};

use crate::common::{AppConfigError, Result};
use crate::config::configuration::Configuration;
use crate::config::defaults;
use crate::config::extended::ExtendedProperties;
use crate::config::naming::{generate_configuration_names, CandidateFile, ConfigurationKind};
use crate::config::resolver::resource_roots;

/// Name of the system properties layer
pub const SYSTEM_PROPERTIES_LAYER: &str = "system properties";

/// Configuration builder
///
/// Provides a fluent API for building the combined configuration.
pub struct ConfigurationBuilder {
    settings: ExtendedProperties,
    system_properties: Option<ExtendedProperties>,
    resource_roots: Vec<PathBuf>,
    kinds: Vec<ConfigurationKind>,
}

impl ConfigurationBuilder {
    /// Create a builder for the given internal settings
    pub fn new(settings: ExtendedProperties) -> Self {
        let resource_roots = resource_roots(&settings);
        Self {
            settings,
            system_properties: None,
            resource_roots,
            kinds: vec![ConfigurationKind::Application, ConfigurationKind::Database],
        }
    }

    /// Add system properties; they are only used when
    /// `appconfig.systemPropertiesOverride` is set
    pub fn with_system_properties(mut self, properties: ExtendedProperties) -> Self {
        debug!("Adding {} system properties", properties.len());
        self.system_properties = Some(properties);
        self
    }

    /// Resolve resource names against these roots instead of
    /// `appconfig.resourceRoots`
    pub fn with_resource_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.resource_roots = roots;
        self
    }

    /// Skip the database files
    pub fn without_database(mut self) -> Self {
        self.kinds.retain(|kind| *kind != ConfigurationKind::Database);
        self
    }

    /// Candidate files in load order, highest priority first
    pub fn candidates(&self) -> Vec<(ConfigurationKind, CandidateFile)> {
        self.kinds
            .iter()
            .flat_map(|kind| {
                generate_configuration_names(&self.settings, *kind)
                    .into_iter()
                    .map(move |candidate| (*kind, candidate))
            })
            .collect()
    }

    /// Build the configuration
    pub fn build(self) -> Result<Configuration> {
        let mut configuration = Configuration::new();

        if self.settings.get_bool(defaults::SYSTEM_PROPERTIES_OVERRIDE) {
            if let Some(ref properties) = self.system_properties {
                debug!("System properties override configuration files");
                configuration.add_layer(SYSTEM_PROPERTIES_LAYER, properties.clone());
            }
        }

        for (kind, candidate) in self.candidates() {
            match candidate.locate(&self.resource_roots) {
                Some(path) => {
                    debug!("Loading {} configuration from {}", kind, path.display());
                    let properties = ExtendedProperties::load_file(&path).map_err(|e| {
                        error!("Failed to load {}: {}", path.display(), e);
                        e
                    })?;
                    configuration.add_layer(path.display().to_string(), properties);
                }
                None if candidate.required => {
                    error!("Required {} configuration not found: {}", kind, candidate.name);
                    return Err(AppConfigError::FileNotFound(PathBuf::from(&candidate.name)));
                }
                None => debug!("Optional {} configuration not found: {}", kind, candidate.name),
            }
        }

        info!(
            "Configuration built from {} layers: {}",
            configuration.layer_names().len(),
            configuration.layer_names().join(", ")
        );
        Ok(configuration)
    }
}
