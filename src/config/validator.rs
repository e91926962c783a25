//! Settings validator
//!
//! This module validates the internal settings before they are turned into
//! file names.

use std::path::Path;

use log::warn;

use crate::common::log::parse_level;
use crate::common::{AppConfigError, Result};
use crate::config::defaults;
use crate::config::extended::ExtendedProperties;

/// Validate the internal settings
pub fn validate_settings(settings: &ExtendedProperties) -> Result<()> {
    // Validate file naming settings
    validate_naming_settings(settings)?;

    // Validate run-time environment settings
    validate_environment_settings(settings)?;

    // Validate logging settings
    validate_logging_settings(settings);

    Ok(())
}

/// Validate file naming settings
fn validate_naming_settings(settings: &ExtendedProperties) -> Result<()> {
    for name in [
        defaults::APPLICATION_CONFIGURATION_PREFIX,
        defaults::CONFIGURATION_NAME_SUFFIX,
        defaults::DEFAULT_CONFIGURATION_NAME,
    ] {
        require_non_empty(settings, name)?;
    }

    if settings.get_bool(defaults::LOGGING_ENABLED) {
        require_non_empty(settings, defaults::LOGGING_CONFIGURATION_PREFIX)?;
        require_non_empty(settings, defaults::LOGGING_CONFIGURATION_NAME_SUFFIX)?;
    }

    Ok(())
}

/// Validate run-time environment settings
fn validate_environment_settings(settings: &ExtendedProperties) -> Result<()> {
    let permitted = settings
        .get_list(defaults::PERMITTED_RUN_TIME_ENVIRONMENTS)
        .unwrap_or_default();
    if permitted.iter().all(|env| env.is_empty()) {
        return Err(AppConfigError::MissingRequiredValue(
            defaults::PERMITTED_RUN_TIME_ENVIRONMENTS.to_string(),
        ));
    }

    let default_env = require_non_empty(settings, defaults::DEFAULT_RUN_TIME_ENVIRONMENT)?;
    if !permitted.iter().any(|env| env.eq_ignore_ascii_case(&default_env)) {
        return Err(AppConfigError::InvalidValue(
            defaults::DEFAULT_RUN_TIME_ENVIRONMENT.to_string(),
            format!(
                "{} is not one of the permitted run-time environments: {}",
                default_env,
                permitted.join(", ")
            ),
        ));
    }

    Ok(())
}

/// Validate logging settings
fn validate_logging_settings(settings: &ExtendedProperties) {
    if let Some(level) = settings.get_non_empty(defaults::LOGGING_LOG_LEVEL) {
        if parse_level(&level).is_err() {
            warn!("Invalid log level: {}. Using default: {}", level, defaults::LOG_LEVEL_STR);
        }
    }
}

fn require_non_empty(settings: &ExtendedProperties, name: &str) -> Result<String> {
    settings
        .get_non_empty(name)
        .ok_or_else(|| AppConfigError::MissingRequiredValue(name.to_string()))
}

/// Settings validator trait
pub trait SettingsValidator {
    /// Check settings for warnings
    fn check_warnings(&self) -> Vec<String>;
}

impl SettingsValidator for ExtendedProperties {
    fn check_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        // Check the requested run-time environment
        let permitted = self
            .get_list(defaults::PERMITTED_RUN_TIME_ENVIRONMENTS)
            .unwrap_or_default();
        match self.get_string(defaults::RUN_TIME_ENVIRONMENT) {
            Some(env) if permitted.iter().any(|p| p.eq_ignore_ascii_case(&env)) => {}
            Some(env) => warnings.push(format!(
                "Run-time environment '{}' is not permitted, the default will be used",
                env
            )),
            None => warnings.push("No run-time environment set, the default will be used".to_string()),
        }

        // Check log levels
        for name in [defaults::LOGGING_LOG_LEVEL, defaults::BOOTSTRAP_LOGGING_LOG_LEVEL] {
            if let Some(level) = self.get_non_empty(name) {
                if parse_level(&level).is_err() {
                    warnings.push(format!("Invalid log level '{}' in {}", level, name));
                }
            }
        }

        // Check the external configuration directory
        if let Some(dir) = self.get_non_empty(defaults::EXTERNAL_CONFIGURATION_DIRECTORY) {
            if !Path::new(&dir).is_dir() {
                warnings.push(format!("External configuration directory not found: {}", dir));
            }
        }

        // Check the resource roots
        for root in self.get_list(defaults::RESOURCE_ROOTS).unwrap_or_default() {
            if !Path::new(&root).is_dir() {
                warnings.push(format!("Resource root not found: {}", root));
            }
        }

        warnings
    }
}

/// Check settings for warnings
pub fn check_warnings(settings: &ExtendedProperties) -> Vec<String> {
    SettingsValidator::check_warnings(settings)
}
