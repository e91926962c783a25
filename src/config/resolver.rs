//! Settings resolution
//!
//! Resolves the internal settings from, highest priority first, programmatic
//! options, system properties, environment variables and the defaults file.

use std::path::PathBuf;

use log::{debug, error, trace, warn};

use crate::common::fs::find_in_roots;
use crate::common::{AppConfigError, Result};
use crate::config::defaults;
use crate::config::extended::ExtendedProperties;
use crate::config::options::Options;
use crate::config::source::{
    DefaultsSource, EnvSource, OptionsSource, SettingSource, SystemPropertiesSource, ValueSource,
};
use crate::config::value::PropertyValue;

/// Resolve one setting; the first source holding the name wins.
///
/// An explicit `null` in a higher source still wins, masking lower sources.
pub fn resolve(
    name: &str,
    options: &dyn SettingSource,
    system_properties: &dyn SettingSource,
    env: &dyn SettingSource,
    defaults: &dyn SettingSource,
) -> Option<PropertyValue> {
    resolve_with_source(name, &[options, system_properties, env, defaults]).map(|(value, _)| value)
}

/// Resolve one setting against sources ordered highest first, reporting the
/// source that supplied the value
pub fn resolve_with_source(
    name: &str,
    sources: &[&dyn SettingSource],
) -> Option<(PropertyValue, ValueSource)> {
    sources.iter().find_map(|source| {
        source.lookup(name).map(|value| {
            trace!("{} resolved from {}: {}", name, source.source_type(), value);
            (value, source.source_type())
        })
    })
}

/// Resolver for the internal settings
pub struct SettingsResolver {
    options: Options,
    system_properties: SystemPropertiesSource,
    env: EnvSource,
}

impl SettingsResolver {
    /// Resolve against the system property registry and the process environment
    pub fn new(options: Options) -> Self {
        Self::with_sources(
            options,
            SystemPropertiesSource::from_registry(),
            EnvSource::from_process(),
        )
    }

    /// Resolve against explicit sources
    pub fn with_sources(options: Options, system_properties: SystemPropertiesSource, env: EnvSource) -> Self {
        Self {
            options,
            system_properties,
            env,
        }
    }

    /// The programmatic options
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The system properties this resolver was created with
    pub fn system_properties(&self) -> &SystemPropertiesSource {
        &self.system_properties
    }

    /// Look a setting up in options, then system properties, then the
    /// environment. Defaults are not consulted.
    pub fn setting_from_options_env_system(&self, name: &str) -> Option<PropertyValue> {
        let options = OptionsSource::new(&self.options);
        resolve_with_source(name, &[&options, &self.system_properties, &self.env]).map(|(value, _)| value)
    }

    /// Resolve a setting through the whole chain and report its source
    pub fn setting_with_source(
        &self,
        name: &str,
        defaults: &ExtendedProperties,
    ) -> Option<(PropertyValue, ValueSource)> {
        let options = OptionsSource::new(&self.options);
        let defaults = DefaultsSource::new(defaults);
        resolve_with_source(name, &[&options, &self.system_properties, &self.env, &defaults])
    }

    /// Load the internal settings.
    ///
    /// Every name in the defaults file is resolved through the chain, then
    /// the result is post-processed.
    pub fn load_internal_properties(&self) -> Result<ExtendedProperties> {
        let defaults = self.load_defaults()?;
        let mut properties = self.apply_overrides(&defaults);
        post_process(&mut properties);

        debug!("Loaded {} internal settings", properties.len());
        Ok(properties)
    }

    /// Load the defaults file in effect.
    ///
    /// Starts from the bundled defaults. When
    /// `appconfig.internalDefaultPropertiesFileName` resolves to a name, the
    /// defaults are reloaded from that file. This happens at most once.
    pub fn load_defaults(&self) -> Result<ExtendedProperties> {
        let mut defaults = bundled_defaults()?;
        let mut overridden = false;

        loop {
            let merged = self.apply_overrides(&defaults);
            let file_name = match merged.get_non_empty(defaults::INTERNAL_DEFAULTS_FILE_NAME_PROPERTY) {
                Some(file_name) => file_name,
                None => break,
            };
            if overridden {
                break;
            }

            trace!("Reloading internal defaults from override {}", file_name);
            defaults = load_override(&file_name, &merged)?;
            overridden = true;
        }

        Ok(defaults)
    }

    /// Apply the chain to every name present in the defaults
    fn apply_overrides(&self, defaults: &ExtendedProperties) -> ExtendedProperties {
        let mut properties = defaults.clone();
        for name in defaults.names() {
            if let Some(value) = self.setting_from_options_env_system(&name) {
                properties.set(name, value);
            }
        }
        properties
    }
}

/// Parse the bundled defaults file
pub fn bundled_defaults() -> Result<ExtendedProperties> {
    ExtendedProperties::load_str(defaults::INTERNAL_DEFAULTS, defaults::INTERNAL_DEFAULTS_FILE_NAME).map_err(|e| {
        error!("Failed to load the bundled internal defaults: {}", e);
        e
    })
}

/// Load a replacement defaults file, resolving relative names against the
/// resource roots currently in effect
fn load_override(file_name: &str, current: &ExtendedProperties) -> Result<ExtendedProperties> {
    let roots = resource_roots(current);
    let path = find_in_roots(file_name, &roots).ok_or_else(|| {
        error!("Internal defaults override not found: {}", file_name);
        AppConfigError::FileNotFound(PathBuf::from(file_name))
    })?;

    debug!("Loading internal defaults from {}", path.display());
    ExtendedProperties::load_file(&path).map_err(|e| {
        error!("Failed to load internal defaults override {}: {}", path.display(), e);
        e
    })
}

/// Resource roots named by `appconfig.resourceRoots`, `.` when unset
pub fn resource_roots(properties: &ExtendedProperties) -> Vec<PathBuf> {
    match properties.get_list(defaults::RESOURCE_ROOTS) {
        Some(roots) if !roots.is_empty() => roots.into_iter().map(PathBuf::from).collect(),
        _ => vec![PathBuf::from(defaults::RESOURCE_ROOT_STR)],
    }
}

/// Dotted package name to directory form, `com.example` to `com/example`
pub fn package_dir(package_name: &str) -> String {
    package_name.replace('.', "/")
}

/// Post-process freshly resolved settings.
///
/// Derives the package directory from the package name unless a directory
/// was given, and appends the context path to the external directory when
/// `appconfig.useContextPathAsSuffix` is set.
pub fn post_process(properties: &mut ExtendedProperties) {
    if properties.is_null(defaults::APPLICATION_PROPERTIES_PACKAGE_DIR) {
        if let Some(package_name) = properties.get_non_empty(defaults::APPLICATION_PROPERTIES_PACKAGE_NAME) {
            let dir = package_dir(&package_name);
            trace!("Derived package directory {} from {}", dir, package_name);
            properties.set(defaults::APPLICATION_PROPERTIES_PACKAGE_DIR, PropertyValue::Str(dir));
        }
    }

    let external_dir = properties.get_string(defaults::EXTERNAL_CONFIGURATION_DIRECTORY);
    let context_path = properties.get_string(defaults::CONTEXT_PATH);
    let use_context_path = properties.get_bool(defaults::USE_CONTEXT_PATH_AS_SUFFIX);

    if let (Some(dir), Some(context), true) = (external_dir, context_path, use_context_path) {
        let joined = if dir.ends_with('/') || context.starts_with('/') {
            format!("{}{}", dir, context)
        } else {
            format!("{}/{}", dir, context)
        };
        trace!("External configuration directory with context path: {}", joined);
        properties.set(defaults::EXTERNAL_CONFIGURATION_DIRECTORY, PropertyValue::Str(joined));
    }
}

/// Check the run-time environment.
///
/// Matches `appconfig.runTimeEnvironment` case-insensitively against the
/// permitted environments and stores the permitted spelling. Anything else
/// falls back to `appconfig.defaultRunTimeEnvironment`. Returns the
/// environment in effect.
pub fn check_run_time_environment(properties: &mut ExtendedProperties) -> Option<String> {
    let requested = properties.get_string(defaults::RUN_TIME_ENVIRONMENT);
    let permitted = properties
        .get_list(defaults::PERMITTED_RUN_TIME_ENVIRONMENTS)
        .unwrap_or_default();

    let matched = requested.as_deref().and_then(|requested| {
        permitted
            .iter()
            .find(|env| env.eq_ignore_ascii_case(requested))
            .cloned()
    });

    let run_time_env = match matched {
        Some(env) => {
            trace!("Setting run-time environment to '{}'", env);
            Some(env)
        }
        None => {
            let fallback = properties.get_string(defaults::DEFAULT_RUN_TIME_ENVIRONMENT);
            warn!(
                "Invalid run-time environment {:?}, defaulting to {:?}",
                requested.as_deref().unwrap_or(""),
                fallback.as_deref().unwrap_or("")
            );
            fallback
        }
    };

    properties.set(defaults::RUN_TIME_ENVIRONMENT, run_time_env.clone());
    run_time_env
}
