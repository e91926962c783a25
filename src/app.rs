//! Application configuration bootstrap
//!
//! `AppConfig` runs the whole pipeline: bootstrap logging, resolve the
//! internal settings, validate them, pick the run-time environment,
//! configure logging from the logging files and load the application and
//! database files into one `Configuration`.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::common::{AppConfigError, Result};
use crate::config::builder::ConfigurationBuilder;
use crate::config::configuration::Configuration;
use crate::config::defaults;
use crate::config::extended::ExtendedProperties;
use crate::config::logging::{self, LoggingSetup};
use crate::config::manager;
use crate::config::naming::{generate_configuration_names, ConfigurationKind};
use crate::config::options::Options;
use crate::config::resolver::{check_run_time_environment, resource_roots, SettingsResolver};
use crate::config::source::system_properties;
use crate::config::validator::validate_settings;
use crate::config::value::PropertyValue;

/// Configuration bootstrap
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    options: Options,
    settings: Option<ExtendedProperties>,
    logging: Option<LoggingSetup>,
}

impl AppConfig {
    /// Create a bootstrap without options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bootstrap with options
    pub fn with_options(options: Options) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// The options
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Mutable access to the options
    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    /// Set one option
    pub fn set_option(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> &mut Self {
        self.options.set(name, value);
        self
    }

    /// Package holding the application's property files, e.g. `com.example`
    pub fn set_application_properties_package_name(&mut self, package: &str) -> &mut Self {
        self.options.set_application_properties_package_name(package);
        self
    }

    /// Directory searched before the package directory
    pub fn set_external_configuration_directory(&mut self, dir: &str) -> &mut Self {
        self.options.set_external_configuration_directory(dir);
        self
    }

    /// Run-time environment, e.g. `production`
    pub fn set_run_time_environment(&mut self, env: &str) -> &mut Self {
        self.options.set_run_time_environment(env);
        self
    }

    /// Run the bootstrap against the system property registry and the
    /// process environment
    pub fn configure(&mut self) -> Result<Configuration> {
        let resolver = SettingsResolver::new(self.options.clone());
        self.configure_with(&resolver)
    }

    /// Run the bootstrap against the sources of `resolver`
    pub fn configure_with(&mut self, resolver: &SettingsResolver) -> Result<Configuration> {
        tolerate_foreign_logger(logging::bootstrap(resolver))?;
        debug!("Bootstrap logging level {}", logging::bootstrap_level(resolver));

        let settings = load_settings(resolver)?;
        let roots = resource_roots(&settings);

        let logging_candidates = generate_configuration_names(&settings, ConfigurationKind::Logging);
        self.logging = tolerate_foreign_logger(logging::configure_from_settings(
            &settings,
            &logging_candidates,
            &roots,
        ))?
        .flatten();

        let configuration = ConfigurationBuilder::new(settings.clone())
            .with_system_properties(resolver.system_properties().to_properties())
            .build()?;

        info!(
            "Configuration loaded for run-time environment {}",
            settings
                .get_string(defaults::RUN_TIME_ENVIRONMENT)
                .unwrap_or_default()
        );
        self.settings = Some(settings);
        Ok(configuration)
    }

    /// Run the bootstrap and store the result as the global configuration
    pub fn configure_global(&mut self) -> Result<Arc<Configuration>> {
        let configuration = self.configure()?;
        manager::initialize(configuration)?;
        manager::get()
    }

    /// Internal settings used by the last successful `configure`
    pub fn internal_properties(&self) -> Option<&ExtendedProperties> {
        self.settings.as_ref()
    }

    /// Logging set up by the last successful `configure`
    pub fn logging_setup(&self) -> Option<&LoggingSetup> {
        self.logging.as_ref()
    }
}

/// Resolve, validate and check the internal settings
pub fn load_settings(resolver: &SettingsResolver) -> Result<ExtendedProperties> {
    let mut settings = resolver.load_internal_properties()?;
    validate_settings(&settings)?;
    check_run_time_environment(&mut settings);
    Ok(settings)
}

/// A system property, else an environment variable of the same name
pub fn system_or_environment_value(name: &str) -> Option<String> {
    system_properties::get(name).or_else(|| std::env::var(name).ok())
}

/// Another `log` backend may already be installed by the host program; that
/// is not a reason to fail the bootstrap
fn tolerate_foreign_logger<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(AppConfigError::Logging(message)) => {
            warn!("Logging backend not installed: {}", message);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::source::{EnvSource, SystemPropertiesSource};
    use serial_test::serial;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::tempdir;

    fn isolated(options: Options) -> SettingsResolver {
        SettingsResolver::with_sources(
            options,
            SystemPropertiesSource::from_map(BTreeMap::new()),
            EnvSource::from_vars(Vec::<(String, String)>::new()),
        )
    }

    #[test]
    #[serial]
    fn test_configure_with_package() {
        let root = tempdir().unwrap();
        let package = root.path().join("com/example");
        fs::create_dir_all(&package).unwrap();
        fs::write(package.join("application-defaults.properties"), "app.name=demo\napp.mode=default\n").unwrap();
        fs::write(package.join("application-test.properties"), "app.mode=test\n").unwrap();

        let mut app = AppConfig::new();
        app.set_application_properties_package_name("com.example")
            .set_run_time_environment("TEST")
            .options_mut()
            .set_resource_roots(&[root.path().display().to_string()]);
        let resolver = isolated(app.options().clone());
        let configuration = app.configure_with(&resolver).unwrap();

        assert_eq!(configuration.get_string("app.name").as_deref(), Some("demo"));
        assert_eq!(configuration.get_string("app.mode").as_deref(), Some("test"));

        let settings = app.internal_properties().unwrap();
        assert_eq!(settings.get_string(defaults::RUN_TIME_ENVIRONMENT).as_deref(), Some("test"));
        assert_eq!(
            settings.get_string(defaults::APPLICATION_PROPERTIES_PACKAGE_DIR).as_deref(),
            Some("com/example")
        );
    }

    #[test]
    #[serial]
    fn test_configure_fails_without_defaults_file() {
        let root = tempdir().unwrap();
        let mut app = AppConfig::new();
        app.options_mut()
            .set_resource_roots(&[root.path().display().to_string()]);
        let resolver = isolated(app.options().clone());

        assert!(matches!(
            app.configure_with(&resolver),
            Err(AppConfigError::FileNotFound(_))
        ));
        assert!(app.internal_properties().is_none());
    }

    #[test]
    #[serial]
    fn test_invalid_bootstrap_level_fails() {
        let mut app = AppConfig::new();
        app.set_option(defaults::BOOTSTRAP_LOGGING_LOG_LEVEL, "loud");
        let resolver = isolated(app.options().clone());
        assert!(matches!(
            app.configure_with(&resolver),
            Err(AppConfigError::InvalidValue(_, _))
        ));
    }

    #[test]
    #[serial]
    fn test_system_or_environment_value() {
        system_properties::clear();
        std::env::set_var("appconfig.test.lookup", "from-env");
        assert_eq!(system_or_environment_value("appconfig.test.lookup").as_deref(), Some("from-env"));

        system_properties::set("appconfig.test.lookup", "from-sys");
        assert_eq!(system_or_environment_value("appconfig.test.lookup").as_deref(), Some("from-sys"));

        system_properties::clear();
        std::env::remove_var("appconfig.test.lookup");
        assert_eq!(system_or_environment_value("appconfig.test.lookup"), None);
    }
}
