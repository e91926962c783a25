//! Configuration tests
//!
//! This module runs the whole bootstrap against fixture directories.

use std::fs;
use std::path::Path;

use appconfig::config::defaults;
use appconfig::config::source::system_properties;
use appconfig::config::{self, ConfigChangeEvent};
use appconfig::{AppConfig, AppConfigError};
use serde::Deserialize;
use serial_test::serial;
use tempfile::TempDir;

/// Fixture: a resource root with a `com/example` package and an external directory
struct Fixture {
    root: TempDir,
    external: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let fixture = Self {
            root: tempfile::tempdir().expect("Failed to create resource root"),
            external: tempfile::tempdir().expect("Failed to create external dir"),
        };
        fs::create_dir_all(fixture.package()).expect("Failed to create package dir");
        fixture
    }

    fn package(&self) -> std::path::PathBuf {
        self.root.path().join("com/example")
    }

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).expect("Failed to write fixture");
    }

    fn app(&self, environment: &str) -> AppConfig {
        let mut app = AppConfig::new();
        app.set_application_properties_package_name("com.example")
            .set_run_time_environment(environment)
            .options_mut()
            .set_resource_roots(&[self.root.path().display().to_string()]);
        app
    }
}

#[test]
#[serial]
fn test_only_internal_defaults_fails() {
    system_properties::clear();
    let fixture = Fixture::new();

    // No application defaults file anywhere
    let result = fixture.app("test").configure();
    match result {
        Err(AppConfigError::FileNotFound(path)) => {
            assert_eq!(path, Path::new("com/example/application-defaults.properties"))
        }
        other => panic!("expected a missing defaults file, got {:?}", other),
    }
}

#[test]
#[serial]
fn test_environment_file_overrides_defaults() {
    system_properties::clear();
    let fixture = Fixture::new();
    Fixture::write(
        &fixture.package(),
        "application-defaults.properties",
        "app.name=demo\napp.mode=defaults\napp.features=a,b\n",
    );
    Fixture::write(&fixture.package(), "application-production.properties", "app.mode=production\n");
    Fixture::write(&fixture.package(), "application-test.properties", "app.mode=test\n");

    let configuration = fixture.app("Production").configure().expect("Failed to configure");

    assert_eq!(configuration.get_string("app.name").as_deref(), Some("demo"));
    assert_eq!(configuration.get_string("app.mode").as_deref(), Some("production"));
    assert_eq!(
        configuration.get_list("app.features"),
        Some(vec!["a".to_string(), "b".to_string()])
    );
}

#[test]
#[serial]
fn test_external_directory_overrides_package() {
    system_properties::clear();
    let fixture = Fixture::new();
    Fixture::write(&fixture.package(), "application-defaults.properties", "app.mode=defaults\napp.name=demo\n");
    Fixture::write(&fixture.package(), "application-test.properties", "app.mode=package\n");
    Fixture::write(fixture.external.path(), "application-test.properties", "app.mode=external\n");

    let mut app = fixture.app("test");
    app.set_external_configuration_directory(&fixture.external.path().display().to_string());
    let configuration = app.configure().expect("Failed to configure");

    assert_eq!(configuration.get_string("app.mode").as_deref(), Some("external"));
    assert_eq!(configuration.get_string("app.name").as_deref(), Some("demo"));
    assert_eq!(
        configuration.source_of("app.mode"),
        Some(
            fixture
                .external
                .path()
                .join("application-test.properties")
                .display()
                .to_string()
                .as_str()
        )
    );
}

#[test]
#[serial]
fn test_unknown_environment_falls_back_to_default() {
    system_properties::clear();
    let fixture = Fixture::new();
    Fixture::write(&fixture.package(), "application-defaults.properties", "app.mode=defaults\n");
    Fixture::write(&fixture.package(), "application-development.properties", "app.mode=development\n");

    let mut app = fixture.app("staging");
    let configuration = app.configure().expect("Failed to configure");

    assert_eq!(configuration.get_string("app.mode").as_deref(), Some("development"));
    assert_eq!(
        app.internal_properties()
            .and_then(|settings| settings.get_string(defaults::RUN_TIME_ENVIRONMENT))
            .as_deref(),
        Some("development")
    );
}

#[derive(Debug, Deserialize, PartialEq)]
struct DatabaseSettings {
    url: String,
    port: u16,
}

#[derive(Debug, Deserialize)]
struct Settings {
    database: DatabaseSettings,
}

#[test]
#[serial]
fn test_database_files() {
    system_properties::clear();
    let fixture = Fixture::new();
    Fixture::write(&fixture.package(), "application-defaults.properties", "app.name=demo\n");
    Fixture::write(
        &fixture.package(),
        "database-defaults.properties",
        "database.url=postgres://localhost/app\ndatabase.port=5432\n",
    );
    Fixture::write(&fixture.package(), "database-test.properties", "database.port=6543\n");

    let configuration = fixture.app("test").configure().expect("Failed to configure");
    let settings: Settings = configuration.try_deserialize().expect("Failed to deserialize");
    assert_eq!(
        settings.database,
        DatabaseSettings {
            url: "postgres://localhost/app".to_string(),
            port: 6543,
        }
    );

    // Disabling the database defaults drops that file
    let mut app = fixture.app("test");
    app.set_option(defaults::DATABASE_DEFAULT_CONFIGURATION_ENABLED, "false");
    let configuration = app.configure().expect("Failed to configure");
    assert!(!configuration.contains_key("database.url"));
    assert_eq!(configuration.get_parsed::<u16>("database.port").unwrap(), Some(6543));
}

#[test]
#[serial]
fn test_system_properties_override_files() {
    system_properties::clear();
    let fixture = Fixture::new();
    Fixture::write(&fixture.package(), "application-defaults.properties", "app.name=demo\n");
    system_properties::set("app.name", "from-system");

    let configuration = fixture.app("test").configure().expect("Failed to configure");
    assert_eq!(configuration.get_string("app.name").as_deref(), Some("demo"));

    system_properties::set(defaults::SYSTEM_PROPERTIES_OVERRIDE, "true");
    let configuration = fixture.app("test").configure().expect("Failed to configure");
    assert_eq!(configuration.get_string("app.name").as_deref(), Some("from-system"));

    system_properties::clear();
}

#[test]
#[serial]
fn test_context_path_suffix() {
    system_properties::clear();
    let fixture = Fixture::new();
    Fixture::write(&fixture.package(), "application-defaults.properties", "app.mode=defaults\n");
    let shop = fixture.external.path().join("shop");
    fs::create_dir_all(&shop).expect("Failed to create context dir");
    Fixture::write(&shop, "application-test.properties", "app.mode=shop\n");

    let mut app = fixture.app("test");
    app.set_external_configuration_directory(&fixture.external.path().display().to_string())
        .set_option(defaults::USE_CONTEXT_PATH_AS_SUFFIX, true)
        .set_option(defaults::CONTEXT_PATH, "/shop");
    let configuration = app.configure().expect("Failed to configure");

    assert_eq!(configuration.get_string("app.mode").as_deref(), Some("shop"));
}

#[test]
#[serial]
fn test_logging_configured_from_files() {
    system_properties::clear();
    let fixture = Fixture::new();
    Fixture::write(&fixture.package(), "application-defaults.properties", "app.name=demo\n");
    Fixture::write(
        &fixture.package(),
        "logging-test.properties",
        "logging.level=debug\nlogging.filters=hyper=warn\n",
    );

    let mut app = fixture.app("test");
    app.set_option(defaults::LOGGING_QUIET_LOGGERS, "noisy");
    app.configure().expect("Failed to configure");

    let setup = app.logging_setup().expect("Logging should be configured");
    assert_eq!(setup.filters, "debug,hyper=warn,noisy=error");
    assert_eq!(
        setup.source.as_deref(),
        Some(fixture.package().join("logging-test.properties").as_path())
    );
}

#[test]
#[serial]
fn test_configure_global() {
    system_properties::clear();
    let fixture = Fixture::new();
    Fixture::write(&fixture.package(), "application-defaults.properties", "app.name=global\n");

    let events = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
    let recorded = std::sync::Arc::clone(&events);
    config::add_listener(move |event| recorded.lock().unwrap().push(event)).unwrap();

    let configuration = fixture.app("test").configure_global().expect("Failed to configure");
    assert_eq!(configuration.get_string("app.name").as_deref(), Some("global"));
    assert!(config::is_initialized());
    assert_eq!(
        config::get().unwrap().get_string("app.name").as_deref(),
        Some("global")
    );
    assert_eq!(events.lock().unwrap().last(), Some(&ConfigChangeEvent::Initialized));
}
