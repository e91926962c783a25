//! Test for settings priority order
//!
//! This test verifies that the settings priority order is correctly applied:
//! Options > System properties > Environment variables > Defaults file

use std::env;

use appconfig::config::defaults;
use appconfig::config::source::system_properties;
use appconfig::config::{Options, PropertyValue, SettingsResolver};
use serial_test::serial;

const ENV_NAME: &str = defaults::RUN_TIME_ENVIRONMENT;
const PREFIX_NAME: &str = defaults::APPLICATION_CONFIGURATION_PREFIX;

fn clear() {
    system_properties::clear();
    env::remove_var(ENV_NAME);
    env::remove_var(PREFIX_NAME);
}

#[test]
#[serial]
fn test_settings_priority() {
    clear();

    // Environment variables use the exact setting name
    env::set_var(ENV_NAME, "production");
    env::set_var(PREFIX_NAME, "env-app");

    // System properties
    system_properties::set(ENV_NAME, "test");

    // Options
    let options = Options::new().with(PREFIX_NAME, "options-app");

    let settings = SettingsResolver::new(options)
        .load_internal_properties()
        .expect("Failed to load settings");

    // Options beat environment
    assert_eq!(settings.get_string(PREFIX_NAME).as_deref(), Some("options-app"));
    // System properties beat environment
    assert_eq!(settings.get_string(ENV_NAME).as_deref(), Some("test"));

    // Without options the environment wins over the defaults file
    let settings = SettingsResolver::new(Options::new())
        .load_internal_properties()
        .expect("Failed to load settings");
    assert_eq!(settings.get_string(PREFIX_NAME).as_deref(), Some("env-app"));

    // Without any override the defaults file is used
    clear();
    let settings = SettingsResolver::new(Options::new())
        .load_internal_properties()
        .expect("Failed to load settings");
    assert_eq!(settings.get_string(ENV_NAME).as_deref(), Some("development"));
    assert_eq!(settings.get_string(PREFIX_NAME).as_deref(), Some("application"));
}

#[test]
#[serial]
fn test_values_are_typed() {
    clear();
    env::set_var(defaults::PERMITTED_RUN_TIME_ENVIRONMENTS, "dev, qa,prod,");
    system_properties::set(defaults::SYSTEM_PROPERTIES_OVERRIDE, "TRUE");
    system_properties::set(defaults::CONTEXT_PATH, "NULL");

    let settings = SettingsResolver::new(Options::new())
        .load_internal_properties()
        .expect("Failed to load settings");

    assert_eq!(
        settings.get(defaults::PERMITTED_RUN_TIME_ENVIRONMENTS),
        Some(&PropertyValue::List(vec![
            "dev".to_string(),
            "qa".to_string(),
            "prod".to_string()
        ]))
    );
    assert_eq!(
        settings.get(defaults::SYSTEM_PROPERTIES_OVERRIDE),
        Some(&PropertyValue::Bool(true))
    );
    assert!(settings.is_null(defaults::CONTEXT_PATH));

    env::remove_var(defaults::PERMITTED_RUN_TIME_ENVIRONMENTS);
    clear();
}

#[test]
#[serial]
fn test_only_known_settings_are_resolved() {
    clear();
    env::set_var("appconfig.notASetting", "value");

    let settings = SettingsResolver::new(Options::new().with("another.unknown", "x"))
        .load_internal_properties()
        .expect("Failed to load settings");

    assert!(!settings.contains("appconfig.notASetting"));
    assert!(!settings.contains("another.unknown"));

    env::remove_var("appconfig.notASetting");
}

#[test]
#[serial]
fn test_defaults_override_from_environment() {
    clear();
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let file = dir.path().join("override.properties");
    std::fs::write(
        &file,
        format!(
            "{}=null\n{}=custom\n{}=properties\n",
            defaults::INTERNAL_DEFAULTS_FILE_NAME_PROPERTY,
            PREFIX_NAME,
            defaults::CONFIGURATION_NAME_SUFFIX
        ),
    )
    .expect("Failed to write override");

    env::set_var(
        defaults::INTERNAL_DEFAULTS_FILE_NAME_PROPERTY,
        file.display().to_string(),
    );

    let settings = SettingsResolver::new(Options::new())
        .load_internal_properties()
        .expect("Failed to load settings");

    assert_eq!(settings.get_string(PREFIX_NAME).as_deref(), Some("custom"));
    // The environment still names the override, so it is reported
    assert_eq!(
        settings.get_string(defaults::INTERNAL_DEFAULTS_FILE_NAME_PROPERTY),
        Some(file.display().to_string())
    );

    env::remove_var(defaults::INTERNAL_DEFAULTS_FILE_NAME_PROPERTY);
}
