//! Default configuration values
//!
//! Single source of truth for the names of the internal settings and for the
//! bundled defaults file they are read from.

/// Name of the bundled defaults file
pub const INTERNAL_DEFAULTS_FILE_NAME: &str = "internal-defaults.properties";

/// Contents of the bundled defaults file
pub const INTERNAL_DEFAULTS: &str = include_str!("resources/internal-defaults.properties");

// Setting names

/// Replaces the bundled defaults file when set
pub const INTERNAL_DEFAULTS_FILE_NAME_PROPERTY: &str = "appconfig.internalDefaultPropertiesFileName";

/// Dotted package holding the application's property files
pub const APPLICATION_PROPERTIES_PACKAGE_NAME: &str = "application.propertiesPackageName";

/// Directory form of the package, derived from the package name
pub const APPLICATION_PROPERTIES_PACKAGE_DIR: &str = "application.propertiesPackageDir";

/// Roots resource names are resolved against
pub const RESOURCE_ROOTS: &str = "appconfig.resourceRoots";

/// Directory searched before the resource roots
pub const EXTERNAL_CONFIGURATION_DIRECTORY: &str = "appconfig.externalConfigurationDirectory";

/// Append the context path to the external directory
pub const USE_CONTEXT_PATH_AS_SUFFIX: &str = "appconfig.useContextPathAsSuffix";

/// Context path appended to the external directory
pub const CONTEXT_PATH: &str = "appconfig.contextPath";

/// Put system properties above every file
pub const SYSTEM_PROPERTIES_OVERRIDE: &str = "appconfig.systemPropertiesOverride";

/// Allowed run-time environments
pub const PERMITTED_RUN_TIME_ENVIRONMENTS: &str = "appconfig.permittedRunTimeEnvironments";

/// Run-time environment used when the requested one is not permitted
pub const DEFAULT_RUN_TIME_ENVIRONMENT: &str = "appconfig.defaultRunTimeEnvironment";

/// Requested run-time environment
pub const RUN_TIME_ENVIRONMENT: &str = "appconfig.runTimeEnvironment";

/// Suffix of configuration files
pub const CONFIGURATION_NAME_SUFFIX: &str = "appconfig.configurationNameSuffix";

/// Name used in place of the environment for fallback files
pub const DEFAULT_CONFIGURATION_NAME: &str = "appconfig.defaultConfigurationName";

/// Prefix of application configuration files
pub const APPLICATION_CONFIGURATION_PREFIX: &str = "appconfig.applicationConfigurationPrefix";

/// Prefix of database configuration files
pub const DATABASE_CONFIGURATION_PREFIX: &str = "appconfig.database.configurationPrefix";

/// Load `{database}-{defaultName}` files
pub const DATABASE_DEFAULT_CONFIGURATION_ENABLED: &str = "appconfig.database.defaultConfigurationEnabled";

/// Configure logging from the logging property files
pub const LOGGING_ENABLED: &str = "appconfig.logging.enabled";

/// Prefix of logging configuration files
pub const LOGGING_CONFIGURATION_PREFIX: &str = "appconfig.logging.configurationPrefix";

/// Suffix of logging configuration files
pub const LOGGING_CONFIGURATION_NAME_SUFFIX: &str = "appconfig.logging.configurationNameSuffix";

/// Load `{logging}-{defaultName}` files
pub const LOGGING_DEFAULT_CONFIGURATION_ENABLED: &str = "appconfig.logging.defaultConfigurationEnabled";

/// Level used when no logging file is found
pub const LOGGING_LOG_LEVEL: &str = "appconfig.logging.logLevel";

/// Loggers forced down to `error`
pub const LOGGING_QUIET_LOGGERS: &str = "appconfig.logging.quietLoggers";

/// Level used before any file has been read
pub const BOOTSTRAP_LOGGING_LOG_LEVEL: &str = "appconfig.bootstrapLogging.logLevel";

// Keys inside logging configuration files

/// Default level in a logging file
pub const LOGGING_FILE_LEVEL: &str = "logging.level";

/// Extra `env_logger` directives in a logging file
pub const LOGGING_FILE_FILTERS: &str = "logging.filters";

// Fallback values

/// Bootstrap level when nothing overrides it
pub const BOOTSTRAP_LOG_LEVEL_STR: &str = "error";

/// Logging level when no logging file is found and nothing overrides it
pub const LOG_LEVEL_STR: &str = "info";

/// Resource root when none is configured
pub const RESOURCE_ROOT_STR: &str = ".";
