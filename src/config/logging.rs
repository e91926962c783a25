//! Logging bootstrap
//!
//! Logging is brought up twice: once with a bootstrap level before any
//! settings are known, and again once the logging property files have been
//! located.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::common::log::{configure_logger, parse_level};
use crate::common::Result;
use crate::config::defaults;
use crate::config::extended::ExtendedProperties;
use crate::config::naming::CandidateFile;
use crate::config::resolver::SettingsResolver;

/// Outcome of configuring logging from files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSetup {
    /// `env_logger` filter in effect
    pub filters: String,
    /// Logging file the filter came from
    pub source: Option<PathBuf>,
}

/// Level used before the settings are loaded
///
/// Only options, system properties and the environment are consulted.
pub fn bootstrap_level(resolver: &SettingsResolver) -> String {
    resolver
        .setting_from_options_env_system(defaults::BOOTSTRAP_LOGGING_LOG_LEVEL)
        .and_then(|value| value.as_string())
        .filter(|level| !level.trim().is_empty())
        .unwrap_or_else(|| defaults::BOOTSTRAP_LOG_LEVEL_STR.to_string())
}

/// Install the backend with the bootstrap level
pub fn bootstrap(resolver: &SettingsResolver) -> Result<()> {
    let level = parse_level(&bootstrap_level(resolver))?;
    configure_logger(&level.to_string().to_ascii_lowercase())
}

/// Build an `env_logger` filter.
///
/// The level comes from `logging.level` in the logging file, or
/// `default_level` without one. `logging.filters` directives follow, then a
/// `name=error` directive for every quiet logger.
pub fn build_filters(
    logging_file: Option<&ExtendedProperties>,
    default_level: &str,
    quiet_loggers: &[String],
) -> Result<String> {
    let level = logging_file
        .and_then(|props| props.get_non_empty(defaults::LOGGING_FILE_LEVEL))
        .unwrap_or_else(|| default_level.to_string());
    let level = parse_level(&level)?;

    let mut directives = vec![level.to_string().to_ascii_lowercase()];
    if let Some(filters) = logging_file.and_then(|props| props.get_list(defaults::LOGGING_FILE_FILTERS)) {
        directives.extend(filters.into_iter().filter(|f| !f.is_empty()));
    }
    directives.extend(
        quiet_loggers
            .iter()
            .filter(|name| !name.is_empty())
            .map(|name| format!("{}=error", name)),
    );

    Ok(directives.join(","))
}

/// Configure logging from the first existing logging file
pub fn configure_from_files<P: AsRef<Path>>(
    candidates: &[CandidateFile],
    resource_roots: &[P],
    default_level: &str,
    quiet_loggers: &[String],
) -> Result<LoggingSetup> {
    let found = candidates
        .iter()
        .find_map(|candidate| candidate.locate(resource_roots));

    let logging_file = match found {
        Some(ref path) => {
            debug!("Loading logging configuration from {}", path.display());
            Some(ExtendedProperties::load_file(path)?)
        }
        None => {
            debug!("No logging configuration found, using level {}", default_level);
            None
        }
    };

    let filters = build_filters(logging_file.as_ref(), default_level, quiet_loggers)?;
    configure_logger(&filters)?;
    info!("Logging configured with filter {}", filters);

    Ok(LoggingSetup {
        filters,
        source: found,
    })
}

/// Configure logging from the internal settings.
///
/// Returns `None` when logging from files is disabled.
pub fn configure_from_settings<P: AsRef<Path>>(
    settings: &ExtendedProperties,
    candidates: &[CandidateFile],
    resource_roots: &[P],
) -> Result<Option<LoggingSetup>> {
    if !settings.get_bool(defaults::LOGGING_ENABLED) {
        debug!("Logging configuration from files disabled");
        return Ok(None);
    }

    let default_level = settings
        .get_non_empty(defaults::LOGGING_LOG_LEVEL)
        .filter(|level| {
            let valid = parse_level(level).is_ok();
            if !valid {
                warn!("Invalid log level: {}. Using default: {}", level, defaults::LOG_LEVEL_STR);
            }
            valid
        })
        .unwrap_or_else(|| defaults::LOG_LEVEL_STR.to_string());
    let quiet_loggers = settings
        .get_list(defaults::LOGGING_QUIET_LOGGERS)
        .unwrap_or_default();

    configure_from_files(candidates, resource_roots, &default_level, &quiet_loggers).map(Some)
}
