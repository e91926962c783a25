//! Logging backend
//!
//! The bootstrap runs before the application's own logging is configured, so
//! the backend is installed once as the `log` logger and its `env_logger`
//! filter can be replaced later, when the logging property files have been
//! found. `RUST_LOG` always wins over filters coming from configuration.

use std::str::FromStr;
use std::sync::RwLock;

use log::{LevelFilter, Log, Metadata, Record};
use once_cell::sync::{Lazy, OnceCell};

use super::error::{AppConfigError, Result};

struct LoggerState {
    logger: env_logger::Logger,
    filters: String,
}

/// `log::Log` implementation whose inner `env_logger` can be swapped
struct SwappableLogger {
    state: RwLock<Option<LoggerState>>,
}

impl Log for SwappableLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        match self.state.read() {
            Ok(guard) => guard.as_ref().map_or(false, |s| s.logger.enabled(metadata)),
            Err(_) => false,
        }
    }

    fn log(&self, record: &Record<'_>) {
        if let Ok(guard) = self.state.read() {
            if let Some(state) = guard.as_ref() {
                state.logger.log(record);
            }
        }
    }

    fn flush(&self) {
        if let Ok(guard) = self.state.read() {
            if let Some(state) = guard.as_ref() {
                state.logger.flush();
            }
        }
    }
}

static LOGGER: Lazy<SwappableLogger> = Lazy::new(|| SwappableLogger {
    state: RwLock::new(None),
});

static INSTALLED: OnceCell<std::result::Result<(), String>> = OnceCell::new();

/// Normalise a level name.
///
/// Accepts the `log` level names in any case plus `fatal` (mapped to
/// `error`) and `all` (mapped to `trace`).
pub fn parse_level(level: &str) -> Result<LevelFilter> {
    let normalized = match level.trim().to_ascii_lowercase().as_str() {
        "fatal" => "error".to_string(),
        "all" => "trace".to_string(),
        other => other.to_string(),
    };

    LevelFilter::from_str(&normalized).map_err(|_| {
        AppConfigError::InvalidValue(
            "log level".to_string(),
            format!(
                "Invalid log level: {}. Valid values are: off, error, warn, info, debug, trace",
                level
            ),
        )
    })
}

fn install() -> Result<()> {
    INSTALLED
        .get_or_init(|| log::set_logger(&*LOGGER).map_err(|e| e.to_string()))
        .clone()
        .map_err(AppConfigError::Logging)
}

/// Install the backend (once) and replace its filter.
///
/// `filters` uses the `env_logger` directive syntax, e.g.
/// `info,appconfig=trace`.
pub fn configure_logger(filters: &str) -> Result<()> {
    install()?;

    let env = env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, filters);
    let logger = env_logger::Builder::from_env(env).build();
    let max_level = logger.filter();

    let mut guard = LOGGER
        .state
        .write()
        .map_err(|_| AppConfigError::Logging("logger state poisoned".to_string()))?;
    *guard = Some(LoggerState {
        logger,
        filters: filters.to_string(),
    });
    log::set_max_level(max_level);

    Ok(())
}

/// Initialize the logging system with a single level
///
/// Errors are reported on stderr; this is meant for binaries that just want
/// logging up and running.
pub fn init_logger(level: &str) {
    if let Err(e) = configure_logger(level) {
        eprintln!("Failed to initialize logging: {}", e);
    }
}

/// The filter currently applied, if this backend is installed
pub fn current_filters() -> Option<String> {
    LOGGER
        .state
        .read()
        .ok()
        .and_then(|guard| guard.as_ref().map(|s| s.filters.clone()))
}

/// Whether this crate's backend is the installed `log` logger
pub fn is_installed() -> bool {
    matches!(INSTALLED.get(), Some(Ok(())))
}

/// Override the level of one module, keeping the rest of the filter
pub fn override_log_level(module: &str, level: &str) -> Result<()> {
    let level = parse_level(level)?;
    let base = current_filters().unwrap_or_else(|| "error".to_string());
    let directive = format!("{}={}", module, level.to_string().to_ascii_lowercase());

    let filters = if base.is_empty() {
        directive
    } else {
        format!("{},{}", base, directive)
    };
    configure_logger(&filters)
}
