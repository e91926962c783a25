//! Configuration manager
//!
//! This module holds the process-wide configuration produced by the
//! bootstrap, for programs that prefer a global to passing it around.

use std::sync::{Arc, RwLock};

use log::info;
use once_cell::sync::Lazy;

use crate::common::{AppConfigError, Result};
use crate::config::configuration::Configuration;

/// Configuration change event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigChangeEvent {
    /// Configuration was set for the first time
    Initialized,
    /// Configuration was replaced
    Updated,
}

/// Configuration change listener type
pub type ConfigChangeListener = Box<dyn Fn(ConfigChangeEvent) + Send + Sync>;

/// Global configuration manager
pub struct ConfigManager {
    /// Current configuration
    config: RwLock<Option<Arc<Configuration>>>,

    /// Configuration change listeners
    listeners: RwLock<Vec<ConfigChangeListener>>,
}

impl ConfigManager {
    /// Create a new, empty configuration manager
    fn new() -> Self {
        Self {
            config: RwLock::new(None),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Get the current configuration
    fn get_config(&self) -> Result<Arc<Configuration>> {
        let config = self.config.read().map_err(|_| poisoned())?;
        config
            .as_ref()
            .map(Arc::clone)
            .ok_or_else(|| AppConfigError::Config("Configuration has not been initialized".to_string()))
    }

    /// Replace the configuration
    fn set_config(&self, config: Configuration) -> Result<()> {
        let event = {
            let mut current = self.config.write().map_err(|_| poisoned())?;
            let event = if current.is_some() {
                ConfigChangeEvent::Updated
            } else {
                ConfigChangeEvent::Initialized
            };
            *current = Some(Arc::new(config));
            event
        };

        // Notify listeners
        self.notify_listeners(event);

        Ok(())
    }

    /// Whether a configuration is present
    fn is_initialized(&self) -> bool {
        self.config.read().map(|config| config.is_some()).unwrap_or(false)
    }

    /// Drop the configuration
    fn reset(&self) -> Result<()> {
        let mut current = self.config.write().map_err(|_| poisoned())?;
        *current = None;
        Ok(())
    }

    /// Add a configuration change listener
    fn add_listener<F>(&self, listener: F) -> Result<()>
    where
        F: Fn(ConfigChangeEvent) + Send + Sync + 'static,
    {
        let mut listeners = self.listeners.write().map_err(|_| poisoned())?;
        listeners.push(Box::new(listener));
        Ok(())
    }

    /// Notify all listeners of a configuration change
    fn notify_listeners(&self, event: ConfigChangeEvent) {
        if let Ok(listeners) = self.listeners.read() {
            for listener in listeners.iter() {
                listener(event);
            }
        }
    }
}

fn poisoned() -> AppConfigError {
    AppConfigError::Config("Configuration lock poisoned".to_string())
}

// Global instance
static CONFIG_MANAGER: Lazy<ConfigManager> = Lazy::new(ConfigManager::new);

/// Initialize the global configuration
///
/// This function stores the configuration built at start-up. Calling it
/// again replaces the configuration.
pub fn initialize(config: Configuration) -> Result<()> {
    info!("Initializing global configuration with {} keys", config.keys().len());
    for layer in config.layer_names() {
        info!("  layer: {}", layer);
    }

    CONFIG_MANAGER.set_config(config)
}

/// Get the current global configuration
pub fn get() -> Result<Arc<Configuration>> {
    CONFIG_MANAGER.get_config()
}

/// Whether the global configuration has been initialized
pub fn is_initialized() -> bool {
    CONFIG_MANAGER.is_initialized()
}

/// Update the global configuration
pub fn update(config: Configuration) -> Result<()> {
    if !is_initialized() {
        return Err(AppConfigError::Config(
            "Configuration has not been initialized".to_string(),
        ));
    }
    CONFIG_MANAGER.set_config(config)
}

/// Add a configuration change listener
///
/// This function adds a listener that will be called when the configuration changes.
pub fn add_listener<F>(listener: F) -> Result<()>
where
    F: Fn(ConfigChangeEvent) + Send + Sync + 'static,
{
    CONFIG_MANAGER.add_listener(listener)
}

/// Drop the global configuration
pub fn reset() -> Result<()> {
    CONFIG_MANAGER.reset()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::extended::ExtendedProperties;
    use serial_test::serial;
    use std::sync::Mutex;

    fn configuration(value: &str) -> Configuration {
        let mut config = Configuration::new();
        config.add_layer("test", ExtendedProperties::from_pairs(vec![("key", value)]));
        config
    }

    #[test]
    #[serial]
    fn test_initialize_get_update() {
        reset().unwrap();
        assert!(!is_initialized());
        assert!(get().is_err());
        assert!(update(configuration("x")).is_err());

        let events = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&events);
        add_listener(move |event| recorded.lock().unwrap().push(event)).unwrap();

        initialize(configuration("first")).unwrap();
        assert!(is_initialized());
        assert_eq!(get().unwrap().get_string("key").as_deref(), Some("first"));

        update(configuration("second")).unwrap();
        assert_eq!(get().unwrap().get_string("key").as_deref(), Some("second"));

        let events = events.lock().unwrap();
        assert!(events.ends_with(&[ConfigChangeEvent::Initialized, ConfigChangeEvent::Updated]));
        reset().unwrap();
    }
}
