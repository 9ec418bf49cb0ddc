//! Configuration loader
//!
//! Handles loading configuration from various sources including
//! TOML files, environment variables, and default values.

use crate::config::AppConfig;
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME,
};
use crate::error_ext::ErrorContext;
use crate::logging::{log_config_loaded, parse_log_level};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use relay_domain::constants::MAX_TIMEOUT_SECS;
use relay_domain::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader service
#[derive(Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Configuration sources are merged in this order (later sources override earlier):
    /// 1. Default values from `AppConfig::default()`
    /// 2. TOML configuration file (if exists)
    /// 3. Environment variables with prefix (e.g., `RELAY_HEALTH__FAILURE_THRESHOLD`)
    ///
    /// An explicitly configured path that does not exist is an error.
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(config_path) = &self.config_path {
            if !config_path.exists() {
                log_config_loaded(config_path, false);
                return Err(Error::configuration(format!(
                    "Configuration file not found: {}",
                    config_path.display()
                )));
            }
            figment = figment.merge(Toml::file(config_path));
            log_config_loaded(config_path, true);
        } else if let Some(default_path) = Self::find_default_config_path() {
            figment = figment.merge(Toml::file(&default_path));
            log_config_loaded(&default_path, true);
        }

        // Double underscore separates nesting levels so single underscores stay in key names
        figment = figment.merge(
            Env::prefixed(&format!("{}_", self.env_prefix)).split(CONFIG_ENV_SEPARATOR),
        );

        let app_config: AppConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&app_config)?;

        Ok(app_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).io_context("Failed to write config file")?;

        Ok(())
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Find the first existing default configuration file
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let mut candidates = vec![
            current_dir.join(DEFAULT_CONFIG_FILENAME),
            current_dir
                .join(DEFAULT_CONFIG_DIR)
                .join(DEFAULT_CONFIG_FILENAME),
        ];
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME));
        }
        if let Some(home) = dirs::home_dir() {
            candidates.push(
                home.join(format!(".{DEFAULT_CONFIG_DIR}"))
                    .join(DEFAULT_CONFIG_FILENAME),
            );
        }

        candidates.into_iter().find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate scalar settings
///
/// Provider blocks are validated separately by
/// [`validate_providers`](crate::config::validate_providers), which needs
/// credential resolution.
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    validate_logging_config(config)?;
    validate_health_config(config)?;
    validate_routing_config(config)?;
    Ok(())
}

fn validate_logging_config(config: &AppConfig) -> Result<()> {
    parse_log_level(&config.logging.level)?;
    Ok(())
}

fn validate_health_config(config: &AppConfig) -> Result<()> {
    if config.health.failure_threshold == 0 {
        return Err(Error::configuration("Health failure_threshold must be at least 1"));
    }
    check_upper_bound("Health probe_interval_secs", config.health.probe_interval_secs)?;
    check_upper_bound("Health probe_timeout_secs", config.health.probe_timeout_secs)?;
    if config.health.probe_enabled {
        if config.health.probe_interval_secs == 0 {
            return Err(Error::configuration(
                "Health probe_interval_secs cannot be 0 when probing is enabled",
            ));
        }
        if config.health.probe_timeout_secs == 0 {
            return Err(Error::configuration(
                "Health probe_timeout_secs cannot be 0 when probing is enabled",
            ));
        }
    }
    Ok(())
}

fn validate_routing_config(config: &AppConfig) -> Result<()> {
    if config.routing.default_deadline_secs == 0 {
        return Err(Error::configuration("Routing default_deadline_secs cannot be 0"));
    }
    check_upper_bound("Routing default_deadline_secs", config.routing.default_deadline_secs)?;
    if config.routing.event_channel_capacity == 0 {
        return Err(Error::configuration("Routing event_channel_capacity cannot be 0"));
    }
    Ok(())
}

fn check_upper_bound(setting: &str, secs: u64) -> Result<()> {
    if secs > MAX_TIMEOUT_SECS {
        return Err(Error::configuration(format!(
            "{setting} cannot exceed {MAX_TIMEOUT_SECS}"
        )));
    }
    Ok(())
}
