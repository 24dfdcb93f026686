//! Configuration management for the message validator
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (validator.toml)
//! - Environment variables (VALIDATOR__*)
//!
//! ## Example config file (validator.toml):
//! ```toml
//! [validation]
//! mode = "collect-all"
//! uuid_version = 4
//!
//! [report]
//! colors = false
//!
//! [logging]
//! filter = "message_schemas=debug"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::evaluate::{EvaluationMode, Evaluator};

/// Main configuration for the validator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Validation settings
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Report settings
    #[serde(default)]
    pub report: ReportConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Stop at the first failure or collect them all
    #[serde(default)]
    pub mode: EvaluationMode,

    /// UUID version used by `uuid` predicates
    #[serde(default = "default_uuid_version")]
    pub uuid_version: u8,
}

/// Report configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Use ANSI colors in the report
    #[serde(default = "default_true")]
    pub colors: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when RUST_LOG is unset
    #[serde(default = "default_filter")]
    pub filter: String,
}

// Default value functions
fn default_uuid_version() -> u8 {
    4
}

fn default_true() -> bool {
    true
}

fn default_filter() -> String {
    "warn".to_string()
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            mode: EvaluationMode::default(),
            uuid_version: default_uuid_version(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            colors: default_true(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl ValidatorConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, adding a specific file on top of the default locations
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = ["validator.toml", ".validator.toml", "config/validator.toml"];
        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("com", "redhat", "message-validator") {
            let xdg_config = config_dir.config_dir().join("validator.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // VALIDATOR__VALIDATION__MODE=collect-all and so on
        builder = builder.add_source(
            Environment::with_prefix("VALIDATOR")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let loaded: Self = config.try_deserialize()?;
        loaded.check()?;
        Ok(loaded)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Evaluator configured by the `[validation]` section
    pub fn evaluator(&self) -> Evaluator {
        Evaluator::new(self.validation.mode)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if !(1..=8).contains(&self.validation.uuid_version) {
            return Err(ConfigError::Message(format!(
                "validation.uuid_version must be between 1 and 8, got {}",
                self.validation.uuid_version
            )));
        }
        Ok(())
    }
}
