//! Configuration settings for msgwire.
//!
//! A config file names its services in a `[services]` table, mapping each
//! logical service name to the table that holds its `host` and `port`.
//! Files written in INI style load once their string values are quoted
//! (`host = "127.0.0.1"`, not `host = 127.0.0.1`):
//!
//! ```toml
//! [logging]
//! level = "info"
//!
//! [services]
//! echo_service = "echo"
//!
//! [echo]
//! host = "127.0.0.1"
//! port = 9000
//! ```

use serde::Deserialize;
use std::path::Path;
use toml::{Table, Value};
use tracing::warn;

use crate::error::MessagingError;
use crate::services::ServiceInfo;

const KEY_SERVICES: &str = "services";
const KEY_LOGGING: &str = "logging";
const KEY_HOST: &str = "host";
const KEY_PORT: &str = "port";

/// Main configuration structure.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingConfig,
    /// Services with a complete, well-formed section, in file order.
    pub services: Vec<ServiceInfo>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format ("pretty" or "json").
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MessagingError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            MessagingError::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_toml_str(&content).map_err(|e| match e {
            MessagingError::Config { message } => {
                MessagingError::config(format!("{} ({})", message, path.display()))
            }
            other => other,
        })
    }

    /// Parse settings from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, MessagingError> {
        let table: Table = content
            .parse()
            .map_err(|e| MessagingError::config(format!("Failed to parse config: {}", e)))?;

        let logging = match table.get(KEY_LOGGING) {
            Some(value) => value
                .clone()
                .try_into::<LoggingConfig>()
                .map_err(|e| MessagingError::config(format!("Invalid [logging] section: {}", e)))?,
            None => LoggingConfig::default(),
        };

        let settings = Self {
            logging,
            services: read_services(&table),
        };
        settings.validate()?;

        Ok(settings)
    }

    /// Validate the settings.
    fn validate(&self) -> Result<(), MessagingError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(MessagingError::config(format!(
                "Invalid log level '{}'. Valid levels: {:?}",
                self.logging.level, valid_levels
            )));
        }

        let valid_formats = ["pretty", "json"];
        if !valid_formats.contains(&self.logging.format.to_lowercase().as_str()) {
            return Err(MessagingError::config(format!(
                "Invalid log format '{}'. Valid formats: {:?}",
                self.logging.format, valid_formats
            )));
        }

        Ok(())
    }
}

/// Collect every well-formed service. Malformed entries are skipped.
fn read_services(table: &Table) -> Vec<ServiceInfo> {
    let Some(services) = table.get(KEY_SERVICES).and_then(Value::as_table) else {
        warn!("No [services] section in configuration");
        return Vec::new();
    };

    services
        .iter()
        .filter_map(|(service_name, section_name)| {
            match read_service(table, service_name, section_name) {
                Ok(info) => Some(info),
                Err(reason) => {
                    warn!(service = %service_name, reason = %reason, "Skipping service");
                    None
                }
            }
        })
        .collect()
}

fn read_service(
    table: &Table,
    service_name: &str,
    section_name: &Value,
) -> Result<ServiceInfo, String> {
    let section_name = section_name
        .as_str()
        .ok_or_else(|| "section name is not a string".to_string())?;
    let section = table
        .get(section_name)
        .and_then(Value::as_table)
        .ok_or_else(|| format!("section [{}] not found", section_name))?;

    let host = section
        .get(KEY_HOST)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("[{}] has no '{}'", section_name, KEY_HOST))?;
    let port = section
        .get(KEY_PORT)
        .ok_or_else(|| format!("[{}] has no '{}'", section_name, KEY_PORT))?;
    let port = parse_port(port).ok_or_else(|| format!("[{}] has an invalid port", section_name))?;

    Ok(ServiceInfo::new(service_name, host, port))
}

/// Ports may be written as integers or as numeric strings.
fn parse_port(value: &Value) -> Option<u16> {
    match value {
        Value::Integer(n) => u16::try_from(*n).ok(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
