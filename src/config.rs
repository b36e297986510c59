//! # Configuration Management

//! This module handles the configuration loading and management for the garage doorman service.
//! It leverages the `config` crate to provide a flexible and structured way to define and access configuration settings from various sources, including:

//! * YAML configuration files (default.yaml, development.yaml, production.yaml)
//! * Environment variables

//! The core of this module is the `Settings` struct, which encapsulates all the configuration settings required by the application.

use serde::Deserialize;
use config::{Config, Environment, File};
use std::env;
use std::path::PathBuf;
use secrecy::{Secret, ExposeSecret};
use tracing::debug;
use url::Url;
use crate::errors::GarageError;

/// Represents the complete set of configuration settings for the garage doorman.
/// It's populated by reading from various configuration sources and provides convenient access to the settings throughout the application.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// General service settings (hostname reported in monitoring records, listen port)
    pub general: GeneralSettings,
    /// The set of physical doors and their pin assignments
    pub doors: Vec<DoorSettings>,
    /// Settings for the relay/sensor hardware interface
    pub gpio: GpioSettings,
    /// Settings for application logging
    pub logging: LoggingSettings,
    /// Settings for connecting to the RabbitMQ message broker (outbound replies)
    pub rabbitmq: Option<RabbitMQSettings>,
}

/// Holds the general service settings
#[derive(Debug, Deserialize, Clone)]
pub struct GeneralSettings {
    /// The host identifier reported in monitoring records
    pub hostname: String,
    /// The port the HTTP server listens on
    pub port: u16,
}

/// Represents the configuration for a single garage door
#[derive(Debug, Deserialize, Clone)]
pub struct DoorSettings {
    /// The name or identifier of the door (e.g. "LEFT")
    pub name: String,
    /// The BCM pin number driving the door's relay
    pub relay_pin: u8,
    /// The BCM pin number of the door's position sensor
    pub sensor_pin: u8,
}

/// Holds the configuration settings related to the GPIO hardware interface
#[derive(Debug, Deserialize, Clone)]
pub struct GpioSettings {
    /// How long (in milliseconds) the relay stays energized per trigger pulse
    pub pulse_width_ms: u64,
}

/// Holds the configuration settings for application logging
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    /// The logging level (e.g., "info", "debug", "error")
    pub level: String,
    /// The directory path where log files will be stored (optional)
    pub path: Option<PathBuf>,
}

/// Holds the configuration settings required to establish a connection to the RabbitMQ message broker.
#[derive(Debug, Deserialize, Clone)]
pub struct RabbitMQSettings {
    /// The hostname or IP address of the RabbitMQ server
    pub host: String,
    /// The port number on which the RabbitMQ server is listening
    pub port: u16,
    /// The username for RabbitMQ authentication
    pub username: String,
    /// The password for RabbitMQ authentication
    #[serde(deserialize_with = "deserialize_optional_secret")]
    pub password: Option<Secret<String>>,
    /// The virtual host to connect to on the RabbitMQ server
    pub vhost: String,
    /// The queue that webhook replies are published to
    pub queue: String,
}

impl RabbitMQSettings {
    /// Constructs a connection string for RabbitMQ based on the settings.
    ///
    /// # Returns
    ///
    /// A `Secret<String>` containing the constructed connection string. The connection string is kept secret for security reasons.
    pub fn connection_string(&self) -> Secret<String> {
        let mut url = Url::parse(&format!("amqp://{}:{}", self.host, self.port))
            .expect("Failed to parse RabbitMQ URL");

        url.set_username(&self.username)
            .expect("Failed to set RabbitMQ username");
        if let Some(password) = &self.password {
            url.set_password(Some(password.expose_secret()))
                .expect("Failed to set RabbitMQ password");
        }
        url.set_path(&self.vhost);

        Secret::new(url.to_string())
    }
}

/// # Settings Initialization
///
/// The `Settings` implementation provides a `new` function to load and construct the configuration settings.
impl Settings {
    /// Loads and constructs the application settings from various configuration sources.
    ///
    /// This function reads configuration settings from the following sources, in order of precedence:
    ///
    /// 1. `default.yaml`: Contains default settings for the application
    /// 2. Environment-specific YAML file (e.g., `development.yaml` or `production.yaml`) based on the `RUN_MODE` environment variable
    /// 3. Environment variables prefixed with `APP` (e.g., `APP__GENERAL__PORT`)
    ///
    /// The `CONFIG_DIR` environment variable can be used to specify the directory where the YAML configuration files are located (defaults to "config").
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)`: If the settings were loaded and constructed successfully
    /// * `Err(GarageError)`: If there was an error during the loading or construction process
    pub fn new() -> Result<Self, GarageError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let config_dir = env::var("CONFIG_DIR").unwrap_or_else(|_| "config".into());
        debug!("Run Mode: {:?}, Config Dir: {:?}", run_mode, config_dir);

        let s = Config::builder()
            .add_source(File::with_name(&format!("{}/default", config_dir)))
            .add_source(File::with_name(&format!("{}/{}", config_dir, run_mode)).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        let mut s: Self = s.try_deserialize::<Settings>()
            .map_err(GarageError::from)?;

        if let Some(ref mut path) = s.logging.path {
            *path = env::current_dir()?.join(path.clone());
        }

        Ok(s)
    }
}

/// Deserializes a secret string from configuration into a `Secret<String>`
fn deserialize_optional_secret<'de, D>(deserializer: D) -> Result<Option<Secret<String>>, D::Error>
    where
        D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.map(Secret::new))
}
