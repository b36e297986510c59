/// # Garage Doorman Errors
/// This module defines the `GarageError` enum, which encapsulates all potential errors that can occur within the garage doorman service.
/// The enum variants provide specific error types for the hardware, dispatch, and outbound-queue components, facilitating clear error handling and reporting throughout the application.


use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum GarageError {
    /// Represents errors arising from misconfigurations or invalid settings.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Represents errors reading from or writing to a GPIO pin.
    #[error("GPIO error: {0}")]
    GpioError(String),

    /// Represents a failure while pulsing a door's relay.
    #[error("Actuation error: {0}")]
    ActuationError(String),

    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// Represents errors that occur during serialization or deserialization of data.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Represents errors publishing a reply to the outbound queue.
    #[error("Queue publish error: {0}")]
    PublishError(String),
}

impl From<config::ConfigError> for GarageError {
    fn from(err: config::ConfigError) -> Self {
        GarageError::ConfigError(err.to_string())
    }
}

impl From<lapin::Error> for GarageError {
    fn from(err: lapin::Error) -> Self {
        GarageError::PublishError(err.to_string())
    }
}

pub type GarageResult<T> = Result<T, GarageError>;
