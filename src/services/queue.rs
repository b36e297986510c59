//! # Outbound Reply Queue

//! This module defines the `QueuePublisher` trait used to hand webhook reply payloads to the
//! outbound message queue, together with the RabbitMQ-backed production implementation and a
//! no-op publisher used when no broker is configured. Publishing is fire-and-forget from the
//! dispatcher's point of view: failures are logged by the caller and never fail a request.

use async_trait::async_trait;
use lapin::{
    options::{BasicPublishOptions, QueueDeclareOptions},
    types::FieldTable,
    BasicProperties, Channel, Connection, ConnectionProperties,
};
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::info;

use crate::config::RabbitMQSettings;
use crate::errors::GarageResult;

/// Capability for publishing a JSON-serializable reply payload to the outbound queue
#[async_trait]
pub trait QueuePublisher: Send + Sync {
    async fn publish(&self, payload: &Value) -> GarageResult<()>;
}

/// Publishes replies to a RabbitMQ queue
pub struct RabbitMqPublisher {
    channel: Channel,
    queue: String,
}

impl RabbitMqPublisher {
    /// Connects to the broker and declares the reply queue
    ///
    /// # Arguments
    ///
    /// * `settings`: The RabbitMQ connection settings
    ///
    /// # Returns
    ///
    /// * `Ok(RabbitMqPublisher)` once the connection and channel are established
    /// * `Err(GarageError)` if the broker is unreachable or the queue cannot be declared
    pub async fn connect(settings: &RabbitMQSettings) -> GarageResult<Self> {
        let connection = Connection::connect(
            settings.connection_string().expose_secret(),
            ConnectionProperties::default(),
        )
        .await?;
        let channel = connection.create_channel().await?;
        channel
            .queue_declare(
                &settings.queue,
                QueueDeclareOptions {
                    durable: true,
                    ..QueueDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await?;
        info!("Connected to RabbitMQ, publishing replies to '{}'", settings.queue);
        Ok(Self {
            channel,
            queue: settings.queue.clone(),
        })
    }
}

#[async_trait]
impl QueuePublisher for RabbitMqPublisher {
    async fn publish(&self, payload: &Value) -> GarageResult<()> {
        let body = serde_json::to_vec(payload)?;
        self.channel
            .basic_publish(
                "",
                &self.queue,
                BasicPublishOptions::default(),
                &body,
                BasicProperties::default(),
            )
            .await?
            .await?;
        Ok(())
    }
}

/// No-op publisher used when no broker is configured; replies are logged and dropped
pub struct NullPublisher;

#[async_trait]
impl QueuePublisher for NullPublisher {
    async fn publish(&self, payload: &Value) -> GarageResult<()> {
        info!("No outbound queue configured, dropping reply: {}", payload);
        Ok(())
    }
}
