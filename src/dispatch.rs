//! # Inbound Message Dispatch

//! This module decodes the webhook envelope delivered to `/sns-callback`, routes it by message
//! kind, and publishes a reply payload for every processed notification. Subscription-lifecycle
//! messages are confirmed with an HTTP GET as a side effect; malformed payloads are logged and
//! dropped so the HTTP layer can still return its generic acknowledgement.

use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::models::{
    CommandMessage, InboundEnvelope, TYPE_NOTIFICATION, TYPE_SUBSCRIPTION_CONFIRMATION,
};
use crate::reporting::ResponseFormatter;
use crate::services::queue::QueuePublisher;

/// The fields retained in webhook reply payloads, keeping the published message small
pub const REPLY_FIELDS: &[&str] = &["garage_name", "status", "error"];

/// Request kinds carried by a notification's inner message
const ACTION_STATUS: &str = "STATUS";
const ACTION_CONTROL: &str = "CONTROL";

/// Decodes inbound notification envelopes, invokes the garage logic, and hands replies to
/// the outbound publisher
pub struct MessageDispatcher {
    formatter: Arc<ResponseFormatter>,
    publisher: Arc<dyn QueuePublisher>,
    http_client: Client,
}

impl MessageDispatcher {
    pub fn new(formatter: Arc<ResponseFormatter>, publisher: Arc<dyn QueuePublisher>) -> Self {
        Self {
            formatter,
            publisher,
            http_client: Client::new(),
        }
    }

    /// Processes one raw webhook body.
    ///
    /// Decode failures and unrecognized envelope types are logged and produce nothing; the
    /// caller still acknowledges the HTTP request. A processed notification yields the reply
    /// payload that was handed to the publisher, which callers may use for inspection.
    ///
    /// # Arguments
    ///
    /// * `body`: The raw request body as delivered to the webhook endpoint
    pub async fn handle_callback(&self, body: &str) -> Option<Value> {
        let envelope: InboundEnvelope = match serde_json::from_str(body) {
            Ok(envelope) => envelope,
            Err(e) => {
                error!("Exception parsing webhook body: {}", e);
                error!("Unparseable payload was: {}", body);
                return None;
            }
        };

        match envelope.message_type.as_str() {
            TYPE_SUBSCRIPTION_CONFIRMATION => {
                self.confirm_subscription(&envelope).await;
                None
            }
            TYPE_NOTIFICATION => {
                info!("Processing notification {:?}", envelope.message_id);
                self.process_notification(&envelope).await
            }
            other => {
                warn!("Couldn't process message with type '{}'", other);
                None
            }
        }
    }

    /// Fetches the confirmation URL of a subscription-lifecycle message.
    ///
    /// The fetch is fire-and-forget: a failed confirmation is logged and swallowed.
    async fn confirm_subscription(&self, envelope: &InboundEnvelope) {
        let Some(url) = &envelope.subscribe_url else {
            warn!("SubscriptionConfirmation without a SubscribeURL, ignoring");
            return;
        };
        info!("Confirming subscription via {}", url);
        if let Err(e) = self.http_client.get(url).send().await {
            error!("Subscription confirmation fetch failed: {}", e);
        }
    }

    /// Routes a notification's inner command and publishes the reply payload
    async fn process_notification(&self, envelope: &InboundEnvelope) -> Option<Value> {
        let message_id = envelope.message_id.as_deref().unwrap_or_default();
        let raw_message = envelope.message.as_deref().unwrap_or_default();

        let command: CommandMessage = match serde_json::from_str(raw_message) {
            Ok(command) => command,
            Err(e) => {
                error!("Exception parsing inner message: {}", e);
                return None;
            }
        };

        let status: Value = match command.action_type.to_uppercase().as_str() {
            ACTION_STATUS => {
                let records = self
                    .formatter
                    .status_records(&command.garage_name, Some(REPLY_FIELDS));
                Value::Array(records.into_iter().map(Value::Object).collect())
            }
            ACTION_CONTROL => {
                // current_status is passed through as the action argument; the inbound
                // field name does not match its runtime role (kept as-is, see DESIGN.md)
                let asserted_status = command.current_status.as_deref().unwrap_or_default();
                let ack = self
                    .formatter
                    .control_ack(&command.garage_name, asserted_status, Some(REPLY_FIELDS))
                    .await;
                let failed = ack
                    .get("error")
                    .and_then(Value::as_bool)
                    .unwrap_or(true);
                Value::String(if failed { "fail" } else { "success" }.to_string())
            }
            _ => json!({"status": "Invalid action passed", "error": true}),
        };

        let reply = json!({
            "id": message_id.chars().take(4).collect::<String>(),
            "status": status,
        });

        info!("Publishing reply {}", reply);
        if let Err(e) = self.publisher.publish(&reply).await {
            error!("Failed to publish reply: {}", e);
        }

        Some(reply)
    }
}
