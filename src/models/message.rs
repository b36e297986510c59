//! # Push-Notification Envelope Structures

//! This module defines the decoded shapes of the inbound webhook payloads: the outer SNS-style
//! envelope that distinguishes subscription-lifecycle messages from application notifications,
//! and the inner command message carried as a JSON string inside a `Notification`.

use serde::Deserialize;

/// Top-level envelope types the dispatcher recognizes
pub const TYPE_SUBSCRIPTION_CONFIRMATION: &str = "SubscriptionConfirmation";
pub const TYPE_NOTIFICATION: &str = "Notification";

/// The outer push-notification envelope.
///
/// Only the fields the dispatcher acts on are decoded; everything else in the
/// payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundEnvelope {
    /// The envelope kind ("SubscriptionConfirmation", "Notification", ...)
    #[serde(rename = "Type")]
    pub message_type: String,
    /// The unique identifier of the message (present on notifications)
    #[serde(rename = "MessageId")]
    pub message_id: Option<String>,
    /// The inner application payload, itself a JSON-encoded string
    #[serde(rename = "Message")]
    pub message: Option<String>,
    /// The confirmation URL to fetch for subscription-lifecycle messages
    #[serde(rename = "SubscribeURL")]
    pub subscribe_url: Option<String>,
}

/// The inner command message carried inside a `Notification` envelope.
///
/// Note: on the CONTROL path the `current_status` field is passed positionally as the
/// action argument to the controller. The field name does not match its runtime role;
/// this mirrors the upstream protocol and is deliberately not corrected here.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandMessage {
    /// The kind of request: "STATUS" or "CONTROL"
    #[serde(rename = "type")]
    pub action_type: String,
    /// The door the request targets
    pub garage_name: String,
    /// For CONTROL requests: the caller-asserted current status, used as the action
    pub current_status: Option<String>,
}
