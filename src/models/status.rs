//! # Door Status & Control Data Structures

//! This module defines the transient status/control values produced by the garage controller and
//! the two externally-visible record shapes: the monitoring-style `StatusRecord` and the compact
//! `ControlAck`. Both records support an explicit field-allowlist filter used to trim webhook
//! replies down to a small payload.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// The instantaneous position of a door as classified from a single sensor read.
///
/// Derived fresh on every query and never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoorStatus {
    #[serde(rename = "OPEN")]
    Open,
    #[serde(rename = "CLOSED")]
    Closed,
    /// The sensor returned something other than the two expected binary levels
    #[serde(rename = "UNKNOWN")]
    Unknown,
    /// The requested door name is not in the registry
    #[serde(rename = "INVALID GARAGE NAME")]
    InvalidName,
}

impl fmt::Display for DoorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DoorStatus::Open => "OPEN",
            DoorStatus::Closed => "CLOSED",
            DoorStatus::Unknown => "UNKNOWN",
            DoorStatus::InvalidName => "INVALID GARAGE NAME",
        };
        write!(f, "{}", s)
    }
}

/// A control action requested by a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "OPEN")]
    Open,
    #[serde(rename = "CLOSE")]
    Close,
}

impl FromStr for Action {
    type Err = String;

    /// Converts a string representation into an `Action` (case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OPEN" => Ok(Action::Open),
            "CLOSE" => Ok(Action::Close),
            _ => Err(format!("Unknown action: {}", s)),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Open => write!(f, "OPEN"),
            Action::Close => write!(f, "CLOSE"),
        }
    }
}

/// One status record per door, shaped for consumption by an external monitoring system.
///
/// `return_code` follows monitoring-plugin conventions: "0" (OK) when the door is closed,
/// "2" (CRITICAL) for any other status.
#[derive(Debug, Clone, Serialize)]
pub struct StatusRecord {
    pub plugin_output: String,
    pub service_description: String,
    pub hostname: String,
    pub return_code: String,
    pub garage_name: String,
    pub status_time: String,
    pub status: DoorStatus,
    pub error: bool,
}

/// The compact acknowledgement produced for a control attempt
#[derive(Debug, Clone, Serialize)]
pub struct ControlAck {
    pub status_time: String,
    /// The message text from the controller ("TRIGGERED ...", "INVALID ACTION", ...)
    pub status: String,
    pub error: bool,
}

/// Serializes a record into a JSON object, optionally retaining only an allowlist of keys.
///
/// With `limit_keys = None` the full object is returned. With an allowlist, only the named
/// keys survive; names that don't exist on the record are silently skipped.
pub fn to_filtered_map<T: Serialize>(record: &T, limit_keys: Option<&[&str]>) -> Map<String, Value> {
    let value = serde_json::to_value(record).unwrap_or(Value::Null);
    let mut map = match value {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    if let Some(keys) = limit_keys {
        map.retain(|k, _| keys.contains(&k.as_str()));
    }
    map
}
