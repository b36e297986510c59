//! # Response Formatting

//! This module converts internal status/control results into the two external record shapes:
//! the monitoring-style `StatusRecord` (one per queried door) and the compact `ControlAck`.
//! Both are returned as JSON maps so callers can apply the optional field-allowlist filter.

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::controllers::GarageDoorController;
use crate::models::{
    format_status_time, local_now, to_filtered_map, ControlAck, DoorStatus, StatusRecord,
};

/// The special door-name value that expands to every registered door
pub const ALL_DOORS: &str = "ALL";

/// Builds monitoring records and control acknowledgements from controller results
pub struct ResponseFormatter {
    controller: Arc<GarageDoorController>,
    /// The host identifier reported in every monitoring record
    hostname: String,
}

impl ResponseFormatter {
    pub fn new(controller: Arc<GarageDoorController>, hostname: String) -> Self {
        Self {
            controller,
            hostname,
        }
    }

    /// Builds one monitoring record per queried door.
    ///
    /// `garage_name` may be a single door name or the special value `ALL` (case-insensitive),
    /// which expands to every registered door in lexicographic order so repeated queries
    /// report doors in a stable sequence. Unknown names still produce a record, carrying
    /// the `INVALID GARAGE NAME` status with its error flag set.
    ///
    /// # Arguments
    ///
    /// * `garage_name`: The door to report on, or `ALL`
    /// * `limit_keys`: Optional allowlist of record fields to retain
    pub fn status_records(
        &self,
        garage_name: &str,
        limit_keys: Option<&[&str]>,
    ) -> Vec<Map<String, Value>> {
        let names: Vec<String> = if garage_name.eq_ignore_ascii_case(ALL_DOORS) {
            self.controller.registry().door_names()
        } else {
            vec![garage_name.to_string()]
        };

        names
            .iter()
            .map(|name| {
                let (status, error) = self.controller.read_status(name);
                let record = self.build_record(name, status, error);
                to_filtered_map(&record, limit_keys)
            })
            .collect()
    }

    /// Executes a control request and wraps the outcome in a control acknowledgement
    ///
    /// # Arguments
    ///
    /// * `garage_name`: The door to control
    /// * `action`: The requested action
    /// * `limit_keys`: Optional allowlist of record fields to retain
    pub async fn control_ack(
        &self,
        garage_name: &str,
        action: &str,
        limit_keys: Option<&[&str]>,
    ) -> Map<String, Value> {
        let status_time = format_status_time(local_now());
        let (message, error) = self.controller.control(garage_name, action).await;
        let ack = ControlAck {
            status_time,
            status: message,
            error,
        };
        to_filtered_map(&ack, limit_keys)
    }

    fn build_record(&self, garage_name: &str, status: DoorStatus, error: bool) -> StatusRecord {
        StatusRecord {
            plugin_output: format!("Garage is {}", status),
            service_description: format!("{} Garage Status", capitalize(garage_name)),
            hostname: self.hostname.clone(),
            return_code: if status == DoorStatus::Closed { "0" } else { "2" }.to_string(),
            garage_name: garage_name.to_uppercase(),
            status_time: format_status_time(local_now()),
            status,
            error,
        }
    }
}

/// Uppercases the first character and lowercases the rest ("LEFT" -> "Left")
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
