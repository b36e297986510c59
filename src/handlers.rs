//! HTTP request handlers
//!
//! This module contains all the HTTP endpoint handlers. Each handler is responsible
//! for extracting data from HTTP requests, calling the appropriate services, and
//! returning HTTP responses.

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::reporting::ALL_DOORS;
use crate::state::AppState;

/// Get the monitoring-shape status of one door or of all doors
///
/// Query parameters:
/// - `garage_name`: A door name or `ALL` (default `ALL`)
///
/// Always returns a JSON array with one record per queried door; an unknown name
/// yields a single record carrying the invalid-name status.
pub async fn garage_status(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<Map<String, Value>>> {
    let garage_name = params
        .get("garage_name")
        .map(String::as_str)
        .unwrap_or(ALL_DOORS);

    Json(state.formatter.status_records(garage_name, None))
}

/// Receive a push-notification webhook delivery
///
/// Processing (subscription confirmation, status/control commands, reply publication)
/// happens as a side effect; the HTTP response is always the plain acknowledgement
/// regardless of the payload's outcome.
pub async fn sns_callback(State(state): State<AppState>, body: String) -> &'static str {
    state.dispatcher.handle_callback(&body).await;
    "OK\n"
}
