mod common;

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use serde_json::json;

use garage_doorman::config::{GeneralSettings, GpioSettings, LoggingSettings, Settings};
use garage_doorman::handlers;
use garage_doorman::state::AppState;

use common::{door_settings, MockGpio, RecordingPublisher, LEFT_SENSOR, RIGHT_SENSOR};

fn create_state(gpio: Arc<MockGpio>) -> AppState {
    let settings = Settings {
        general: GeneralSettings {
            hostname: "testhost".to_string(),
            port: 8555,
        },
        doors: door_settings(),
        gpio: GpioSettings { pulse_width_ms: 1 },
        logging: LoggingSettings {
            level: "info".to_string(),
            path: None,
        },
        rabbitmq: None,
    };
    let publisher = Arc::new(RecordingPublisher::new());
    AppState::new(settings, gpio, publisher).expect("state setup failed")
}

#[tokio::test]
async fn test_garage_status_defaults_to_all_doors() {
    let gpio = Arc::new(MockGpio::new());
    gpio.set_level(LEFT_SENSOR, 0);
    gpio.set_level(RIGHT_SENSOR, 1);
    let state = create_state(Arc::clone(&gpio));

    let response = handlers::garage_status(State(state), Query(HashMap::new())).await;
    let records = response.0;

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["garage_name"], "LEFT");
    assert_eq!(records[0]["return_code"], "0");
    assert_eq!(records[1]["garage_name"], "RIGHT");
    assert_eq!(records[1]["return_code"], "2");
}

#[tokio::test]
async fn test_garage_status_honors_query_parameter() {
    let gpio = Arc::new(MockGpio::new());
    gpio.set_level(LEFT_SENSOR, 0);
    let state = create_state(Arc::clone(&gpio));

    let mut params = HashMap::new();
    params.insert("garage_name".to_string(), "LEFT".to_string());
    let response = handlers::garage_status(State(state), Query(params)).await;
    let records = response.0;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["garage_name"], "LEFT");
    assert_eq!(records[0]["status"], "CLOSED");
}

#[tokio::test]
async fn test_sns_callback_always_acknowledges() {
    let gpio = Arc::new(MockGpio::new());
    gpio.set_level(LEFT_SENSOR, 0);
    let state = create_state(gpio);

    // a well-formed notification and an unparseable body get the same acknowledgement
    let body = json!({
        "Type": "Notification",
        "MessageId": "abcd-1234",
        "Message": json!({"type": "STATUS", "garage_name": "LEFT"}).to_string(),
    })
    .to_string();
    assert_eq!(handlers::sns_callback(State(state.clone()), body).await, "OK\n");
    assert_eq!(
        handlers::sns_callback(State(state), "garbage".to_string()).await,
        "OK\n"
    );
}
