mod common;

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use garage_doorman::dispatch::MessageDispatcher;
use garage_doorman::services::queue::QueuePublisher;

use common::{
    create_controller, create_formatter, MockGpio, RecordingPublisher, LEFT_SENSOR, RIGHT_RELAY,
    RIGHT_SENSOR,
};

fn create_dispatcher(
    gpio: Arc<MockGpio>,
) -> (MessageDispatcher, Arc<RecordingPublisher>) {
    let controller = create_controller(gpio);
    let formatter = create_formatter(controller);
    let publisher = Arc::new(RecordingPublisher::new());
    let dispatcher =
        MessageDispatcher::new(formatter, Arc::clone(&publisher) as Arc<dyn QueuePublisher>);
    (dispatcher, publisher)
}

fn notification(message_id: &str, inner: serde_json::Value) -> String {
    json!({
        "Type": "Notification",
        "MessageId": message_id,
        "Message": inner.to_string(),
    })
    .to_string()
}

#[tokio::test]
async fn test_status_notification_publishes_truncated_id_and_records() {
    let gpio = Arc::new(MockGpio::new());
    gpio.set_level(LEFT_SENSOR, 0);
    let (dispatcher, publisher) = create_dispatcher(gpio);

    let body = notification(
        "abcdef-1234",
        json!({"type": "STATUS", "garage_name": "LEFT"}),
    );
    let reply = dispatcher.handle_callback(&body).await.unwrap();

    assert_eq!(reply["id"], "abcd");
    let records = reply["status"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0],
        json!({"garage_name": "LEFT", "status": "CLOSED", "error": false})
    );

    let published = publisher.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0], reply);
}

#[tokio::test]
async fn test_control_notification_passes_current_status_as_action() {
    let gpio = Arc::new(MockGpio::new());
    gpio.set_level(RIGHT_SENSOR, 1);
    let (dispatcher, publisher) = create_dispatcher(Arc::clone(&gpio));

    // current_status carries the action on this path; the pass-through is intentional
    let body = notification(
        "ffff0000",
        json!({"type": "CONTROL", "garage_name": "RIGHT", "current_status": "CLOSE"}),
    );
    let reply = dispatcher.handle_callback(&body).await.unwrap();

    assert_eq!(reply["id"], "ffff");
    assert_eq!(reply["status"], "success");
    assert_eq!(gpio.pulse_count(RIGHT_RELAY), 1);
    assert_eq!(publisher.published().len(), 1);
}

#[tokio::test]
async fn test_control_notification_reports_fail_on_idempotent_reject() {
    let gpio = Arc::new(MockGpio::new());
    gpio.set_level(RIGHT_SENSOR, 1);
    let (dispatcher, _publisher) = create_dispatcher(Arc::clone(&gpio));

    let body = notification(
        "1234",
        json!({"type": "CONTROL", "garage_name": "RIGHT", "current_status": "OPEN"}),
    );
    let reply = dispatcher.handle_callback(&body).await.unwrap();

    assert_eq!(reply["status"], "fail");
    assert_eq!(gpio.pulse_count(RIGHT_RELAY), 0);
}

#[tokio::test]
async fn test_unrecognized_inner_action() {
    let gpio = Arc::new(MockGpio::new());
    let (dispatcher, publisher) = create_dispatcher(gpio);

    let body = notification(
        "9999-zzzz",
        json!({"type": "REBOOT", "garage_name": "LEFT"}),
    );
    let reply = dispatcher.handle_callback(&body).await.unwrap();

    assert_eq!(reply["id"], "9999");
    assert_eq!(
        reply["status"],
        json!({"status": "Invalid action passed", "error": true})
    );
    assert_eq!(publisher.published().len(), 1);
}

#[tokio::test]
async fn test_subscription_confirmation_fetches_url_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/confirm"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let gpio = Arc::new(MockGpio::new());
    let (dispatcher, publisher) = create_dispatcher(gpio);

    let body = json!({
        "Type": "SubscriptionConfirmation",
        "SubscribeURL": format!("{}/confirm", server.uri()),
    })
    .to_string();

    let reply = dispatcher.handle_callback(&body).await;
    assert!(reply.is_none());
    assert_eq!(publisher.published().len(), 0);
    // the expect(1) on the mock verifies exactly one fetch when the server drops
}

#[tokio::test]
async fn test_subscription_confirmation_fetch_failure_is_swallowed() {
    let gpio = Arc::new(MockGpio::new());
    let (dispatcher, publisher) = create_dispatcher(gpio);

    let body = json!({
        "Type": "SubscriptionConfirmation",
        "SubscribeURL": "http://127.0.0.1:9/unreachable",
    })
    .to_string();

    let reply = dispatcher.handle_callback(&body).await;
    assert!(reply.is_none());
    assert_eq!(publisher.published().len(), 0);
}

#[tokio::test]
async fn test_malformed_body_produces_nothing() {
    let gpio = Arc::new(MockGpio::new());
    let (dispatcher, publisher) = create_dispatcher(gpio);

    assert!(dispatcher.handle_callback("this is not json").await.is_none());
    assert!(dispatcher.handle_callback("{\"Type\": 7}").await.is_none());
    assert_eq!(publisher.published().len(), 0);
}

#[tokio::test]
async fn test_unknown_envelope_type_is_ignored() {
    let gpio = Arc::new(MockGpio::new());
    let (dispatcher, publisher) = create_dispatcher(gpio);

    let body = json!({"Type": "UnsubscribeConfirmation"}).to_string();
    assert!(dispatcher.handle_callback(&body).await.is_none());
    assert_eq!(publisher.published().len(), 0);
}

#[tokio::test]
async fn test_notification_with_malformed_inner_message() {
    let gpio = Arc::new(MockGpio::new());
    let (dispatcher, publisher) = create_dispatcher(gpio);

    let body = json!({
        "Type": "Notification",
        "MessageId": "abcd-1234",
        "Message": "not json at all",
    })
    .to_string();

    assert!(dispatcher.handle_callback(&body).await.is_none());
    assert_eq!(publisher.published().len(), 0);
}
