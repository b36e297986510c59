use std::sync::Arc;
use anyhow::Result;
use axum::{routing::get, routing::post, Router};
use tokio::signal::ctrl_c;
use tracing::{error, info, warn};

use garage_doorman::config::Settings;
use garage_doorman::handlers;
use garage_doorman::services::gpio::SysfsGpio;
use garage_doorman::services::queue::{NullPublisher, QueuePublisher, RabbitMqPublisher};
use garage_doorman::state::AppState;
use garage_doorman::utils::logging;

/// The main entry point of the garage doorman service
///
/// This function initializes the application, sets up logging, wires the hardware and
/// queue capabilities into the application state, and serves the HTTP surface until a
/// shutdown signal is received
#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}

/// The core logic of the garage doorman service
///
/// 1. Loads application settings from configuration files
/// 2. Initializes the logging system
/// 3. Connects the outbound reply publisher (falling back to a no-op publisher when the
///    broker is not configured or unreachable, since publishing is fire-and-forget)
/// 4. Builds the `AppState` over the sysfs GPIO interface, configuring the door pins
/// 5. Binds the HTTP listener and serves the status and webhook routes until ctrl-c
async fn run() -> Result<()> {
    let settings = Settings::new()?;
    let log_file_path = settings.logging.path.clone();
    let _guard = logging::init_logger(log_file_path)?;

    let publisher: Arc<dyn QueuePublisher> = match &settings.rabbitmq {
        Some(rabbitmq) => match RabbitMqPublisher::connect(rabbitmq).await {
            Ok(publisher) => Arc::new(publisher),
            Err(e) => {
                warn!("RabbitMQ unavailable ({}), replies will be dropped", e);
                Arc::new(NullPublisher)
            }
        },
        None => Arc::new(NullPublisher),
    };

    let gpio = Arc::new(SysfsGpio::new());
    let state = AppState::new(settings, gpio, publisher)?;
    let port = state.settings.general.port;

    let app = Router::new()
        .route("/garage/status", get(handlers::garage_status))
        .route("/sns-callback", post(handlers::sns_callback))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Garage doorman listening on port {}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Received shutdown signal. Shutting down gracefully...");
        })
        .await?;

    Ok(())
}
