//! Shared application state handed to every HTTP handler.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Settings;
use crate::controllers::GarageDoorController;
use crate::dispatch::MessageDispatcher;
use crate::errors::GarageResult;
use crate::models::DoorRegistry;
use crate::reporting::ResponseFormatter;
use crate::services::gpio::GpioInterface;
use crate::services::queue::QueuePublisher;

/// Immutable application state shared across request handlers.
///
/// Cheap to clone; all members are behind `Arc`s. Built once at startup and never
/// mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub formatter: Arc<ResponseFormatter>,
    pub dispatcher: Arc<MessageDispatcher>,
}

impl AppState {
    /// Wires the registry, controller, formatter, and dispatcher together from the
    /// injected hardware and queue capabilities
    ///
    /// # Arguments
    ///
    /// * `settings`: The loaded application settings
    /// * `gpio`: The hardware capability for pin I/O
    /// * `publisher`: The outbound queue capability for webhook replies
    ///
    /// # Returns
    ///
    /// * `Ok(AppState)` once all components are constructed and pins are configured
    /// * `Err(GarageError)` if hardware setup fails
    pub fn new(
        settings: Settings,
        gpio: Arc<dyn GpioInterface>,
        publisher: Arc<dyn QueuePublisher>,
    ) -> GarageResult<Self> {
        let registry = Arc::new(DoorRegistry::from_settings(&settings.doors));
        let controller = Arc::new(GarageDoorController::new(
            registry,
            gpio,
            Duration::from_millis(settings.gpio.pulse_width_ms),
        )?);
        let formatter = Arc::new(ResponseFormatter::new(
            controller,
            settings.general.hostname.clone(),
        ));
        let dispatcher = Arc::new(MessageDispatcher::new(
            Arc::clone(&formatter),
            publisher,
        ));
        Ok(Self {
            settings: Arc::new(settings),
            formatter,
            dispatcher,
        })
    }
}
