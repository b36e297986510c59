use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use garage_doorman::config::DoorSettings;
use garage_doorman::controllers::GarageDoorController;
use garage_doorman::errors::{GarageError, GarageResult};
use garage_doorman::models::DoorRegistry;
use garage_doorman::reporting::ResponseFormatter;
use garage_doorman::services::gpio::GpioInterface;
use garage_doorman::services::queue::QueuePublisher;

/// In-memory GPIO double: sensor levels are set by tests, relay writes are recorded
/// so pulse counts can be asserted.
pub struct MockGpio {
    levels: Mutex<HashMap<u8, u8>>,
    writes: Mutex<Vec<(u8, u8)>>,
    fail_writes: bool,
}

impl MockGpio {
    pub fn new() -> Self {
        Self {
            levels: Mutex::new(HashMap::new()),
            writes: Mutex::new(Vec::new()),
            fail_writes: false,
        }
    }

    /// A GPIO double whose relay writes always fault, for exercising actuation failures
    pub fn failing() -> Self {
        Self {
            levels: Mutex::new(HashMap::new()),
            writes: Mutex::new(Vec::new()),
            fail_writes: true,
        }
    }

    pub fn set_level(&self, pin: u8, level: u8) {
        self.levels.lock().unwrap().insert(pin, level);
    }

    /// How many times the given relay pin was driven high
    pub fn pulse_count(&self, pin: u8) -> usize {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, level)| *p == pin && *level == 1)
            .count()
    }
}

impl GpioInterface for MockGpio {
    fn setup(&self, _output_pins: &[u8], _input_pins: &[u8]) -> GarageResult<()> {
        Ok(())
    }

    fn read_pin(&self, pin: u8) -> GarageResult<u8> {
        self.levels
            .lock()
            .unwrap()
            .get(&pin)
            .copied()
            .ok_or_else(|| GarageError::GpioError(format!("No level set for pin {}", pin)))
    }

    fn write_pin(&self, pin: u8, level: u8) -> GarageResult<()> {
        if self.fail_writes {
            return Err(GarageError::GpioError(format!(
                "Simulated write fault on pin {}",
                pin
            )));
        }
        self.writes.lock().unwrap().push((pin, level));
        Ok(())
    }
}

/// Publisher double that records every payload handed to it
pub struct RecordingPublisher {
    published: Mutex<Vec<Value>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self {
            published: Mutex::new(Vec::new()),
        }
    }

    pub fn published(&self) -> Vec<Value> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueuePublisher for RecordingPublisher {
    async fn publish(&self, payload: &Value) -> GarageResult<()> {
        self.published.lock().unwrap().push(payload.clone());
        Ok(())
    }
}

pub const LEFT_RELAY: u8 = 27;
pub const LEFT_SENSOR: u8 = 25;
pub const RIGHT_RELAY: u8 = 22;
pub const RIGHT_SENSOR: u8 = 16;

pub fn door_settings() -> Vec<DoorSettings> {
    vec![
        DoorSettings {
            name: "LEFT".to_string(),
            relay_pin: LEFT_RELAY,
            sensor_pin: LEFT_SENSOR,
        },
        DoorSettings {
            name: "RIGHT".to_string(),
            relay_pin: RIGHT_RELAY,
            sensor_pin: RIGHT_SENSOR,
        },
    ]
}

pub fn create_controller(gpio: Arc<MockGpio>) -> Arc<GarageDoorController> {
    let registry = Arc::new(DoorRegistry::from_settings(&door_settings()));
    Arc::new(
        GarageDoorController::new(registry, gpio, Duration::from_millis(1))
            .expect("controller setup failed"),
    )
}

pub fn create_formatter(controller: Arc<GarageDoorController>) -> Arc<ResponseFormatter> {
    Arc::new(ResponseFormatter::new(controller, "testhost".to_string()))
}
