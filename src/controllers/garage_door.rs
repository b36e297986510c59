use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::errors::{GarageError, GarageResult};
use crate::models::{Action, DoorRegistry, DoorStatus, GarageDoor};
use crate::services::gpio::{GpioInterface, LEVEL_HIGH, LEVEL_LOW};

/// The central controller for reading door positions and driving the door relays.
///
/// Holds the immutable `DoorRegistry` and the injected GPIO capability. Status reads are
/// pure observations; control requests take the target door's lock so the read-decide-act
/// sequence cannot race a concurrent request into a double pulse.
pub struct GarageDoorController {
    registry: Arc<DoorRegistry>,
    gpio: Arc<dyn GpioInterface>,
    /// How long the relay stays energized per trigger pulse
    pulse_width: Duration,
}

impl GarageDoorController {
    /// Creates a new `GarageDoorController` and configures the door pins
    ///
    /// # Arguments
    ///
    /// * `registry`: The registry of doors to control
    /// * `gpio`: The hardware capability for pin I/O
    /// * `pulse_width`: How long to hold the relay energized when triggering a door
    ///
    /// # Returns
    ///
    /// * `Ok(GarageDoorController)` once all relay and sensor pins are configured
    /// * `Err(GarageError)` if pin setup fails
    pub fn new(
        registry: Arc<DoorRegistry>,
        gpio: Arc<dyn GpioInterface>,
        pulse_width: Duration,
    ) -> GarageResult<Self> {
        info!("Initializing Garage Door Controller");
        let output_pins: Vec<u8> = registry.doors().map(|d| d.relay_pin).collect();
        let input_pins: Vec<u8> = registry.doors().map(|d| d.sensor_pin).collect();
        gpio.setup(&output_pins, &input_pins)?;
        Ok(Self {
            registry,
            gpio,
            pulse_width,
        })
    }

    pub fn registry(&self) -> &Arc<DoorRegistry> {
        &self.registry
    }

    /// Reads a door's sensor and classifies it into a status.
    ///
    /// An unknown door name yields `InvalidName`; sensor level 0 maps to `Closed`, level 1
    /// to `Open`, and any other reading (or a failed hardware read) to `Unknown`. The error
    /// flag is true exactly for the `InvalidName` and `Unknown` outcomes.
    ///
    /// # Arguments
    ///
    /// * `garage_name`: The name of the door to read
    ///
    /// # Returns
    ///
    /// The classified `DoorStatus` and its error flag
    pub fn read_status(&self, garage_name: &str) -> (DoorStatus, bool) {
        let Some(door) = self.registry.get(garage_name) else {
            return (DoorStatus::InvalidName, true);
        };
        self.read_door(door)
    }

    fn read_door(&self, door: &GarageDoor) -> (DoorStatus, bool) {
        match self.gpio.read_pin(door.sensor_pin) {
            Ok(0) => (DoorStatus::Closed, false),
            Ok(1) => (DoorStatus::Open, false),
            Ok(other) => {
                warn!("Sensor on door {} returned unexpected level {}", door.name, other);
                (DoorStatus::Unknown, true)
            }
            Err(e) => {
                warn!("Sensor read failed on door {}: {}", door.name, e);
                (DoorStatus::Unknown, true)
            }
        }
    }

    /// Validates and executes a control request against a door.
    ///
    /// Validation order: unknown door, then unknown action. A request that matches the
    /// door's current position is rejected without touching the relay. Otherwise the relay
    /// is pulsed exactly once. Rejection and validation branches leave the error flag true;
    /// only a completed pulse clears it. Every error-flagged message is logged here so
    /// diagnostics don't depend on what the caller does with the return value.
    ///
    /// # Arguments
    ///
    /// * `garage_name`: The name of the door to control
    /// * `action`: The requested action ("OPEN" or "CLOSE", case-insensitive)
    ///
    /// # Returns
    ///
    /// The outcome message and its error flag
    pub async fn control(&self, garage_name: &str, action: &str) -> (String, bool) {
        let mut action_error = true;

        let Some(door) = self.registry.get(garage_name) else {
            let message = "INVALID GARAGE_NAME".to_string();
            warn!("{}", message);
            return (message, action_error);
        };

        let Ok(action) = Action::from_str(action) else {
            let message = "INVALID ACTION".to_string();
            warn!("{}", message);
            return (message, action_error);
        };

        // Hold the door's lock across read-decide-act so a concurrent request can't
        // slip between the status read and the pulse.
        let _guard = door.control_lock.lock().await;

        let (current_status, _status_error) = self.read_door(door);
        let message = match (current_status, action) {
            (DoorStatus::Open, Action::Open) => {
                "Trying to open garage that is already open".to_string()
            }
            (DoorStatus::Closed, Action::Close) => {
                "Trying to close garage that is already closed".to_string()
            }
            _ => match self.pulse(door).await {
                Ok(()) => {
                    action_error = false;
                    format!(
                        "TRIGGERED {} GARAGE TO {}. OLD POSITION: {}",
                        door.name, action, current_status
                    )
                }
                Err(e) => {
                    warn!("Relay pulse failed on door {}: {}", door.name, e);
                    "AN ERROR OCCURED WHILE TRIGGERING THE RELAY".to_string()
                }
            },
        };

        if action_error {
            warn!("{}", message);
        } else {
            info!("{}", message);
        }

        (message, action_error)
    }

    /// Energizes the door's relay for the configured pulse width, then releases it.
    ///
    /// The pulse always runs to completion once started; there is no cancellation point
    /// between the high and low writes. If the release write faults, a second release is
    /// attempted before the failure is reported so a write fault can't leave the trigger
    /// held down.
    async fn pulse(&self, door: &GarageDoor) -> GarageResult<()> {
        self.gpio
            .write_pin(door.relay_pin, LEVEL_HIGH)
            .map_err(|e| GarageError::ActuationError(e.to_string()))?;
        tokio::time::sleep(self.pulse_width).await;
        if let Err(e) = self.gpio.write_pin(door.relay_pin, LEVEL_LOW) {
            if let Err(retry) = self.gpio.write_pin(door.relay_pin, LEVEL_LOW) {
                warn!(
                    "Relay release retry failed on door {}, relay may still be energized: {}",
                    door.name, retry
                );
            }
            return Err(GarageError::ActuationError(e.to_string()));
        }
        Ok(())
    }
}
