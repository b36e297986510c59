//! # GPIO Hardware Interface

//! This module defines the `GpioInterface` trait, the capability boundary between the garage
//! logic and the relay/sensor hardware, along with `SysfsGpio`, the production implementation
//! backed by the Linux sysfs GPIO interface. The trait is injected into the controller at
//! startup so tests can substitute an in-memory double.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

use crate::errors::{GarageError, GarageResult};

/// The logic level written to a relay pin
pub const LEVEL_LOW: u8 = 0;
pub const LEVEL_HIGH: u8 = 1;

/// Capability interface for binary hardware I/O.
///
/// `read_pin` observes a binary input (position sensor); `write_pin` drives a binary
/// output (relay). Implementations must be safe to share across request handlers.
pub trait GpioInterface: Send + Sync {
    /// Configures the given pins as outputs (relays) and inputs (sensors)
    fn setup(&self, output_pins: &[u8], input_pins: &[u8]) -> GarageResult<()>;

    /// Reads the current level of an input pin
    fn read_pin(&self, pin: u8) -> GarageResult<u8>;

    /// Drives an output pin to the given level
    fn write_pin(&self, pin: u8, level: u8) -> GarageResult<()>;
}

/// Production GPIO implementation over `/sys/class/gpio`.
///
/// Pins are exported and given a direction during `setup`; reads and writes go through
/// the per-pin `value` files. All operations are short synchronous file accesses.
pub struct SysfsGpio {
    base: PathBuf,
}

impl SysfsGpio {
    pub fn new() -> Self {
        Self {
            base: PathBuf::from("/sys/class/gpio"),
        }
    }

    /// Creates a sysfs GPIO interface rooted at a custom path (used by tests)
    pub fn with_base(base: PathBuf) -> Self {
        Self { base }
    }

    fn pin_dir(&self, pin: u8) -> PathBuf {
        self.base.join(format!("gpio{}", pin))
    }

    fn export(&self, pin: u8) -> GarageResult<()> {
        if self.pin_dir(pin).exists() {
            return Ok(());
        }
        let mut f = fs::OpenOptions::new()
            .write(true)
            .open(self.base.join("export"))?;
        f.write_all(pin.to_string().as_bytes())?;
        Ok(())
    }

    fn set_direction(&self, pin: u8, direction: &str) -> GarageResult<()> {
        fs::write(self.pin_dir(pin).join("direction"), direction)?;
        Ok(())
    }
}

impl Default for SysfsGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioInterface for SysfsGpio {
    fn setup(&self, output_pins: &[u8], input_pins: &[u8]) -> GarageResult<()> {
        for &pin in output_pins {
            self.export(pin)?;
            self.set_direction(pin, "out")?;
            // relays are active-high; make sure nothing fires at startup
            self.write_pin(pin, LEVEL_LOW)?;
            debug!("Configured pin {} as output", pin);
        }
        for &pin in input_pins {
            self.export(pin)?;
            self.set_direction(pin, "in")?;
            debug!("Configured pin {} as input", pin);
        }
        Ok(())
    }

    fn read_pin(&self, pin: u8) -> GarageResult<u8> {
        let raw = fs::read_to_string(self.pin_dir(pin).join("value"))?;
        raw.trim()
            .parse::<u8>()
            .map_err(|e| GarageError::GpioError(format!("Unreadable value on pin {}: {}", pin, e)))
    }

    fn write_pin(&self, pin: u8, level: u8) -> GarageResult<()> {
        fs::write(self.pin_dir(pin).join("value"), level.to_string())
            .map_err(|e| GarageError::GpioError(format!("Failed to drive pin {}: {}", pin, e)))
    }
}
