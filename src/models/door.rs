//! # Garage Door Representation

//! This module defines the `GarageDoor` struct and the `DoorRegistry`, which together represent the
//! physical doors the service controls. Each door pairs one relay (actuator) pin with one binary
//! position-sensor pin, plus a per-door mutex that serializes the read-decide-act control sequence.

use std::collections::BTreeMap;
use tokio::sync::Mutex;

use crate::config::DoorSettings;

/// Represents one physical garage door: one relay output and one position-sensor input.
///
/// The relay is a momentary trigger, not a directional drive: the same pulse is used for both
/// opening and closing, and the door's own motor controller decides the direction from its
/// prior state.
#[derive(Debug)]
pub struct GarageDoor {
    /// The door's name, uppercase-normalized (e.g. "LEFT")
    pub name: String,
    /// The BCM pin driving the relay
    pub relay_pin: u8,
    /// The BCM pin of the position sensor
    pub sensor_pin: u8,
    /// Serializes the read-decide-act sequence so overlapping control requests for
    /// the same door cannot race the idempotency check into a double pulse.
    pub control_lock: Mutex<()>,
}

impl GarageDoor {
    pub fn new(name: &str, relay_pin: u8, sensor_pin: u8) -> Self {
        Self {
            name: name.to_uppercase(),
            relay_pin,
            sensor_pin,
            control_lock: Mutex::new(()),
        }
    }
}

/// Static mapping of logical door names to their hardware handles.
///
/// Built once at startup from configuration and never mutated afterwards. Backed by a
/// `BTreeMap` so that iteration (the `ALL` expansion in status queries) is always in
/// lexicographic order by door name.
#[derive(Debug, Default)]
pub struct DoorRegistry {
    doors: BTreeMap<String, GarageDoor>,
}

impl DoorRegistry {
    /// Builds the registry from the configured door list, normalizing names to uppercase
    pub fn from_settings(door_settings: &[DoorSettings]) -> Self {
        let doors = door_settings
            .iter()
            .map(|d| {
                let door = GarageDoor::new(&d.name, d.relay_pin, d.sensor_pin);
                (door.name.clone(), door)
            })
            .collect();
        Self { doors }
    }

    /// Looks up a door by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&GarageDoor> {
        self.doors.get(&name.to_uppercase())
    }

    /// The registered door names, in lexicographic order
    pub fn door_names(&self) -> Vec<String> {
        self.doors.keys().cloned().collect()
    }

    /// Iterates over the registered doors in lexicographic order by name
    pub fn doors(&self) -> impl Iterator<Item = &GarageDoor> {
        self.doors.values()
    }

    pub fn len(&self) -> usize {
        self.doors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doors.is_empty()
    }
}
