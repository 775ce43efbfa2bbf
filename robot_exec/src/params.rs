//! # Robot Executable Parameters
//!
//! This module provide parameters for the robot executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;
use std::collections::HashSet;

use crate::{auto::AutoRoutine, chassis::ChassisParams};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Number of smart ports on the brain.
pub const NUM_SMART_PORTS: u8 = 21;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct RobotExecParams {

    /// Autonomous routine to run if none is given on the command line
    pub auto_routine: AutoRoutine,

    /// Wiring of the mechanisms
    pub ports: Ports,
}

/// Port assignments of the mechanisms. Smart ports are negative if the
/// motor is reversed.
#[derive(Debug, Clone, Deserialize)]
pub struct Ports {
    pub top_spinner: i8,
    pub bottom_spinner: i8,
    pub intake_front: i8,
    pub intake_rear: i8,

    /// Smart port of the optical (hue) sensor
    pub optical_sensor: u8,

    /// Three-wire port of the scraper solenoid, `'A'` to `'H'`
    pub scraper: char,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PortsError {
    #[error("Smart port {0} does not exist, expected 1 to 21")]
    InvalidSmartPort(i16),

    #[error("Smart port {0} is assigned more than once")]
    DuplicateSmartPort(u8),

    #[error("Three-wire port {0:?} does not exist, expected 'A' to 'H'")]
    InvalidAdiPort(char),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Ports {
    /// Every smart port the mechanisms use, negative for reversed motors.
    pub fn smart_ports(&self) -> [i16; 5] {
        [
            self.top_spinner as i16,
            self.bottom_spinner as i16,
            self.intake_front as i16,
            self.intake_rear as i16,
            self.optical_sensor as i16,
        ]
    }

    /// Check every port exists and no smart port is used twice, either by two mechanisms or by a
    /// mechanism and the chassis.
    pub fn validate(&self, chassis: &ChassisParams) -> Result<(), PortsError> {
        let mut used = HashSet::new();

        for port in self.smart_ports().iter().chain(chassis.smart_ports().iter()) {
            let abs = port.abs();
            if abs < 1 || abs > NUM_SMART_PORTS as i16 {
                return Err(PortsError::InvalidSmartPort(*port));
            }
            if !used.insert(abs as u8) {
                return Err(PortsError::DuplicateSmartPort(abs as u8));
            }
        }

        match self.scraper.to_ascii_uppercase() {
            'A'..='H' => Ok(()),
            c => Err(PortsError::InvalidAdiPort(c)),
        }
    }
}
