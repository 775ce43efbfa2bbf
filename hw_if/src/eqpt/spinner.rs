//! # Spinner Equipment

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Maximum magnitude of a power demand.
pub const MAX_POWER: i32 = 127;

/// All spinners that can be commanded.
pub const ALL_ACT_IDS: [ActId; 4] = [
    ActId::TopSpinner,
    ActId::BottomSpinner,
    ActId::IntakeFront,
    ActId::IntakeRear,
];

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A motor driven roller.
pub trait SpinnerActuator {
    /// Set the power of the spinner, in the range `[-MAX_POWER, MAX_POWER]`.
    fn set_power(&mut self, power: i32);
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A pair of power demands for the top and bottom spinners.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpinnerDems {
    /// Power demanded of the top spinner
    pub top: i32,

    /// Power demanded of the bottom spinner
    pub bottom: i32,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// IDs of all spinners available to the robot
#[derive(Serialize, Deserialize, Debug, Hash, Eq, PartialEq, Copy, Clone)]
pub enum ActId {
    /// Top spinner, ejects or scores game objects
    TopSpinner,
    /// Bottom spinner, feeds game objects upward
    BottomSpinner,
    /// First intake roller
    IntakeFront,
    /// Second intake roller, reversed when not scoring high
    IntakeRear,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ActId {
    /// Get the IDs of the two sorting spinners.
    pub fn spinner_ids() -> [ActId; 2] {
        [ActId::TopSpinner, ActId::BottomSpinner]
    }
}

impl<T: SpinnerActuator + ?Sized> SpinnerActuator for Box<T> {
    fn set_power(&mut self, power: i32) {
        (**self).set_power(power)
    }
}
