//! # Hardware interface crate.
//!
//! Provides the interfaces between the robot software and the hardware it
//! drives: actuator identifiers, collaborator traits for the motors, sensors
//! and chassis, and the operator controller input.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Equipment definitions (spinners, sensors, pneumatics, chassis)
pub mod eqpt;

/// Operator controller input
pub mod input;
