//! # Chassis Equipment
//!
//! The chassis wraps the drivetrain motors, odometry sensors and the motion control library which
//! closes the loop on them. Pose estimation, PID control and path following all live behind this
//! trait.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Pose of the robot on the field.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    /// Units: inches
    pub x_in: f64,

    /// Units: inches
    pub y_in: f64,

    /// Heading, clockwise from the +y axis.
    ///
    /// Units: degrees
    pub theta_deg: f64,
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Interface to the closed loop drivetrain.
pub trait Chassis {
    /// Calibrate the odometry sensors. Blocks until complete.
    fn calibrate(&mut self);

    /// Overwrite the current pose estimate.
    fn set_pose(&mut self, pose: Pose);

    /// Get the current pose estimate.
    fn pose(&self) -> Pose;

    /// Start a motion to the given pose. The motion is abandoned once `timeout_ms` has elapsed.
    ///
    /// If a motion is already running this blocks until it has finished before starting the new
    /// one.
    fn move_to_pose(&mut self, target: Pose, timeout_ms: u32);

    /// Block until the current motion has finished.
    fn wait_until_done(&mut self);

    /// Drive open loop with the given left and right powers in `[-127, 127]`.
    fn tank(&mut self, left: i32, right: i32);
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Pose {
    pub fn new(x_in: f64, y_in: f64, theta_deg: f64) -> Self {
        Self {
            x_in,
            y_in,
            theta_deg,
        }
    }
}
