//! Parameters structure for the chassis
//!
//! The chassis is closed loop by the motion control library behind
//! [`hw_if::eqpt::chassis::Chassis`]. This module only describes how the
//! drivetrain is built and how the library's controllers are tuned.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the chassis.
#[derive(Debug, Clone, Deserialize)]
pub struct ChassisParams {

    // ---- DRIVETRAIN ----

    /// Smart ports of the left drive motors, negative if reversed.
    pub left_motor_ports: Vec<i8>,

    /// Smart ports of the right drive motors, negative if reversed.
    pub right_motor_ports: Vec<i8>,

    /// Free speed of the motor cartridge.
    ///
    /// Units: rpm
    pub cartridge_rpm: f64,

    /// Speed of the driven wheels.
    ///
    /// Units: rpm
    pub drive_rpm: f64,

    /// Units: inches
    pub track_width_in: f64,

    /// Units: inches
    pub wheel_diameter_in: f64,

    /// How much the chassis drifts sideways in turns, 2 for omni wheels and
    /// 8 with traction wheels.
    pub horizontal_drift: f64,

    // ---- ODOMETRY ----

    /// Smart port of the inertial sensor.
    pub imu_port: u8,

    /// The vertical tracking wheel, if fitted.
    pub vertical_tracking_wheel: Option<TrackingWheelParams>,

    /// The horizontal tracking wheel, if fitted.
    pub horizontal_tracking_wheel: Option<TrackingWheelParams>,

    // ---- CONTROLLERS ----

    /// Lateral (distance) controller, errors in inches.
    pub lateral: ControllerGains,

    /// Angular (heading) controller, errors in degrees.
    pub angular: ControllerGains,
}

/// A tracking wheel on a rotation sensor.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TrackingWheelParams {
    /// Smart port of the rotation sensor, negative if reversed.
    pub port: i8,

    /// Units: inches
    pub wheel_diameter_in: f64,

    /// Offset from the tracking centre, negative to the left or rear.
    ///
    /// Units: inches
    pub offset_in: f64,
}

/// Gains and exit conditions for one of the library's PID controllers.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ControllerGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,

    /// Error magnitude below which the integral accumulates.
    pub anti_windup: f64,

    pub small_error: f64,

    /// Units: milliseconds
    pub small_error_timeout_ms: u32,

    pub large_error: f64,

    /// Units: milliseconds
    pub large_error_timeout_ms: u32,

    /// Maximum output change per cycle, 0 for no limit.
    pub slew: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ChassisParams {
    /// Every smart port the chassis uses, negative for reversed motors.
    pub fn smart_ports(&self) -> Vec<i16> {
        let mut ports: Vec<i16> = self
            .left_motor_ports
            .iter()
            .chain(self.right_motor_ports.iter())
            .map(|p| *p as i16)
            .collect();

        ports.push(self.imu_port as i16);

        for wheel in [&self.vertical_tracking_wheel, &self.horizontal_tracking_wheel].iter() {
            if let Some(w) = wheel {
                ports.push(w.port as i16);
            }
        }

        ports
    }

    /// Ratio of wheel speed to motor free speed.
    pub fn gear_ratio(&self) -> f64 {
        self.drive_rpm / self.cartridge_rpm
    }

    /// Top linear speed of the chassis.
    ///
    /// Units: inches/second
    pub fn max_speed_ins(&self) -> f64 {
        self.drive_rpm / 60.0 * std::f64::consts::PI * self.wheel_diameter_in
    }
}
