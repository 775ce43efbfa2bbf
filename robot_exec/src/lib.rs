//! # Robot library.
//!
//! This library holds everything the robot executable runs: the colour sort controller, the
//! actuator arbiter, operator and autonomous control, and the simulated hardware used when running
//! off-robot.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Actuator arbiter - owns final write access to every spinner
pub mod arbiter;

/// Autonomous routines - scripted sequences of chassis and mechanism steps
pub mod auto;

/// Chassis parameters - configuration handed to the motion control library
pub mod chassis;

/// Colour sort - classifies the hue sensor reading and drives the spinners
pub mod color_sort;

/// Global data store for the driver control loop
pub mod data_store;

/// Blocking delay implementation for the host
pub mod delay;

/// Intake rollers and scoring mode
pub mod intake;

/// Executable parameters
pub mod params;

/// Robot - the equipment the control loops drive
pub mod robot;

/// Simulated equipment backends
pub mod sim;

/// Teleoperation - maps controller input to robot commands
pub mod teleop;
