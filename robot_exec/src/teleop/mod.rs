//! Teleoperation module
//!
//! Maps the operator's controller onto drive, intake, scraper and spinner commands. Runs once per
//! driver control cycle.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod curve;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use curve::*;
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during TeleopCtrl operation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TeleopError {
    #[error("Axis {0} is out of range ({1}), expected a value in [-127, 127]")]
    AxisOutOfRange(&'static str, i32),
}
