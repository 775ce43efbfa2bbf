//! Parameters structure for TeleopCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;
use super::DriveCurve;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for teleoperation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Params {

    /// Period of the driver control cycle.
    ///
    /// Units: milliseconds
    pub cycle_period_ms: u64,

    /// Curve applied to both drive sticks
    pub drive_curve: DriveCurve,

    /// Power of the intake while R1 or R2 is held
    pub intake_power: i32,

    /// Bottom spinner power while the override is held, the top spinner is stopped
    pub override_bottom_power: i32,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            cycle_period_ms: 25,
            drive_curve: DriveCurve::default(),
            intake_power: 127,
            override_bottom_power: -127,
        }
    }
}

impl Params {
    /// Frequency of the driver control cycle.
    ///
    /// Units: hertz
    pub fn cycle_frequency_hz(&self) -> f64 {
        1000.0 / self.cycle_period_ms.max(1) as f64
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_partial_params() {
        let p: Params = util::params::from_str("cycle_period_ms = 50").unwrap();

        assert_eq!(p.cycle_period_ms, 50);
        assert_eq!(p.cycle_frequency_hz(), 20.0);
        assert_eq!(p.drive_curve, DriveCurve::default());
        assert_eq!(p.override_bottom_power, -127);
    }
}
