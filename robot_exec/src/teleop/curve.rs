//! Exponential joystick curve

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Exponential drive curve applied to a joystick axis.
///
/// Small stick deflections give fine control while full deflection still gives full power. Inputs
/// inside the deadband give zero, anything outside gives at least `min_output`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct DriveCurve {
    /// Stick deflection below which the output is zero, out of 127
    pub deadband: i32,

    /// Smallest non-zero output, out of 127
    pub min_output: i32,

    /// Curvature of the curve, 1.0 is linear
    pub gain: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for DriveCurve {
    fn default() -> Self {
        Self {
            deadband: 3,
            min_output: 10,
            gain: 1.019,
        }
    }
}

impl DriveCurve {
    /// Apply the curve to a stick deflection in `[-127, 127]`.
    pub fn curve(&self, input: i32) -> i32 {
        if input.abs() <= self.deadband {
            return 0;
        }

        let sign = input.signum() as f64;
        let db = self.deadband as f64;
        let min = self.min_output as f64;

        let g = input.abs() as f64 - db;
        let g127 = 127.0 - db;

        let i = self.gain.powf(g - 127.0) * g * sign;
        let i127 = self.gain.powf(g127 - 127.0) * g127;

        let out = (127.0 - min) / 127.0 * i * 127.0 / i127 + min * sign;

        out.round() as i32
    }
}
