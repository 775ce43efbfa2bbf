//! Parameters structure for ColorSort

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use hw_if::eqpt::spinner::MAX_POWER;
use serde::Deserialize;

use super::{is_valid_hue, ColorClass, HUE_MAX_DEG, HUE_MIN_DEG};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The sort policy: which hues are held and how the spinners respond.
///
/// Immutable for the duration of a match.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SortPolicy {

    // ---- TARGET BAND ----

    /// Lower bound of the target band, exclusive.
    ///
    /// If greater than `upper_deg` the band wraps through 0, which is needed
    /// for red (`330 < h || h < 30`).
    ///
    /// Units: degrees
    pub lower_deg: f64,

    /// Upper bound of the target band, exclusive.
    ///
    /// Units: degrees
    pub upper_deg: f64,

    // ---- TIMING ----

    /// How long to hold the spinners stopped after a target classification
    /// before sampling again.
    ///
    /// Units: milliseconds
    pub dwell_ms: u32,

    /// Delay between samples while ejecting, and between checks of the
    /// enable flag while disabled.
    ///
    /// Units: milliseconds
    pub poll_period_ms: u32,

    // ---- ACTUATION ----

    /// Power given to the top spinner to eject a non-target object.
    pub eject_power: i32,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Reasons a loaded [`SortPolicy`] cannot be used.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PolicyError {
    #[error("Band bound {0} = {1} must be a finite hue in [0, 360]")]
    InvalidBound(&'static str, f64),

    #[error("poll_period_ms must be at least 1 ms, found {0}")]
    ZeroPollPeriod(u32),

    #[error("eject_power {0} is outside [-127, 127]")]
    EjectPowerOutOfRange(i32),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for SortPolicy {
    /// Blue target band.
    fn default() -> Self {
        Self {
            lower_deg: 150.0,
            upper_deg: 270.0,
            dwell_ms: 1000,
            poll_period_ms: 10,
            eject_power: 127,
        }
    }
}

impl SortPolicy {

    /// Policy with a red target band.
    pub fn red() -> Self {
        Self {
            lower_deg: 330.0,
            upper_deg: 30.0,
            ..Default::default()
        }
    }

    /// Check the policy can be run: both bounds are hues, the poll period
    /// is non-zero and the eject power is a valid demand.
    pub fn validate(&self) -> Result<(), PolicyError> {
        for (name, bound) in [("lower_deg", self.lower_deg), ("upper_deg", self.upper_deg)].iter() {
            if !bound.is_finite() || *bound < HUE_MIN_DEG || *bound > HUE_MAX_DEG {
                return Err(PolicyError::InvalidBound(*name, *bound));
            }
        }

        if self.poll_period_ms == 0 {
            return Err(PolicyError::ZeroPollPeriod(self.poll_period_ms));
        }

        if self.eject_power.abs() > MAX_POWER {
            return Err(PolicyError::EjectPowerOutOfRange(self.eject_power));
        }

        Ok(())
    }

    /// Returns true if the band wraps through 0 degrees.
    pub fn wraps(&self) -> bool {
        self.lower_deg > self.upper_deg
    }

    /// Classify a hue sample.
    ///
    /// Both band bounds are exclusive. Samples outside `[0, 360)`, including
    /// NaN, are always `Other` so that a faulty sensor leaves the spinners
    /// ejecting.
    pub fn classify(&self, hue: f64) -> ColorClass {
        if !is_valid_hue(hue) {
            return ColorClass::Other;
        }

        let in_band = if self.wraps() {
            hue > self.lower_deg || hue < self.upper_deg
        } else {
            hue > self.lower_deg && hue < self.upper_deg
        };

        if in_band {
            ColorClass::Target
        } else {
            ColorClass::Other
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_blue_band() {
        let p = SortPolicy::default();

        for h in &[150.001, 151.0, 200.0, 269.0, 269.999] {
            assert_eq!(p.classify(*h), ColorClass::Target, "hue {}", h);
        }
        for h in &[0.0, 50.0, 149.9, 150.0, 270.0, 300.0, 359.9] {
            assert_eq!(p.classify(*h), ColorClass::Other, "hue {}", h);
        }
    }

    #[test]
    fn test_out_of_range_is_other() {
        let p = SortPolicy::default();

        assert_eq!(p.classify(-200.0), ColorClass::Other);
        assert_eq!(p.classify(360.0), ColorClass::Other);
        assert_eq!(p.classify(560.0), ColorClass::Other);
        assert_eq!(p.classify(std::f64::NAN), ColorClass::Other);
        assert_eq!(p.classify(std::f64::INFINITY), ColorClass::Other);
    }

    #[test]
    fn test_red_band_wraps() {
        let p = SortPolicy::red();
        assert!(p.wraps());

        assert_eq!(p.classify(345.0), ColorClass::Target);
        assert_eq!(p.classify(0.0), ColorClass::Target);
        assert_eq!(p.classify(29.0), ColorClass::Target);
        assert_eq!(p.classify(30.0), ColorClass::Other);
        assert_eq!(p.classify(330.0), ColorClass::Other);
        assert_eq!(p.classify(200.0), ColorClass::Other);
    }

    #[test]
    fn test_deserialise_partial() {
        let p: SortPolicy = util::params::from_str("dwell_ms = 500").unwrap();
        assert_eq!(p.dwell_ms, 500);
        assert_eq!(p.lower_deg, 150.0);
        assert_eq!(p.upper_deg, 270.0);
        assert_eq!(p.eject_power, 127);
    }

    #[test]
    fn test_validate() {
        assert_eq!(SortPolicy::default().validate(), Ok(()));
        assert_eq!(SortPolicy::red().validate(), Ok(()));

        let p: SortPolicy = util::params::from_str("poll_period_ms = 0").unwrap();
        assert_eq!(p.validate(), Err(PolicyError::ZeroPollPeriod(0)));

        let p: SortPolicy = util::params::from_str("eject_power = 500").unwrap();
        assert_eq!(p.validate(), Err(PolicyError::EjectPowerOutOfRange(500)));

        let p = SortPolicy { eject_power: -127, ..Default::default() };
        assert_eq!(p.validate(), Ok(()));

        let p = SortPolicy { lower_deg: -10.0, ..Default::default() };
        assert_eq!(p.validate(), Err(PolicyError::InvalidBound("lower_deg", -10.0)));

        let p = SortPolicy { upper_deg: 400.0, ..Default::default() };
        assert_eq!(p.validate(), Err(PolicyError::InvalidBound("upper_deg", 400.0)));

        let p = SortPolicy { upper_deg: std::f64::NAN, ..Default::default() };
        assert!(matches!(p.validate(), Err(PolicyError::InvalidBound("upper_deg", _))));

        let p = SortPolicy { lower_deg: std::f64::INFINITY, ..Default::default() };
        assert!(matches!(p.validate(), Err(PolicyError::InvalidBound("lower_deg", _))));
    }
}
