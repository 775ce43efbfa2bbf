//! Colour sort module
//!
//! Classifies the hue of the object in front of the optical sensor and drives the top and bottom
//! spinners so that target coloured objects are held and everything else is ejected.
//!
//! Processing is split in two:
//! - [`ColorSort`] is the cyclic module, a pure function of the hue sample and the sort policy.
//! - [`SortTask`] owns the sensor and spinners and runs the module on its own thread while the
//!   shared [`SortEnable`] flag is set.
//!
//! There is no hysteresis on the classification. A reading which flickers across a band boundary
//! will make the top spinner chatter between stopped and ejecting.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;
mod task;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::info;
use serde::Serialize;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

// Internal
pub use params::*;
pub use state::*;
pub use task::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Lower bound of the valid hue range, inclusive.
///
/// Units: degrees
pub const HUE_MIN_DEG: f64 = 0.0;

/// Upper bound of the valid hue range, exclusive.
///
/// Units: degrees
pub const HUE_MAX_DEG: f64 = 360.0;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Classification of a hue sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColorClass {
    /// The hue falls inside the target band, the object is held.
    Target,

    /// Anything else, including invalid samples. The object is ejected.
    Other,
}

/// Possible errors that can occur during ColorSort initialisation.
#[derive(Debug, thiserror::Error)]
pub enum ColorSortInitError {
    #[error("Could not load the sort policy: {0}")]
    LoadError(#[from] util::params::LoadError),

    #[error("Invalid sort policy: {0}")]
    InvalidPolicy(#[from] PolicyError),
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Shared flag enabling the colour sort task.
///
/// Written by the driver control loop and read by the sort task on every iteration. Visibility is
/// best effort: a write is observed by the reader at its next iteration at the latest.
#[derive(Debug, Clone, Default)]
pub struct SortEnable(Arc<AtomicBool>);

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SortEnable {
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    /// Set the flag, logging only when the value changes.
    pub fn set(&self, enabled: bool) {
        if self.0.swap(enabled, Ordering::Relaxed) != enabled {
            info!(
                "Colour sort {}",
                if enabled { "enabled" } else { "disabled" }
            );
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Returns true if the hue is inside the range a healthy sensor reports.
pub fn is_valid_hue(hue: f64) -> bool {
    hue >= HUE_MIN_DEG && hue < HUE_MAX_DEG
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_sort_enable_shared() {
        let a = SortEnable::new(false);
        let b = a.clone();

        assert!(!b.is_enabled());
        a.set(true);
        assert!(b.is_enabled());
        b.set(false);
        assert!(!a.is_enabled());
    }

    #[test]
    fn test_valid_hue() {
        assert!(is_valid_hue(0.0));
        assert!(is_valid_hue(359.9));
        assert!(!is_valid_hue(360.0));
        assert!(!is_valid_hue(-1.0));
        assert!(!is_valid_hue(std::f64::NAN));
    }
}
