//! # Intake
//!
//! The intake is two rollers feeding game objects to the spinners. In top score mode both rollers
//! run the same way and lift objects to the top goal. Otherwise the rear roller is reversed to
//! score low.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use hw_if::eqpt::spinner::ActId;
use log::info;

use crate::arbiter::{ActuatorArbiter, ArbiterError, CmdSource};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Intake scoring mode and roller control.
#[derive(Debug, Clone)]
pub struct Intake {
    top_score: bool,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for Intake {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Intake {
    pub fn new(top_score: bool) -> Self {
        Self { top_score }
    }

    pub fn top_score(&self) -> bool {
        self.top_score
    }

    /// Change the scoring mode. The rollers keep their current demand until the next call to
    /// [`Intake::set_power`].
    pub fn set_top_score(&mut self, top_score: bool) {
        if top_score != self.top_score {
            info!("Intake top score mode {}", if top_score { "on" } else { "off" });
        }
        self.top_score = top_score;
    }

    pub fn toggle_top_score(&mut self) {
        self.set_top_score(!self.top_score)
    }

    /// Roller demands `(front, rear)` for the given power in the current mode.
    pub fn dems(&self, power: i32) -> (i32, i32) {
        if self.top_score {
            (power, power)
        } else {
            (power, -power)
        }
    }

    /// Drive both rollers at `power`, as a direct demand.
    pub fn set_power(&self, arbiter: &ActuatorArbiter, power: i32) -> Result<(), ArbiterError> {
        let (front, rear) = self.dems(power);
        arbiter.demand(CmdSource::Direct, ActId::IntakeFront, front)?;
        arbiter.demand(CmdSource::Direct, ActId::IntakeRear, rear)?;
        Ok(())
    }
}
