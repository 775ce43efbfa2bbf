//! Autonomous routine executor

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use embedded_hal::blocking::delay::DelayMs;
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

// Internal
use super::{AutoRoutine, AutoStep};
use crate::{arbiter::ArbiterError, robot::Robot};
use hw_if::eqpt::{chassis::Chassis, pneumatic::Pneumatic};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Runs the steps of an autonomous routine in order.
#[derive(Debug, Clone)]
pub struct AutoExec {
    routine: AutoRoutine,
    steps: Vec<AutoStep>,
}

/// How an autonomous run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoEnd {
    /// Every step was executed
    Complete,

    /// The abort flag was raised before step `0` (zero indexed)
    Aborted(usize),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl AutoExec {
    pub fn new(routine: AutoRoutine) -> Self {
        Self {
            routine,
            steps: routine.steps(),
        }
    }

    /// Run the routine to completion.
    ///
    /// The colour sort is disabled for the whole routine. `abort` is checked between steps, a step
    /// which has started always finishes.
    pub fn run<C, P, D>(
        &self,
        robot: &mut Robot<C, P>,
        delay: &mut D,
        abort: &AtomicBool,
    ) -> Result<AutoEnd, ArbiterError>
    where
        C: Chassis,
        P: Pneumatic,
        D: DelayMs<u32>,
    {
        info!("Running autonomous routine \"{}\" ({} steps)", self.routine, self.steps.len());
        robot.sort_enable().set(false);

        let start = Instant::now();

        for (i, step) in self.steps.iter().enumerate() {
            if abort.load(Ordering::Relaxed) {
                info!("Autonomous aborted before step {}", i);
                return Ok(AutoEnd::Aborted(i));
            }

            debug!("Auto step {}: {:?}", i, step);
            robot.run_step(step, delay)?;
        }

        info!(
            "Autonomous routine complete in {:.3} s",
            start.elapsed().as_secs_f64()
        );

        Ok(AutoEnd::Complete)
    }
}
