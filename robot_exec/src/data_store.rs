//! # Data Store

use hw_if::input::ControllerState;
use log::warn;
use util::module::State;

use crate::teleop;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the driver control loop.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    // Controller input
    /// Latest controller state, held until the script provides a newer one
    pub controller: ControllerState,

    // TeleopCtrl
    pub teleop: teleop::TeleopCtrl,
    pub teleop_output: teleop::TeleopOutput,
    pub teleop_status_rpt: teleop::StatusReport,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,

    /// Number of consecutive teleop processing errors
    pub num_consec_teleop_errors: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform actions required at the start of a cycle.
    ///
    /// Clears those items that need clearing at the start of a cycle, and sets the 1Hz cycle flag.
    /// The controller state is kept, a held stick stays held until it is released.
    pub fn cycle_start(&mut self, cycle_frequency_hz: f64) {
        let cycles_per_s = (cycle_frequency_hz as u128).max(1);
        self.is_1_hz_cycle = self.num_cycles % cycles_per_s == 0;

        self.teleop_output = teleop::TeleopOutput::default();
        self.teleop_status_rpt = teleop::StatusReport::default();
    }

    /// Run teleop on the current controller state.
    ///
    /// Returns the commands to apply, or `None` if processing failed. On failure the output of
    /// this cycle stays at its default and must not be applied, since a default output would
    /// disable the colour sort.
    pub fn proc_teleop(&mut self) -> Option<teleop::TeleopOutput> {
        match self.teleop.proc(&self.controller) {
            Ok((o, r)) => {
                self.teleop_output = o;
                self.teleop_status_rpt = r;
                self.num_consec_teleop_errors = 0;
                Some(o)
            }
            Err(e) => {
                self.num_consec_teleop_errors += 1;
                warn!("Error during TeleopCtrl processing: {}", e);
                None
            }
        }
    }

    /// Perform actions required at the end of a cycle.
    ///
    /// `overran` is true if the cycle took longer than its period.
    pub fn cycle_end(&mut self, overran: bool) {
        if overran {
            self.num_consec_cycle_overruns += 1;
            if self.num_consec_cycle_overruns > 1 {
                warn!(
                    "{} consecutive cycle overruns",
                    self.num_consec_cycle_overruns
                );
            }
        } else {
            self.num_consec_cycle_overruns = 0;
        }

        self.num_cycles += 1;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_1_hz_cycle() {
        let mut ds = DataStore::default();
        let mut one_hz = vec![];

        for _ in 0..100 {
            ds.cycle_start(40.0);
            one_hz.push(ds.is_1_hz_cycle);
            ds.cycle_end(false);
        }

        assert_eq!(one_hz.iter().filter(|b| **b).count(), 3);
        assert!(one_hz[0] && one_hz[40] && one_hz[80]);
    }

    #[test]
    fn test_overruns() {
        let mut ds = DataStore::default();

        ds.cycle_end(true);
        ds.cycle_end(true);
        assert_eq!(ds.num_consec_cycle_overruns, 2);

        ds.cycle_end(false);
        assert_eq!(ds.num_consec_cycle_overruns, 0);
        assert_eq!(ds.num_cycles, 3);
    }

    #[test]
    fn test_controller_held_across_cycles() {
        let mut ds = DataStore::default();
        ds.controller.left_y = 100;

        ds.cycle_start(40.0);
        assert_eq!(ds.controller.left_y, 100);
    }

    #[test]
    fn test_proc_teleop() {
        let mut ds = DataStore::default();
        ds.controller.r1 = true;

        let out = ds.proc_teleop().unwrap();
        assert!(out.sort_enabled);
        assert_eq!(out.intake_power, 127);
        assert_eq!(ds.teleop_output, out);
    }

    #[test]
    fn test_failed_teleop_is_not_applied() {
        let mut ds = DataStore::default();
        ds.controller.left_y = 200;

        assert_eq!(ds.proc_teleop(), None);
        assert_eq!(ds.num_consec_teleop_errors, 1);

        ds.controller.left_y = 0;
        assert!(ds.proc_teleop().is_some());
        assert_eq!(ds.num_consec_teleop_errors, 0);
    }
}
