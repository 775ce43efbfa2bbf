//! # Simulated Equipment
//!
//! Stand-ins for the robot's equipment used when running on a host. They log what they are
//! commanded to do and report plausible readings, which is enough to exercise the control loops and
//! the colour sort task end to end.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::sync::{
    atomic::{AtomicI32, Ordering},
    Arc,
};
use std::time::Instant;

use hw_if::eqpt::{
    chassis::{Chassis, Pose},
    pneumatic::Pneumatic,
    sensor::HueSensor,
    spinner::{ActId, SpinnerActuator},
};
use log::{debug, info, trace};
use serde::Deserialize;

use crate::chassis::ChassisParams;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters of the simulated equipment.
#[derive(Debug, Clone, Deserialize)]
pub struct SimParams {
    /// Hues reported by the simulated sensor, in order, looping at the end.
    ///
    /// Units: degrees
    pub hue_sequence: Vec<f64>,

    /// How long each hue in the sequence is reported for.
    ///
    /// Units: milliseconds
    pub hue_hold_ms: u64,
}

/// Hue sensor replaying a fixed sequence against wall clock time.
pub struct SimHueSensor {
    sequence: Vec<f64>,
    hold_ms: u64,
    start: Instant,
}

/// Motor which remembers its last power. Clones share the same motor, so a test or the driver loop
/// can keep a handle after the motor has been handed to the arbiter.
#[derive(Debug, Clone)]
pub struct SimMotor {
    id: ActId,
    power: Arc<AtomicI32>,
}

#[derive(Debug, Default)]
pub struct SimPneumatic {
    extended: bool,
}

/// Chassis which arrives at every target instantly.
pub struct SimChassis {
    params: ChassisParams,
    pose: Pose,
    last_tank: (i32, i32),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimHueSensor {
    pub fn new(params: &SimParams) -> Self {
        Self {
            sequence: params.hue_sequence.clone(),
            hold_ms: params.hue_hold_ms.max(1),
            start: Instant::now(),
        }
    }

    /// Hue reported `elapsed_ms` after the sensor was created. An empty sequence reads as NaN, the
    /// same as an unplugged sensor.
    pub fn hue_at(&self, elapsed_ms: u64) -> f64 {
        if self.sequence.is_empty() {
            return std::f64::NAN;
        }

        let idx = (elapsed_ms / self.hold_ms) as usize % self.sequence.len();
        self.sequence[idx]
    }
}

impl HueSensor for SimHueSensor {
    fn read_hue(&mut self) -> f64 {
        let hue = self.hue_at(self.start.elapsed().as_millis() as u64);
        trace!("SimHueSensor: {}", hue);
        hue
    }
}

impl SimMotor {
    pub fn new(id: ActId) -> Self {
        Self {
            id,
            power: Arc::new(AtomicI32::new(0)),
        }
    }

    pub fn power(&self) -> i32 {
        self.power.load(Ordering::Relaxed)
    }
}

impl SpinnerActuator for SimMotor {
    fn set_power(&mut self, power: i32) {
        if self.power.swap(power, Ordering::Relaxed) != power {
            trace!("SimMotor {:?}: {}", self.id, power);
        }
    }
}

impl Pneumatic for SimPneumatic {
    fn set_extended(&mut self, extended: bool) {
        if extended != self.extended {
            debug!("SimPneumatic {}", if extended { "extended" } else { "retracted" });
        }
        self.extended = extended;
    }

    fn is_extended(&self) -> bool {
        self.extended
    }
}

impl SimChassis {
    pub fn new(params: ChassisParams) -> Self {
        Self {
            params,
            pose: Pose::default(),
            last_tank: (0, 0),
        }
    }
}

impl Chassis for SimChassis {
    fn calibrate(&mut self) {
        info!(
            "SimChassis calibrated, IMU on port {}, max speed {:.1} in/s",
            self.params.imu_port,
            self.params.max_speed_ins()
        );
    }

    fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    fn pose(&self) -> Pose {
        self.pose
    }

    fn move_to_pose(&mut self, target: Pose, timeout_ms: u32) {
        debug!(
            "SimChassis move to ({:.2}, {:.2}, {:.1}), timeout {} ms",
            target.x_in, target.y_in, target.theta_deg, timeout_ms
        );
        self.pose = target;
    }

    fn wait_until_done(&mut self) {}

    fn tank(&mut self, left: i32, right: i32) {
        if (left, right) != self.last_tank {
            trace!("SimChassis tank {} {}", left, right);
        }
        self.last_tank = (left, right);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sensor(seq: &[f64], hold_ms: u64) -> SimHueSensor {
        SimHueSensor::new(&SimParams {
            hue_sequence: seq.to_vec(),
            hue_hold_ms: hold_ms,
        })
    }

    #[test]
    fn test_hue_sequence() {
        let s = sensor(&[200.0, 50.0, 10.0], 500);

        assert_eq!(s.hue_at(0), 200.0);
        assert_eq!(s.hue_at(499), 200.0);
        assert_eq!(s.hue_at(500), 50.0);
        assert_eq!(s.hue_at(1200), 10.0);
        assert_eq!(s.hue_at(1500), 200.0);
    }

    #[test]
    fn test_empty_sequence_is_nan() {
        let mut s = sensor(&[], 0);
        assert!(s.read_hue().is_nan());
    }

    #[test]
    fn test_motor_clones_share_power() {
        let m = SimMotor::new(ActId::TopSpinner);
        let mut handle = m.clone();

        handle.set_power(-64);
        assert_eq!(m.power(), -64);
    }

    #[test]
    fn test_chassis_arrives_instantly() {
        let params: ChassisParams =
            util::params::from_str(crate::chassis::test::CHASSIS_TOML).unwrap();
        let mut c = SimChassis::new(params);

        c.calibrate();
        assert_eq!(c.pose(), Pose::default());

        let target = Pose::new(6.0, 28.0, 90.0);
        c.move_to_pose(target, 4000);
        c.wait_until_done();
        assert_eq!(c.pose(), target);

        c.tank(127, -127);
        assert_eq!(c.pose(), target);
    }

    #[test]
    fn test_pneumatic() {
        let mut p = SimPneumatic::default();
        assert!(!p.is_extended());
        p.set_extended(true);
        assert!(p.is_extended());
    }
}
