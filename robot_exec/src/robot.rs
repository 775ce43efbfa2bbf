//! # Robot
//!
//! Bundles the equipment driven by the input handling task: the chassis, the scraper, the intake
//! and the spinners through the arbiter. Teleop outputs and autonomous steps are both applied here,
//! so the two control modes command the hardware the same way.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use embedded_hal::blocking::delay::DelayMs;
use hw_if::eqpt::{
    chassis::Chassis,
    pneumatic::Pneumatic,
    spinner::{ActId, SpinnerDems},
};
use log::info;

use crate::{
    arbiter::{ActuatorArbiter, ArbiterError, CmdSource},
    auto::AutoStep,
    color_sort::SortEnable,
    intake::Intake,
    teleop::TeleopOutput,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct Robot<C, P> {
    pub chassis: C,
    pub scraper: P,

    arbiter: ActuatorArbiter,
    intake: Intake,
    sort_enable: SortEnable,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<C, P> Robot<C, P>
where
    C: Chassis,
    P: Pneumatic,
{
    pub fn new(chassis: C, scraper: P, arbiter: ActuatorArbiter, sort_enable: SortEnable) -> Self {
        Self {
            chassis,
            scraper,
            arbiter,
            intake: Intake::default(),
            sort_enable,
        }
    }

    pub fn arbiter(&self) -> &ActuatorArbiter {
        &self.arbiter
    }

    pub fn intake(&self) -> &Intake {
        &self.intake
    }

    pub fn sort_enable(&self) -> &SortEnable {
        &self.sort_enable
    }

    /// Apply the commands of one teleop cycle.
    pub fn apply_teleop(&mut self, out: &TeleopOutput) -> Result<(), ArbiterError> {
        self.chassis.tank(out.tank_left, out.tank_right);

        // Disable the sort before claiming so a sort tick in between is rejected rather than
        // fighting the override
        self.sort_enable.set(out.sort_enabled);

        match out.spinner_override {
            Some(dems) => {
                self.arbiter.claim(&ActId::spinner_ids())?;
                self.set_spinners(dems)?;
            }
            None => self.arbiter.release(&ActId::spinner_ids())?,
        }

        if out.toggle_scraper {
            let extended = !self.scraper.is_extended();
            self.scraper.set_extended(extended);
            info!("Scraper {}", if extended { "extended" } else { "retracted" });
        }

        if out.toggle_top_score {
            self.intake.toggle_top_score();
        }
        self.intake.set_power(&self.arbiter, out.intake_power)?;

        Ok(())
    }

    /// Execute a single autonomous step, blocking for delays and motions.
    pub fn run_step<D>(&mut self, step: &AutoStep, delay: &mut D) -> Result<(), ArbiterError>
    where
        D: DelayMs<u32>,
    {
        match *step {
            AutoStep::SetTopScore(top_score) => self.intake.set_top_score(top_score),
            AutoStep::SetPose(pose) => self.chassis.set_pose(pose),
            AutoStep::MoveToPose { pose, timeout_ms } => self.chassis.move_to_pose(pose, timeout_ms),
            AutoStep::WaitUntilDone => self.chassis.wait_until_done(),
            AutoStep::Spinner { id, power } => {
                self.arbiter.demand(CmdSource::Direct, id, power)?;
            }
            AutoStep::Intake(power) => self.intake.set_power(&self.arbiter, power)?,
            AutoStep::Scraper(extended) => self.scraper.set_extended(extended),
            AutoStep::Delay(ms) => delay.delay_ms(ms),
        }

        Ok(())
    }

    /// Stop the drive and every spinner, and disable the colour sort.
    pub fn stop_all(&mut self) -> Result<(), ArbiterError> {
        self.sort_enable.set(false);
        self.chassis.tank(0, 0);
        self.arbiter.stop_all()
    }

    fn set_spinners(&self, dems: SpinnerDems) -> Result<(), ArbiterError> {
        self.arbiter.demand(CmdSource::Direct, ActId::BottomSpinner, dems.bottom)?;
        self.arbiter.demand(CmdSource::Direct, ActId::TopSpinner, dems.top)?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::sim::{SimMotor, SimPneumatic};
    use hw_if::eqpt::{chassis::Pose, spinner::ALL_ACT_IDS};
    use std::collections::HashMap;

    /// Chassis recording every call made to it.
    #[derive(Debug, Default)]
    pub(crate) struct MockChassis {
        pub calls: Vec<ChassisCall>,
        pub pose: Pose,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub(crate) enum ChassisCall {
        Calibrate,
        SetPose(Pose),
        Move(Pose, u32),
        Wait,
        Tank(i32, i32),
    }

    impl Chassis for MockChassis {
        fn calibrate(&mut self) {
            self.calls.push(ChassisCall::Calibrate);
        }

        fn set_pose(&mut self, pose: Pose) {
            self.pose = pose;
            self.calls.push(ChassisCall::SetPose(pose));
        }

        fn pose(&self) -> Pose {
            self.pose
        }

        fn move_to_pose(&mut self, target: Pose, timeout_ms: u32) {
            self.pose = target;
            self.calls.push(ChassisCall::Move(target, timeout_ms));
        }

        fn wait_until_done(&mut self) {
            self.calls.push(ChassisCall::Wait);
        }

        fn tank(&mut self, left: i32, right: i32) {
            self.calls.push(ChassisCall::Tank(left, right));
        }
    }

    /// Delay recording the requested durations without sleeping.
    #[derive(Debug, Default)]
    pub(crate) struct MockDelay(pub Vec<u32>);

    impl DelayMs<u32> for MockDelay {
        fn delay_ms(&mut self, ms: u32) {
            self.0.push(ms)
        }
    }

    /// Build a robot on mocks, returning handles to each motor.
    pub(crate) fn robot() -> (Robot<MockChassis, SimPneumatic>, HashMap<ActId, SimMotor>) {
        let arbiter = ActuatorArbiter::new();
        let mut motors = HashMap::new();

        for id in ALL_ACT_IDS.iter() {
            let m = SimMotor::new(*id);
            arbiter.register(*id, m.clone()).unwrap();
            motors.insert(*id, m);
        }

        let robot = Robot::new(
            MockChassis::default(),
            SimPneumatic::default(),
            arbiter,
            SortEnable::new(false),
        );

        (robot, motors)
    }

    #[test]
    fn test_teleop_drive_and_intake() {
        let (mut r, motors) = robot();

        r.apply_teleop(&TeleopOutput {
            tank_left: 50,
            tank_right: -50,
            sort_enabled: true,
            intake_power: 127,
            ..Default::default()
        })
        .unwrap();

        assert_eq!(r.chassis.calls, vec![ChassisCall::Tank(50, -50)]);
        assert!(r.sort_enable().is_enabled());
        assert_eq!(motors[&ActId::IntakeFront].power(), 127);
        assert_eq!(motors[&ActId::IntakeRear].power(), 127);
    }

    #[test]
    fn test_teleop_override_beats_sort() {
        let (mut r, motors) = robot();
        let mut sort_top = r.arbiter().channel(ActId::TopSpinner, CmdSource::Sort);

        r.apply_teleop(&TeleopOutput {
            sort_enabled: false,
            spinner_override: Some(SpinnerDems { top: 0, bottom: -127 }),
            ..Default::default()
        })
        .unwrap();

        assert!(!r.sort_enable().is_enabled());
        assert_eq!(motors[&ActId::BottomSpinner].power(), -127);

        // A late sort command is rejected while the override is held
        hw_if::eqpt::spinner::SpinnerActuator::set_power(&mut sort_top, 127);
        assert_eq!(motors[&ActId::TopSpinner].power(), 0);

        r.apply_teleop(&TeleopOutput {
            sort_enabled: true,
            ..Default::default()
        })
        .unwrap();

        assert_eq!(r.arbiter().is_claimed(ActId::TopSpinner), Ok(false));
        hw_if::eqpt::spinner::SpinnerActuator::set_power(&mut sort_top, 127);
        assert_eq!(motors[&ActId::TopSpinner].power(), 127);
    }

    #[test]
    fn test_teleop_toggles() {
        let (mut r, motors) = robot();
        let toggle = TeleopOutput {
            toggle_scraper: true,
            toggle_top_score: true,
            intake_power: 90,
            ..Default::default()
        };

        r.apply_teleop(&toggle).unwrap();
        assert!(r.scraper.is_extended());
        assert!(!r.intake().top_score());
        assert_eq!(motors[&ActId::IntakeRear].power(), -90);

        r.apply_teleop(&toggle).unwrap();
        assert!(!r.scraper.is_extended());
        assert!(r.intake().top_score());
    }

    #[test]
    fn test_run_steps() {
        let (mut r, motors) = robot();
        let mut delay = MockDelay::default();
        let target = Pose::new(6.0, 28.0, 0.0);

        let steps = [
            AutoStep::SetTopScore(false),
            AutoStep::Intake(127),
            AutoStep::Spinner { id: ActId::BottomSpinner, power: -127 },
            AutoStep::MoveToPose { pose: target, timeout_ms: 4000 },
            AutoStep::WaitUntilDone,
            AutoStep::Scraper(true),
            AutoStep::Delay(2000),
        ];
        for s in steps.iter() {
            r.run_step(s, &mut delay).unwrap();
        }

        assert_eq!(motors[&ActId::IntakeRear].power(), -127);
        assert_eq!(motors[&ActId::BottomSpinner].power(), -127);
        assert_eq!(r.chassis.calls, vec![ChassisCall::Move(target, 4000), ChassisCall::Wait]);
        assert!(r.scraper.is_extended());
        assert_eq!(delay.0, vec![2000]);
    }

    #[test]
    fn test_stop_all() {
        let (mut r, motors) = robot();
        r.sort_enable().set(true);
        r.run_step(&AutoStep::Intake(127), &mut MockDelay::default()).unwrap();

        r.stop_all().unwrap();

        assert!(!r.sort_enable().is_enabled());
        assert!(motors.values().all(|m| m.power() == 0));
        assert_eq!(r.chassis.calls.last(), Some(&ChassisCall::Tank(0, 0)));
    }
}
