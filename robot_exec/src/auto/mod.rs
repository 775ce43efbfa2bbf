//! Autonomous module
//!
//! Autonomous routines are fixed sequences of [`AutoStep`]s with no branching or feedback, other
//! than waiting for the chassis to finish each motion. The steps are executed by [`AutoExec`].

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod exec;
mod routines;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

// Internal
use hw_if::eqpt::{chassis::Pose, spinner::ActId};
pub use exec::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Timeout given to every motion in the built in routines.
///
/// Units: milliseconds
pub const MOVE_TIMEOUT_MS: u32 = 4000;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The built in autonomous routines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoRoutine {
    /// Drive forward 5 inches, used to check the chassis tuning
    Test,

    /// Start on the left of the field
    Left,

    /// Start on the right of the field
    Right,

    /// Skills run
    Skills,
}

/// A single step of an autonomous routine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AutoStep {
    /// Change the intake scoring mode
    SetTopScore(bool),

    /// Overwrite the chassis pose estimate
    SetPose(Pose),

    /// Start a motion to a pose, waiting for any previous motion first
    MoveToPose { pose: Pose, timeout_ms: u32 },

    /// Block until the chassis has finished its motion
    WaitUntilDone,

    /// Set a spinner's power
    Spinner { id: ActId, power: i32 },

    /// Set the intake power in the current scoring mode
    Intake(i32),

    /// Extend (`true`) or retract (`false`) the scraper
    Scraper(bool),

    /// Wait for a fixed time
    ///
    /// Units: milliseconds
    Delay(u32),
}

/// Error returned when parsing an unknown routine name.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unknown autonomous routine \"{0}\", expected one of test, left, right, skills")]
pub struct UnknownRoutine(String);

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl AutoRoutine {
    /// Get the steps of this routine.
    pub fn steps(&self) -> Vec<AutoStep> {
        match self {
            AutoRoutine::Test => routines::test(),
            AutoRoutine::Left => routines::left(),
            AutoRoutine::Right => routines::right(),
            AutoRoutine::Skills => routines::skills(),
        }
    }
}

impl Default for AutoRoutine {
    fn default() -> Self {
        AutoRoutine::Right
    }
}

impl FromStr for AutoRoutine {
    type Err = UnknownRoutine;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "test" => Ok(AutoRoutine::Test),
            "left" => Ok(AutoRoutine::Left),
            "right" => Ok(AutoRoutine::Right),
            "skills" => Ok(AutoRoutine::Skills),
            _ => Err(UnknownRoutine(s.to_string())),
        }
    }
}

impl fmt::Display for AutoRoutine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AutoRoutine::Test => "test",
            AutoRoutine::Left => "left",
            AutoRoutine::Right => "right",
            AutoRoutine::Skills => "skills",
        };
        write!(f, "{}", name)
    }
}

impl AutoStep {
    /// Shorthand for a move with the default timeout.
    pub fn move_to(x_in: f64, y_in: f64, theta_deg: f64) -> Self {
        AutoStep::MoveToPose {
            pose: Pose::new(x_in, y_in, theta_deg),
            timeout_ms: MOVE_TIMEOUT_MS,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_routine_names() {
        for r in &[AutoRoutine::Test, AutoRoutine::Left, AutoRoutine::Right, AutoRoutine::Skills] {
            assert_eq!(r.to_string().parse::<AutoRoutine>(), Ok(*r));
        }
        assert_eq!("SKILLS".parse::<AutoRoutine>(), Ok(AutoRoutine::Skills));
        assert!("middle".parse::<AutoRoutine>().is_err());
    }

    #[test]
    fn test_every_routine_waits_for_its_last_move() {
        for r in &[AutoRoutine::Test, AutoRoutine::Left, AutoRoutine::Right, AutoRoutine::Skills] {
            let steps = r.steps();
            let last_move = steps
                .iter()
                .rposition(|s| matches!(s, AutoStep::MoveToPose { .. }))
                .unwrap();

            assert!(
                steps[last_move..].contains(&AutoStep::WaitUntilDone),
                "{} does not wait for its last move",
                r
            );
        }
    }

    #[test]
    fn test_skills_extends_right() {
        let right = AutoRoutine::Right.steps();
        let skills = AutoRoutine::Skills.steps();

        assert_eq!(skills.len(), right.len() + 2);
        assert_eq!(skills[4], AutoStep::move_to(6.0, 20.0, 0.0));
        assert_eq!(&skills[6..], &right[4..]);
    }
}
