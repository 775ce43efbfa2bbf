//! Built in autonomous routines
//!
//! All routines start from the origin facing +y. Poses are in inches and degrees.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::AutoStep::{self, *};
use hw_if::eqpt::{chassis::Pose, spinner::ActId};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

fn top(power: i32) -> AutoStep {
    Spinner {
        id: ActId::TopSpinner,
        power,
    }
}

fn bottom(power: i32) -> AutoStep {
    Spinner {
        id: ActId::BottomSpinner,
        power,
    }
}

pub(super) fn test() -> Vec<AutoStep> {
    vec![
        SetPose(Pose::default()),
        AutoStep::move_to(0.0, 5.0, 0.0),
        WaitUntilDone,
    ]
}

pub(super) fn left() -> Vec<AutoStep> {
    vec![
        SetTopScore(true),
        SetPose(Pose::default()),
        top(127),
        Intake(127),
        // Pick up the stack
        AutoStep::move_to(-6.0, 28.0, 0.0),
        WaitUntilDone,
        // Score in the centre goal
        AutoStep::move_to(0.0, 35.75, 45.0),
        WaitUntilDone,
        bottom(-127),
        SetTopScore(false),
        top(0),
        Intake(90),
        Delay(2000),
        Intake(0),
        bottom(0),
        // Line up on the loader
        AutoStep::move_to(-20.0, 10.0, 180.0),
        WaitUntilDone,
        Scraper(true),
        Delay(1000),
        SetTopScore(true),
        Intake(127),
        top(127),
        AutoStep::move_to(-33.0, -10.3, 180.0),
        WaitUntilDone,
        Delay(1000),
        // Long goal
        AutoStep::move_to(-30.0, 15.75, 0.0),
        Scraper(false),
        WaitUntilDone,
        bottom(-127),
        top(0),
    ]
}

pub(super) fn right() -> Vec<AutoStep> {
    let mut steps = right_opening();
    steps.extend(right_scoring());
    steps
}

pub(super) fn skills() -> Vec<AutoStep> {
    let mut steps = right_opening();
    steps.push(AutoStep::move_to(6.0, 20.0, 0.0));
    steps.push(WaitUntilDone);
    steps.extend(right_scoring());
    steps
}

fn right_opening() -> Vec<AutoStep> {
    vec![
        SetTopScore(true),
        SetPose(Pose::default()),
        top(127),
        Intake(127),
    ]
}

fn right_scoring() -> Vec<AutoStep> {
    vec![
        AutoStep::move_to(6.0, 28.0, 0.0),
        WaitUntilDone,
        AutoStep::move_to(35.0, -5.0, 90.0),
        WaitUntilDone,
        AutoStep::move_to(35.0, 15.75, 0.0),
        WaitUntilDone,
        bottom(-127),
        top(0),
        Intake(127),
    ]
}
