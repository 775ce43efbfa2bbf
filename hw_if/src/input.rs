//! # Controller input module
//!
//! Snapshot of the operator's controller, as read once per teleop cycle.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Serialize, Deserialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Maximum magnitude of a joystick axis.
pub const MAX_AXIS: i32 = 127;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// State of the controller's analog sticks and digital buttons.
///
/// Missing fields default to a centred stick or a released button, so an
/// empty JSON object is a neutral controller.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerState {
    /// Left stick vertical axis, in `[-127, 127]`
    pub left_y: i32,

    /// Right stick vertical axis, in `[-127, 127]`
    pub right_y: i32,

    pub l1: bool,
    pub l2: bool,
    pub r1: bool,
    pub r2: bool,
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub a: bool,
    pub b: bool,
    pub x: bool,
    pub y: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Digital buttons on the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    L1,
    L2,
    R1,
    R2,
    Up,
    Down,
    Left,
    Right,
    A,
    B,
    X,
    Y,
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum InputParseError {
    #[error("Controller state contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("Axis {0} is out of range ({1}), expected a value in [-127, 127]")]
    AxisOutOfRange(&'static str, i32),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ControllerState {

    /// Parse a controller state from a JSON object.
    pub fn from_json(json_str: &str) -> Result<Self, InputParseError> {
        let state: ControllerState = serde_json::from_str(json_str)
            .map_err(InputParseError::InvalidJson)?;

        if state.left_y.abs() > MAX_AXIS {
            return Err(InputParseError::AxisOutOfRange("left_y", state.left_y))
        }
        if state.right_y.abs() > MAX_AXIS {
            return Err(InputParseError::AxisOutOfRange("right_y", state.right_y))
        }

        Ok(state)
    }

    /// Returns true if the given button is held.
    pub fn is_pressed(&self, button: Button) -> bool {
        match button {
            Button::L1 => self.l1,
            Button::L2 => self.l2,
            Button::R1 => self.r1,
            Button::R2 => self.r2,
            Button::Up => self.up,
            Button::Down => self.down,
            Button::Left => self.left,
            Button::Right => self.right,
            Button::A => self.a,
            Button::B => self.b,
            Button::X => self.x,
            Button::Y => self.y,
        }
    }

    /// Returns true if `button` is held now but was not held in `prev`.
    pub fn is_new_press(&self, prev: &ControllerState, button: Button) -> bool {
        self.is_pressed(button) && !prev.is_pressed(button)
    }
}
