//! Implementations for the TeleopCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use serde::Serialize;

// Internal
use super::{Params, TeleopError};
use hw_if::{
    eqpt::spinner::SpinnerDems,
    input::{Button, ControllerState, MAX_AXIS},
};
use util::{
    module::State,
    params,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Teleoperation module state
#[derive(Default)]
pub struct TeleopCtrl {
    pub(crate) params: Params,

    /// Controller state of the previous cycle, for new press detection
    prev: ControllerState,
}

/// Commands for one driver control cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TeleopOutput {
    /// Open loop drive power of the left side
    pub tank_left: i32,

    /// Open loop drive power of the right side
    pub tank_right: i32,

    /// Whether the colour sort should be running
    pub sort_enabled: bool,

    /// Direct spinner demands which take priority over the colour sort, or `None` to leave the
    /// spinners to the colour sort
    pub spinner_override: Option<SpinnerDems>,

    /// Intake power in the current scoring mode
    pub intake_power: i32,

    /// Toggle the scraper this cycle
    pub toggle_scraper: bool,

    /// Toggle the intake top score mode this cycle
    pub toggle_top_score: bool,
}

/// Status report for TeleopCtrl processing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    /// Override button held
    pub override_held: bool,

    /// The sticks were inside the deadband
    pub drive_idle: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TeleopCtrl {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            prev: ControllerState::default(),
        }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }
}

impl State for TeleopCtrl {
    type InitData = &'static str;
    type InitError = params::LoadError;

    type InputData = ControllerState;
    type OutputData = TeleopOutput;
    type StatusReport = StatusReport;
    type ProcError = TeleopError;

    /// Initialise the TeleopCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, _session: &Session)
        -> Result<(), Self::InitError>
    {
        self.params = params::load(init_data)?;
        self.prev = ControllerState::default();

        Ok(())
    }

    /// Map one controller snapshot onto robot commands.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let input = *input_data;

        if input.left_y.abs() > MAX_AXIS {
            return Err(TeleopError::AxisOutOfRange("left_y", input.left_y));
        }
        if input.right_y.abs() > MAX_AXIS {
            return Err(TeleopError::AxisOutOfRange("right_y", input.right_y));
        }

        let curve = &self.params.drive_curve;
        let tank_left = curve.curve(input.left_y);
        let tank_right = curve.curve(input.right_y);

        // Holding L2 stops the colour sort and runs the bottom spinner outward
        let override_held = input.is_pressed(Button::L2);
        let spinner_override = if override_held {
            Some(SpinnerDems {
                top: 0,
                bottom: self.params.override_bottom_power,
            })
        } else {
            None
        };

        let intake_dir = input.r1 as i32 - input.r2 as i32;

        let output = TeleopOutput {
            tank_left,
            tank_right,
            sort_enabled: !override_held,
            spinner_override,
            intake_power: intake_dir * self.params.intake_power,
            toggle_scraper: input.is_new_press(&self.prev, Button::Down),
            toggle_top_score: input.is_new_press(&self.prev, Button::L1),
        };

        self.prev = input;

        trace!("TeleopCtrl output: {:?}", output);

        Ok((
            output,
            StatusReport {
                override_held,
                drive_idle: tank_left == 0 && tank_right == 0,
            },
        ))
    }
}
