//! Implementations for the ColorSort state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use serde::Serialize;
use std::convert::Infallible;

// Internal
use super::{is_valid_hue, ColorClass, ColorSortInitError, PolicyError, SortPolicy};
use hw_if::eqpt::spinner::SpinnerDems;
use util::{
    archive::{Archived, Archiver},
    module::State,
    params,
    session::{self, Session},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Colour sort module state
#[derive(Default)]
pub struct ColorSort {
    pub(crate) policy: SortPolicy,

    pub(crate) summary: SortSummary,

    /// Decision of the last cycle, waiting to be archived
    last_record: Option<SortRecord>,
    arch_decisions: Archiver,
}

/// Input data to ColorSort.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputData {
    /// Hue reported by the sensor this cycle.
    ///
    /// Units: degrees
    pub hue: f64,
}

/// Output of ColorSort which the spinners must execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutputData {
    /// Spinner power demands
    pub dems: SpinnerDems,

    /// How long the demands must be held before the next sample.
    ///
    /// Units: milliseconds
    pub hold_ms: u32,
}

/// Status report for ColorSort processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub class: ColorClass,

    /// False if the hue was outside `[0, 360)` and defaulted to `Other`
    pub hue_valid: bool,
}

/// Counters of the decisions made during a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SortSummary {
    pub num_target: u64,
    pub num_other: u64,
    pub num_invalid_hue: u64,
}

/// A single archived decision.
#[derive(Debug, Clone, Copy, Serialize)]
struct SortRecord {
    time_s: f64,
    hue: f64,
    class: ColorClass,
    top: i32,
    bottom: i32,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for ColorSort {
    type InitData = &'static str;
    type InitError = ColorSortInitError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = Infallible;

    /// Initialise the ColorSort module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        let policy: SortPolicy = params::load(init_data)?;
        policy.validate()?;
        self.policy = policy;

        // The archive is optional, sorting carries on without it
        self.arch_decisions = match Archiver::from_path(session, "color_sort/decisions.csv") {
            Ok(a) => a,
            Err(e) => {
                log::warn!("Could not open the colour sort archive: {}", e);
                Archiver::default()
            }
        };

        debug!("ColorSort policy: {:?}", self.policy);

        Ok(())
    }

    /// Classify one hue sample and compute the spinner demands.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let hue = input_data.hue;
        let hue_valid = is_valid_hue(hue);
        let class = self.policy.classify(hue);

        if !hue_valid {
            trace!("Hue {} is out of range, treating as Other", hue);
            self.summary.num_invalid_hue += 1;
        }

        let output = match class {
            ColorClass::Target => {
                self.summary.num_target += 1;
                OutputData {
                    dems: SpinnerDems { top: 0, bottom: 0 },
                    hold_ms: self.policy.dwell_ms,
                }
            },
            ColorClass::Other => {
                self.summary.num_other += 1;
                OutputData {
                    dems: SpinnerDems { top: self.policy.eject_power, bottom: 0 },
                    hold_ms: self.policy.poll_period_ms,
                }
            }
        };

        trace!("ColorSort: hue {:.1} -> {:?}, dems {:?}", hue, class, output.dems);

        self.last_record = Some(SortRecord {
            time_s: session::get_elapsed_seconds(),
            hue,
            class,
            top: output.dems.top,
            bottom: output.dems.bottom,
        });

        Ok((output, StatusReport { class, hue_valid }))
    }
}

impl Archived for ColorSort {
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(record) = self.last_record.take() {
            self.arch_decisions.serialise(record)?;
        }

        Ok(())
    }
}

impl ColorSort {

    /// Create a new module from a policy, without loading parameters or
    /// archiving.
    pub fn new(policy: SortPolicy) -> Result<Self, PolicyError> {
        policy.validate()?;

        Ok(Self {
            policy,
            ..Default::default()
        })
    }

    pub fn policy(&self) -> &SortPolicy {
        &self.policy
    }

    pub fn summary(&self) -> SortSummary {
        self.summary
    }
}
