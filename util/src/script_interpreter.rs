//! # Driver input script interpreter module
//!
//! This module provides an interpreter for driver input scripts, allowing a
//! teleop session to be replayed without a physical controller.
//!
//! A script contains one entry per line in the form `<time_s>: <json>;` where
//! the JSON payload is a [`ControllerState`]. For example:
//!
//! ```text
//! 0.0: {};
//! 1.5: {"left_y": 80, "right_y": 80, "r1": true};
//! 4.0: {"l2": true};
//! 6.0: {};
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::fs;
use regex::RegexBuilder;
use thiserror::Error;

// Internal
use hw_if::input::{ControllerState, InputParseError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A controller state which is scripted to occur at a specific time.
struct Entry {
    /// The time the state becomes active at
    exec_time_s: f64,

    /// The controller state
    state: ControllerState
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use
/// `.get_pending` to acquire the controller state that is now active.
pub struct ScriptInterpreter {
    _script_path: PathBuf,
    entries: VecDeque<Entry>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0}")]
    ScriptNotFound(String),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)")]
    InvalidTimestamp(String),

    #[error("Script contains an invalid controller state at {0} s: {1}")]
    InvalidInput(f64, InputParseError),

    #[error("Script timestamps must be increasing, found {1} s after {0} s")]
    OutOfOrder(f64, f64)
}

/// Result of polling the interpreter.
#[derive(Debug, PartialEq)]
pub enum PendingInput {
    /// No new controller state since the last poll.
    None,

    /// The most recent controller state whose time has elapsed.
    Some(ControllerState),

    /// All entries have been consumed.
    EndOfScript
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScriptInterpreter {

    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {

        let path = PathBuf::from(script_path.as_ref());

        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(path.display().to_string()));
        }

        let script = fs::read_to_string(&path)
            .map_err(ScriptError::ScriptLoadError)?;

        let mut interp = Self::from_str(&script)?;
        interp._script_path = path;

        Ok(interp)
    }

    /// Create a new interpreter from the contents of a script.
    pub fn from_str(script: &str) -> Result<Self, ScriptError> {
        let mut entries: VecDeque<Entry> = VecDeque::new();

        // Go through the script executing __the magic regex__.
        let re = RegexBuilder::
            new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
            .expect("Script regex is invalid");

        for cap in re.captures_iter(script) {
            let exec_time_s: f64 = cap[1]
                .parse()
                .map_err(|e| ScriptError::InvalidTimestamp(format!("{}", e)))?;

            let state = ControllerState::from_json(&cap[3])
                .map_err(|e| ScriptError::InvalidInput(exec_time_s, e))?;

            if let Some(prev) = entries.back() {
                if exec_time_s < prev.exec_time_s {
                    return Err(ScriptError::OutOfOrder(prev.exec_time_s, exec_time_s))
                }
            }

            entries.push_back(Entry {
                exec_time_s,
                state
            });
        }

        if entries.is_empty() {
            return Err(ScriptError::ScriptEmpty)
        }

        Ok(ScriptInterpreter {
            _script_path: PathBuf::new(),
            entries
        })
    }

    /// Return the newest controller state whose time is earlier than
    /// `current_time_s`, skipping any states which were superseded since the
    /// last poll.
    pub fn get_pending(&mut self, current_time_s: f64) -> PendingInput {

        if self.entries.is_empty() {
            return PendingInput::EndOfScript
        }

        let mut latest = None;

        while let Some(entry) = self.entries.front() {
            if entry.exec_time_s > current_time_s {
                break;
            }
            latest = self.entries.pop_front().map(|e| e.state);
        }

        match latest {
            Some(s) => PendingInput::Some(s),
            None => PendingInput::None
        }
    }

    /// Get the number of entries remaining in the script
    pub fn get_num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.entries.back() {
            Some(e) => e.exec_time_s,
            None => 0f64
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const SCRIPT: &str = "
        0.0: {};
        1.0: {\"left_y\": 80, \"right_y\": 80, \"r1\": true};
        1.5: {\"l2\": true};
        3.0: {};
    ";

    #[test]
    fn test_parse_script() {
        let si = ScriptInterpreter::from_str(SCRIPT).unwrap();
        assert_eq!(si.get_num_entries(), 4);
        assert_eq!(si.get_duration(), 3.0);
    }

    #[test]
    fn test_pending_returns_latest() {
        let mut si = ScriptInterpreter::from_str(SCRIPT).unwrap();

        assert_eq!(si.get_pending(0.5), PendingInput::Some(ControllerState::default()));
        assert_eq!(si.get_pending(0.6), PendingInput::None);

        // Both the 1.0 and 1.5 entries have elapsed, only the newest is returned
        match si.get_pending(2.0) {
            PendingInput::Some(s) => {
                assert!(s.l2);
                assert!(!s.r1);
            },
            p => panic!("Expected a controller state, got {:?}", p)
        }

        assert_eq!(si.get_pending(3.0), PendingInput::Some(ControllerState::default()));
        assert_eq!(si.get_pending(3.1), PendingInput::EndOfScript);
    }

    #[test]
    fn test_empty_script() {
        assert!(matches!(
            ScriptInterpreter::from_str("# nothing here"),
            Err(ScriptError::ScriptEmpty)
        ));
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(
            ScriptInterpreter::from_str("1.0: {\"left_y\": \"up\"};"),
            Err(ScriptError::InvalidInput(t, _)) if t == 1.0
        ));
    }

    #[test]
    fn test_out_of_order() {
        assert!(matches!(
            ScriptInterpreter::from_str("2.0: {};\n1.0: {};"),
            Err(ScriptError::OutOfOrder(_, _))
        ));
    }
}
