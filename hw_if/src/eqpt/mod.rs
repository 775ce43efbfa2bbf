//! # Equipment Interface
//!
//! This module defines the traits through which the robot software talks to its equipment. Every
//! call is treated as always succeeding hardware I/O; a backend which can fail must deal with it
//! internally.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod chassis;
pub mod pneumatic;
pub mod sensor;
pub mod spinner;
