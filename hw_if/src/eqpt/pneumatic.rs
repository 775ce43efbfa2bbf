//! # Pneumatic Equipment

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A single acting pneumatic piston, such as the scraper.
pub trait Pneumatic {
    /// Extend (`true`) or retract (`false`) the piston.
    fn set_extended(&mut self, extended: bool);

    /// Returns true if the piston was last commanded to extend.
    fn is_extended(&self) -> bool;
}
