//! # Sensor Equipment

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// An optical sensor reporting the hue of the object in front of it.
pub trait HueSensor {
    /// Read the current hue in degrees.
    ///
    /// A healthy sensor reports a value in `[0, 360)`. A disconnected or faulty sensor may report
    /// anything, including NaN, and callers must not assume the range holds.
    fn read_hue(&mut self) -> f64;
}

impl<T: HueSensor + ?Sized> HueSensor for Box<T> {
    fn read_hue(&mut self) -> f64 {
        (**self).read_hue()
    }
}
