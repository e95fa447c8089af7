//! Input device traits

/// A touch position in panel pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchPoint {
    pub x: u16,
    pub y: u16,
}

/// Touch controller
pub trait TouchSensor {
    /// Current touch, if the panel is touched
    ///
    /// Bus errors read as no touch.
    fn read_touch(&mut self) -> Option<TouchPoint>;
}

/// User button
pub trait ButtonInput {
    /// Raw pressed state, already corrected for active-low wiring
    fn is_pressed(&mut self) -> bool;
}

/// Boards without a touch controller
impl TouchSensor for () {
    fn read_touch(&mut self) -> Option<TouchPoint> {
        None
    }
}

/// Boards without a button
impl ButtonInput for () {
    fn is_pressed(&mut self) -> bool {
        false
    }
}
