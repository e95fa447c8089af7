//! Display traits

use crate::color::Rgb565;

/// Receives composed frames
///
/// Called once per rendered tick with the whole framebuffer in row-major
/// order. The call must finish with the pixel data before returning; the
/// next tick redraws the same buffer.
pub trait FrameSink {
    fn push_frame(&mut self, pixels: &[u16], width: u16, height: u16);
}

impl<T: FrameSink + ?Sized> FrameSink for &mut T {
    fn push_frame(&mut self, pixels: &[u16], width: u16, height: u16) {
        (**self).push_frame(pixels, width, height)
    }
}

/// A panel that can also be driven outside face mode
pub trait DisplayControl: FrameSink {
    /// Fill the whole panel with one colour
    fn fill(&mut self, color: Rgb565);

    /// Switch the backlight
    fn set_backlight(&mut self, on: bool);
}
