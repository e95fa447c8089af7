//! User button on a GPIO pin

use embassy_rp::gpio::Input;

use facebot_core::traits::ButtonInput;

/// Active-low push button with the internal pull-up enabled
pub struct GpioButton {
    pin: Input<'static>,
}

impl GpioButton {
    pub fn new(pin: Input<'static>) -> Self {
        Self { pin }
    }
}

impl ButtonInput for GpioButton {
    fn is_pressed(&mut self) -> bool {
        self.pin.is_low()
    }
}
