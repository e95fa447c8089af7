//! Capacitive touch controllers
//!
//! Polled over I2C; the interrupt line is not used. Boards ship with
//! either an FT6336 or a CST816S, so the controller is detected at boot.
//! Both report the touch count followed by the 12-bit X/Y of the first
//! point in consecutive registers.

use defmt::*;
use embedded_hal::i2c::I2c;

use facebot_core::traits::{TouchPoint, TouchSensor};

/// Supported touch controller chips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchChip {
    Ft6336,
    Cst816s,
}

impl TouchChip {
    /// Touch count register; P1 XH, XL, YH, YL follow it
    const fn status_reg(self) -> u8 {
        match self {
            TouchChip::Ft6336 => 0x02,
            TouchChip::Cst816s => 0x03,
        }
    }
}

/// Detection order: FT6336 first, then both CST816S addresses
const CANDIDATES: [(TouchChip, u8); 3] = [
    (TouchChip::Ft6336, 0x38),
    (TouchChip::Cst816s, 0x15),
    (TouchChip::Cst816s, 0x14),
];

/// Touch controller found on the bus, if any
pub struct CapTouch<I2C> {
    i2c: I2C,
    found: Option<(TouchChip, u8)>,
    width: u16,
    height: u16,
}

impl<I2C: I2c> CapTouch<I2C> {
    /// Try the known addresses; reported points are clamped to
    /// `width` x `height`
    ///
    /// Without a controller every read reports no touch.
    pub fn detect(mut i2c: I2C, width: u16, height: u16) -> Self {
        let found = CANDIDATES.into_iter().find(|&(chip, addr)| {
            let mut status = [0u8; 1];
            i2c.write_read(addr, &[chip.status_reg()], &mut status).is_ok()
        });
        Self {
            i2c,
            found,
            width,
            height,
        }
    }

    /// Detected chip
    pub fn chip(&self) -> Option<TouchChip> {
        self.found.map(|(chip, _)| chip)
    }

    fn read_point(&mut self) -> Result<Option<TouchPoint>, I2C::Error> {
        let Some((chip, addr)) = self.found else {
            return Ok(None);
        };
        let mut regs = [0u8; 5];
        self.i2c.write_read(addr, &[chip.status_reg()], &mut regs)?;
        Ok(decode_point(&regs, self.width, self.height))
    }
}

/// Decode touch count..P1 YL into the first touch point
fn decode_point(regs: &[u8; 5], width: u16, height: u16) -> Option<TouchPoint> {
    let touches = regs[0] & 0x0F;
    if touches == 0 || touches > 2 {
        return None;
    }
    let x = (((regs[1] & 0x0F) as u16) << 8) | regs[2] as u16;
    let y = (((regs[3] & 0x0F) as u16) << 8) | regs[4] as u16;
    Some(TouchPoint {
        x: x.min(width.saturating_sub(1)),
        y: y.min(height.saturating_sub(1)),
    })
}

impl<I2C: I2c> TouchSensor for CapTouch<I2C> {
    fn read_touch(&mut self) -> Option<TouchPoint> {
        match self.read_point() {
            Ok(point) => point,
            Err(_) => {
                trace!("Touch read failed");
                None
            }
        }
    }
}
