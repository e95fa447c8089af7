//! ST7789 RGB565 panel driver
//!
//! Driver for ST7789-based SPI TFT panels in 16-bit colour mode. The
//! whole framebuffer is streamed on every frame; the panel keeps no
//! shadow copy.

use defmt::*;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use facebot_core::traits::{DisplayControl, FrameSink};
use facebot_core::Rgb565;

/// Pixels converted to big-endian bytes per SPI transfer
const CHUNK_PIXELS: usize = 256;

/// ST7789 commands
#[allow(dead_code)]
mod cmd {
    pub const SWRESET: u8 = 0x01;
    pub const SLPOUT: u8 = 0x11;
    pub const NORON: u8 = 0x13;
    pub const INVON: u8 = 0x21;
    pub const DISPOFF: u8 = 0x28;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const RASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const COLMOD: u8 = 0x3A;
}

/// COLMOD value for 16 bits per pixel
const COLMOD_RGB565: u8 = 0x55;

/// ST7789 panel on a blocking SPI bus
pub struct St7789<SPI, PIN, DELAY> {
    spi: SPI,
    dc: PIN,
    cs: PIN,
    rst: PIN,
    backlight: PIN,
    delay: DELAY,
    width: u16,
    height: u16,
    chunk: [u8; CHUNK_PIXELS * 2],
}

impl<SPI, PIN, DELAY> St7789<SPI, PIN, DELAY>
where
    SPI: SpiBus,
    PIN: OutputPin,
    DELAY: DelayNs,
{
    /// Create a new driver for a `width` x `height` panel
    pub fn new(
        spi: SPI,
        dc: PIN,
        cs: PIN,
        rst: PIN,
        backlight: PIN,
        delay: DELAY,
        width: u16,
        height: u16,
    ) -> Self {
        Self {
            spi,
            dc,
            cs,
            rst,
            backlight,
            delay,
            width,
            height,
            chunk: [0; CHUNK_PIXELS * 2],
        }
    }

    /// Initialize the panel
    ///
    /// Leaves the panel on, blanked to black, with the backlight off.
    pub fn init(&mut self) -> Result<(), SPI::Error> {
        let _ = self.backlight.set_low();
        let _ = self.cs.set_high();

        let _ = self.rst.set_low();
        self.delay.delay_ms(10);
        let _ = self.rst.set_high();
        self.delay.delay_ms(120);

        self.command(cmd::SWRESET, &[])?;
        self.delay.delay_ms(150);
        self.command(cmd::SLPOUT, &[])?;
        self.delay.delay_ms(120);
        self.command(cmd::COLMOD, &[COLMOD_RGB565])?;
        self.command(cmd::MADCTL, &[0x00])?;
        // IPS panels need inversion for correct colours
        self.command(cmd::INVON, &[])?;
        self.command(cmd::NORON, &[])?;
        self.delay.delay_ms(10);

        self.write_fill(Rgb565::BLACK)?;
        self.command(cmd::DISPON, &[])?;
        self.delay.delay_ms(20);
        Ok(())
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Send a command with optional parameter bytes
    fn command(&mut self, command: u8, params: &[u8]) -> Result<(), SPI::Error> {
        let _ = self.cs.set_low();
        let _ = self.dc.set_low();
        let result = self.spi.write(&[command]).and_then(|_| {
            if params.is_empty() {
                return Ok(());
            }
            let _ = self.dc.set_high();
            self.spi.write(params)
        });
        let result = result.and_then(|_| self.spi.flush());
        let _ = self.cs.set_high();
        result
    }

    /// Set the drawing window and start a RAM write
    fn set_window(&mut self, x1: u16, y1: u16, x2: u16, y2: u16) -> Result<(), SPI::Error> {
        let [x1h, x1l] = x1.to_be_bytes();
        let [x2h, x2l] = x2.to_be_bytes();
        let [y1h, y1l] = y1.to_be_bytes();
        let [y2h, y2l] = y2.to_be_bytes();
        self.command(cmd::CASET, &[x1h, x1l, x2h, x2l])?;
        self.command(cmd::RASET, &[y1h, y1l, y2h, y2l])?;
        self.command(cmd::RAMWR, &[])
    }

    /// Stream pixels into the current window
    fn write_pixels(&mut self, mut pixels: impl Iterator<Item = u16>) -> Result<(), SPI::Error> {
        let _ = self.cs.set_low();
        let _ = self.dc.set_high();
        let result = loop {
            let mut len = 0;
            for (slot, pixel) in self.chunk.chunks_exact_mut(2).zip(pixels.by_ref()) {
                slot.copy_from_slice(&pixel.to_be_bytes());
                len += 2;
            }
            if len == 0 {
                break self.spi.flush();
            }
            if let Err(e) = self.spi.write(&self.chunk[..len]) {
                break Err(e);
            }
        };
        let _ = self.cs.set_high();
        result
    }

    fn write_frame(&mut self, pixels: &[u16], width: u16, height: u16) -> Result<(), SPI::Error> {
        let width = width.min(self.width);
        let height = height.min(self.height);
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.set_window(0, 0, width - 1, height - 1)?;
        self.write_pixels(pixels.iter().copied())
    }

    fn write_fill(&mut self, color: Rgb565) -> Result<(), SPI::Error> {
        let count = self.width as usize * self.height as usize;
        self.set_window(0, 0, self.width - 1, self.height - 1)?;
        self.write_pixels(core::iter::repeat(color.raw()).take(count))
    }
}

impl<SPI, PIN, DELAY> FrameSink for St7789<SPI, PIN, DELAY>
where
    SPI: SpiBus,
    PIN: OutputPin,
    DELAY: DelayNs,
{
    fn push_frame(&mut self, pixels: &[u16], width: u16, height: u16) {
        if self.write_frame(pixels, width, height).is_err() {
            warn!("Panel SPI write failed, frame dropped");
        }
    }
}

impl<SPI, PIN, DELAY> DisplayControl for St7789<SPI, PIN, DELAY>
where
    SPI: SpiBus,
    PIN: OutputPin,
    DELAY: DelayNs,
{
    fn fill(&mut self, color: Rgb565) {
        if self.write_fill(color).is_err() {
            warn!("Panel SPI write failed during fill");
        }
    }

    fn set_backlight(&mut self, on: bool) {
        let result = if on {
            self.backlight.set_high()
        } else {
            self.backlight.set_low()
        };
        if result.is_err() {
            warn!("Backlight pin write failed");
        }
    }
}
