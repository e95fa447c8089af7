//! RGB565 framebuffer surface
//!
//! Allocated once, never resized. All writes are bounds-checked and
//! out-of-range coordinates are silently dropped.

use alloc::vec::Vec;

use crate::color::Rgb565;

/// Framebuffer allocation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SurfaceError {
    /// Width or height is zero
    InvalidDimensions,
    /// The heap could not provide the pixel storage
    AllocationFailed,
}

/// Owned W x H surface of packed RGB565 pixels, row-major
pub struct Framebuffer {
    pixels: Vec<u16>,
    width: u16,
    height: u16,
}

impl Framebuffer {
    /// Allocate a black framebuffer
    ///
    /// Uses a fallible reservation so an exhausted heap is reported
    /// instead of aborting.
    pub fn allocate(width: u16, height: u16) -> Result<Self, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::InvalidDimensions);
        }

        let len = width as usize * height as usize;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| SurfaceError::AllocationFailed)?;
        pixels.resize(len, 0);

        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Raw pixels for handing to a display
    pub fn as_slice(&self) -> &[u16] {
        &self.pixels
    }

    /// Read a pixel, `None` outside the surface
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Rgb565> {
        self.index(x, y).map(|idx| Rgb565(self.pixels[idx]))
    }

    /// Write a single pixel (no-op outside the surface)
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb565) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = color.0;
        }
    }

    /// Fill the inclusive span `[x1, x2]` of row `y`
    ///
    /// Endpoints may come in either order and are clipped to the surface.
    pub fn hline(&mut self, x1: i32, x2: i32, y: i32, color: Rgb565) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let (x1, x2) = if x1 > x2 { (x2, x1) } else { (x1, x2) };
        let x1 = x1.max(0);
        let x2 = x2.min(self.width as i32 - 1);
        if x1 > x2 {
            return;
        }

        let row = y as usize * self.width as usize;
        self.pixels[row + x1 as usize..=row + x2 as usize].fill(color.0);
    }

    /// Fill the whole surface
    ///
    /// Runs once per frame over every pixel, so it writes two pixels per
    /// store through 32-bit chunks.
    pub fn clear(&mut self, color: Rgb565) {
        let pair = [color.0, color.0];
        let mut chunks = self.pixels.chunks_exact_mut(2);
        for chunk in &mut chunks {
            chunk.copy_from_slice(&pair);
        }
        chunks.into_remainder().fill(color.0);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if (x as u32) < self.width as u32 && (y as u32) < self.height as u32 {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }
}
