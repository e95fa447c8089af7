//! Framebuffer surface and rasterization primitives
//!
//! Everything the face draws goes through these: a bounds-checked RGB565
//! surface and a handful of scanline fill routines over it.

pub mod framebuffer;
pub mod raster;

pub use framebuffer::{Framebuffer, SurfaceError};
pub use raster::{fill_circle, fill_ellipse, fill_heart, smile_arc};
