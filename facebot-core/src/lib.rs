//! Board-agnostic core logic for the Facebot face display
//!
//! This crate contains everything that does not depend on a specific
//! panel, bus or microcontroller:
//!
//! - RGB565 colors and the face configuration types
//! - Framebuffer surface and scanline rasterization primitives
//! - Face animation: motion synthesis, heart particles, blinking
//! - The `FaceEngine` frame composer
//! - Hardware abstraction traits (frame sink, command link, touch, button)
//! - The cooperative dispatch loop that interleaves commands, input
//!   events and rendering on a single thread

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod color;
pub mod config;
pub mod dispatch;
pub mod face;
pub mod render;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use color::Rgb565;
pub use config::FaceConfig;
pub use dispatch::{Dispatcher, LoopReport};
pub use face::{FaceEngine, FaceError, FaceParameters};
pub use render::Framebuffer;
