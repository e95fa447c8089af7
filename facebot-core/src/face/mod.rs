//! Face animation
//!
//! The `FaceEngine` owns the framebuffer and all animation state and
//! composes one frame per tick:
//!
//! ```text
//! clear → eyes (blink squash, drifting pupils) → mouth → hearts → push
//! ```
//!
//! Motion, blinking and the heart pool are separate modules so each can be
//! tested without rendering.

pub mod blink;
pub mod engine;
pub mod hearts;
pub mod motion;
pub mod params;

pub use blink::{blink_factor, Blink, BlinkPhase};
pub use engine::{FaceEngine, MouthShape};
pub use hearts::{HeartParticle, HeartPool, MAX_HEARTS};
pub use motion::{float_offset, FloatParams};
pub use params::FaceParameters;

use crate::config::ConfigError;
use crate::render::SurfaceError;

/// Errors that can occur setting up the face engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaceError {
    /// Framebuffer memory could not be obtained
    AllocationFailed,
    /// Framebuffer size does not match the configuration
    InvalidDimensions,
    /// Configuration rejected by `FaceConfig::validate`
    InvalidConfig(ConfigError),
}

impl From<SurfaceError> for FaceError {
    fn from(err: SurfaceError) -> Self {
        match err {
            SurfaceError::AllocationFailed => FaceError::AllocationFailed,
            SurfaceError::InvalidDimensions => FaceError::InvalidDimensions,
        }
    }
}

impl From<ConfigError> for FaceError {
    fn from(err: ConfigError) -> Self {
        FaceError::InvalidConfig(err)
    }
}
