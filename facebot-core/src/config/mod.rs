//! Face configuration types
//!
//! Board-agnostic configuration for the face renderer. The defaults describe
//! the reference 480x480 panel; `FaceConfig::for_screen` fits the same face
//! onto smaller or non-square panels.

pub mod types;

pub use types::*;
