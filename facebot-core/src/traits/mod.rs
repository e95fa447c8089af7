//! Hardware abstraction traits
//!
//! These traits define the interface between the face logic and
//! board-specific implementations. Host tests substitute in-memory fakes.

pub mod display;
pub mod input;
pub mod link;

pub use display::{DisplayControl, FrameSink};
pub use input::{ButtonInput, TouchPoint, TouchSensor};
pub use link::CommandLink;
