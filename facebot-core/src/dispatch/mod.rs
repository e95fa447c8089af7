//! Cooperative dispatch loop
//!
//! One iteration services the command link, polls touch and button, and
//! gives the face engine a chance to render. Nothing in here blocks; the
//! engine's frame-rate limiter is the only pacing.

pub mod button;
pub mod controller;

pub use button::{ButtonDebouncer, ButtonEdge, DEBOUNCE_MS};
pub use controller::{Dispatcher, LoopReport, READ_BUDGET, TOUCH_COOLDOWN_MS};
