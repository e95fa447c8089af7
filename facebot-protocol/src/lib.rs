//! Facebot Command Protocol
//!
//! This crate defines the text protocol between the host and the face
//! display. Every message is one JSON object terminated by a newline:
//!
//! ```text
//! host  → device   {"cmd":"mouth","open":0.6}\n
//! device → host    {"status":"ok"}\n
//! device → host    {"event":"touch","x":120,"y":88}\n
//! ```
//!
//! Each command gets exactly one response line. Input events are written
//! asynchronously between responses.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod events;
pub mod line;
pub mod response;

pub use command::{Command, CommandError, COLOR_CAPACITY};
pub use events::DeviceEvent;
pub use line::{Line, LineError, LineParser, LINE_CAPACITY};
pub use response::{EncodeError, Response, ResponseLine, StatusReport, RESPONSE_CAPACITY};
