//! Device responses.
//!
//! Every command is answered with exactly one status line. Boot progress
//! and warnings use the same shape so hosts need a single decoder.

use heapless::String;
use serde::Serialize;

/// Maximum encoded length of a response or event line
pub const RESPONSE_CAPACITY: usize = 128;

/// One encoded line, without the trailing newline
pub type ResponseLine = String<RESPONSE_CAPACITY>;

/// Errors that can occur while encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Encoded message does not fit in `RESPONSE_CAPACITY`
    BufferTooSmall,
}

/// Face state reported by the `status` command
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusReport {
    pub face: bool,
    pub mouth: f32,
    pub love: f32,
    pub blinking: bool,
}

/// A status line sent to the host
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response<'a> {
    /// Command applied
    Ok,
    /// Boot finished, commands accepted
    Ready,
    /// Firmware starting
    Booting,
    /// Command rejected
    Error(&'a str),
    /// Degraded but running
    Warning(&'a str),
    /// Informational boot message
    Info(&'a str),
    /// Answer to `status`
    Status(StatusReport),
}

#[derive(Serialize)]
struct Message<'a> {
    status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    msg: Option<&'a str>,
}

#[derive(Serialize)]
struct StatusMessage {
    status: &'static str,
    face: bool,
    mouth: f32,
    love: f32,
    blinking: bool,
}

impl Response<'_> {
    /// Encode as a single JSON line
    pub fn encode(&self) -> Result<ResponseLine, EncodeError> {
        let (status, msg) = match *self {
            Response::Ok => ("ok", None),
            Response::Ready => ("ready", None),
            Response::Booting => ("booting", None),
            Response::Error(msg) => ("error", Some(msg)),
            Response::Warning(msg) => ("warning", Some(msg)),
            Response::Info(msg) => ("info", Some(msg)),
            Response::Status(report) => {
                return to_line(&StatusMessage {
                    status: "ok",
                    face: report.face,
                    mouth: report.mouth,
                    love: report.love,
                    blinking: report.blinking,
                })
            }
        };
        to_line(&Message { status, msg })
    }
}

pub(crate) fn to_line<T: Serialize>(value: &T) -> Result<ResponseLine, EncodeError> {
    serde_json_core::to_string::<_, RESPONSE_CAPACITY>(value).map_err(|_| EncodeError::BufferTooSmall)
}
