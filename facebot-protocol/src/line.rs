//! Line framing for the command stream.
//!
//! Bytes accumulate until a newline. Surrounding whitespace (including the
//! `\r` of CRLF line endings) is stripped and blank lines are skipped.
//! A line longer than the buffer is reported once and the rest of it is
//! discarded up to the next newline.

use heapless::Vec;

/// Maximum line length in bytes
pub const LINE_CAPACITY: usize = 512;

/// One complete, trimmed, non-empty line
pub type Line = Vec<u8, LINE_CAPACITY>;

/// Errors that can occur during line framing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line exceeded `LINE_CAPACITY` bytes
    LineTooLong,
}

impl LineError {
    /// Message reported to the host
    pub fn message(&self) -> &'static str {
        match self {
            LineError::LineTooLong => "line too long",
        }
    }
}

/// Accumulates bytes into lines
#[derive(Debug, Clone, Default)]
pub struct LineParser {
    buffer: Line,
    discarding: bool,
}

impl LineParser {
    /// Create a new line parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop any partial line
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }

    /// Number of bytes buffered for the current line
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(line))` when a newline completes a non-empty line,
    /// `Ok(None)` when more bytes are needed, or `Err` the moment a line
    /// overflows the buffer.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Line>, LineError> {
        if byte == b'\n' {
            if self.discarding {
                self.discarding = false;
                return Ok(None);
            }
            let line = match self.buffer.trim_ascii() {
                [] => None,
                text => Vec::from_slice(text).ok(),
            };
            self.buffer.clear();
            return Ok(line);
        }

        if self.discarding {
            return Ok(None);
        }

        if self.buffer.push(byte).is_err() {
            self.buffer.clear();
            self.discarding = true;
            return Err(LineError::LineTooLong);
        }
        Ok(None)
    }
}
