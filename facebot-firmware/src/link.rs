//! Host command link over UART0
//!
//! Received bytes arrive through [`COMMAND_PIPE`] from the UART receive
//! task. Outgoing lines are queued whole in [`RESPONSE_PIPE`] for the
//! UART transmit task; a line that does not fit is dropped so the face
//! loop never waits on the UART.

use defmt::*;

use facebot_core::traits::CommandLink;

use crate::channels::{COMMAND_PIPE, RESPONSE_PIPE};

/// Pipe-backed command link
pub struct PipeLink {
    dropped: u32,
}

impl PipeLink {
    pub fn new() -> Self {
        Self { dropped: 0 }
    }

    /// Lines dropped because the response pipe was full
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

/// Queue all of `bytes`; the caller checked there is room
fn push(mut bytes: &[u8]) {
    while !bytes.is_empty() {
        match RESPONSE_PIPE.try_write(bytes) {
            Ok(n) => bytes = &bytes[n..],
            Err(_) => break,
        }
    }
}

impl CommandLink for PipeLink {
    fn read_available(&mut self, buf: &mut [u8]) -> usize {
        COMMAND_PIPE.try_read(buf).unwrap_or(0)
    }

    fn write_line(&mut self, line: &str) {
        let needed = line.len() + 1;
        if RESPONSE_PIPE.free_capacity() < needed {
            self.dropped = self.dropped.wrapping_add(1);
            warn!("Response pipe full, dropped {} byte line", needed);
            return;
        }
        push(line.as_bytes());
        push(b"\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::RESPONSE_PIPE_SIZE;

    #[test]
    fn test_full_pipe_drops_whole_lines() {
        let mut link = PipeLink::new();
        let bytes = [b'x'; 99];
        let line = core::str::from_utf8(&bytes).unwrap();
        let fits = RESPONSE_PIPE_SIZE / 100;
        for _ in 0..fits {
            link.write_line(line);
        }
        assert_eq!(link.dropped(), 0);

        link.write_line(line);
        assert_eq!(link.dropped(), 1);
        // Nothing of the dropped line was queued
        assert_eq!(RESPONSE_PIPE.len(), fits * 100);
        RESPONSE_PIPE.clear();
    }
}
