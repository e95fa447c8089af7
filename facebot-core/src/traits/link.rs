//! Host command link

/// Byte stream to and from the host
pub trait CommandLink {
    /// Copy received bytes into `buf` without waiting
    ///
    /// Returns the number of bytes copied, 0 when nothing is pending.
    fn read_available(&mut self, buf: &mut [u8]) -> usize;

    /// Send one line; the newline is appended by the link
    fn write_line(&mut self, line: &str);
}
