//! Inter-task communication channels
//!
//! Defines the static primitives shared between Embassy tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::pipe::Pipe;

/// Capacity of the host command byte pipe
pub const COMMAND_PIPE_SIZE: usize = 1024;

/// Capacity of the outgoing response pipe (roughly 100 status lines)
pub const RESPONSE_PIPE_SIZE: usize = 2048;

/// Raw bytes received from the host UART, drained by the face loop
pub static COMMAND_PIPE: Pipe<CriticalSectionRawMutex, COMMAND_PIPE_SIZE> = Pipe::new();

/// Response and event lines queued by the face loop for the UART TX task
pub static RESPONSE_PIPE: Pipe<CriticalSectionRawMutex, RESPONSE_PIPE_SIZE> = Pipe::new();
