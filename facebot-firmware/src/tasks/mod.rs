//! Embassy async tasks
//!
//! The UART tasks move bytes between the UART and the pipes; the face
//! loop task owns the renderer and everything that talks to the host.

pub mod face_loop;
pub mod uart_rx;
pub mod uart_tx;

pub use face_loop::{face_loop_task, BoardDispatcher};
pub use uart_rx::uart_rx_task;
pub use uart_tx::uart_tx_task;
