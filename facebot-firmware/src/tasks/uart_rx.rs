//! Host UART receive task
//!
//! Moves received bytes into the command pipe. Line framing happens in
//! the face loop, so this task never inspects the data.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use crate::channels::COMMAND_PIPE;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// UART RX task - forwards host bytes to the face loop
#[embassy_executor::task]
pub async fn uart_rx_task(mut rx: BufferedUartRx) {
    info!("UART RX task started");

    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);
                // Waits while the face loop catches up
                COMMAND_PIPE.write_all(&buf[..n]).await;
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}
