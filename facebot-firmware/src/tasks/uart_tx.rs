//! Host UART transmit task
//!
//! Drains queued response lines into the UART TX ring buffer.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use crate::channels::RESPONSE_PIPE;

/// Bytes moved per pipe read
const TX_CHUNK_SIZE: usize = 64;

/// UART TX task - writes host responses as the line drains
#[embassy_executor::task]
pub async fn uart_tx_task(mut tx: BufferedUartTx) {
    info!("UART TX task started");

    let mut buf = [0u8; TX_CHUNK_SIZE];

    loop {
        let n = RESPONSE_PIPE.read(&mut buf).await;
        if let Err(e) = tx.write_all(&buf[..n]).await {
            warn!("UART write failed: {:?}", e);
        }
    }
}
