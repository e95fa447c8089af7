//! Face loop task
//!
//! Runs the cooperative dispatch loop: host commands, touch and button
//! events, then at most one rendered frame per iteration.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_rp::i2c::{Blocking as I2cBlocking, I2c};
use embassy_rp::peripherals::{I2C0, SPI1};
use embassy_rp::spi::{Blocking as SpiBlocking, Spi};
use embassy_time::{Delay, Instant, Timer};

use facebot_core::{Dispatcher, FaceEngine};

use crate::button::GpioButton;
use crate::link::PipeLink;
use crate::panel::St7789;
use crate::touch::CapTouch;

/// Panel driver as wired on the board
pub type BoardPanel = St7789<Spi<'static, SPI1, SpiBlocking>, Output<'static>, Delay>;

/// Touch controller as wired on the board
pub type BoardTouch = CapTouch<I2c<'static, I2C0, I2cBlocking>>;

/// Dispatcher over the board peripherals
pub type BoardDispatcher = Dispatcher<PipeLink, BoardPanel, BoardTouch, GpioButton>;

/// Idle delay while face mode is off
const IDLE_DELAY_MS: u64 = 1;

/// Milliseconds since boot
fn now_ms() -> u64 {
    Instant::now().as_millis()
}

/// Face loop task - never returns
#[embassy_executor::task]
pub async fn face_loop_task(
    dispatcher: &'static mut BoardDispatcher,
    engine: &'static mut FaceEngine,
) {
    info!("Face loop task started");

    let mut last_report_ms = now_ms();
    let mut last_frames = engine.frame_count();

    loop {
        let report = dispatcher.run_once(engine, now_ms());

        if report.commands > 0 {
            debug!("Handled {} command(s)", report.commands);
        }

        let now = now_ms();
        if now.wrapping_sub(last_report_ms) >= 10_000 {
            let frames = engine.frame_count();
            debug!(
                "{} frames in 10 s, {} hearts, {} replies dropped",
                frames.wrapping_sub(last_frames),
                engine.active_hearts(),
                dispatcher.link_mut().dropped()
            );
            last_frames = frames;
            last_report_ms = now;
        }

        if engine.is_enabled() {
            // Let the UART task refill the pipe between frames
            embassy_futures::yield_now().await;
        } else {
            Timer::after_millis(IDLE_DELAY_MS).await;
        }
    }
}
