//! Facebot - Animated Face Firmware
//!
//! Firmware for RP2040 boards driving a square SPI RGB565 panel with an
//! FT6336 or CST816S touch controller and a single push button. A host sends JSON
//! line commands over UART0; the board answers one status line per
//! command and reports touches and button edges.

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::UART0;
use embassy_rp::spi::{self, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::{Delay, Instant};
use embedded_alloc::LlffHeap as Heap;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use facebot_core::traits::DisplayControl;
use facebot_core::{FaceConfig, FaceEngine};
use facebot_protocol::Response;

use crate::budget::HEAP_SIZE;
use crate::button::GpioButton;
use crate::config::{parse_face_config, BoardConfig};
use crate::link::PipeLink;
use crate::panel::St7789;
use crate::tasks::BoardDispatcher;
use crate::touch::CapTouch;

mod budget;
mod button;
mod channels;
mod config;
mod link;
mod panel;
mod tasks;
mod touch;

// Heap allocator for the framebuffer
#[global_allocator]
static HEAP: Heap = Heap::empty();

/// Embedded face configuration (compiled into firmware)
/// Edit face.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../face.toml");

/// Panel size used when face.toml cannot be parsed
const FALLBACK_SIZE: u16 = 240;

/// Panel SPI clock
const SPI_FREQUENCY_HZ: u32 = 40_000_000;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 1024]> = StaticCell::new();

// Face loop state (must live forever for the task)
static DISPATCHER: StaticCell<BoardDispatcher> = StaticCell::new();
static ENGINE: StaticCell<FaceEngine> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Facebot firmware starting...");

    init_heap();

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let board = load_config();
    let width = board.face.width;
    let height = board.face.height;

    // Host UART (115200 baud default)
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 1024]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("UART initialized for host commands");

    // Panel on SPI1: SCK=GPIO10, MOSI=GPIO11, CS=GPIO9, DC=GPIO8, RST=GPIO12, BL=GPIO25
    let mut spi_config = spi::Config::default();
    spi_config.frequency = SPI_FREQUENCY_HZ;
    let spi = Spi::new_blocking_txonly(p.SPI1, p.PIN_10, p.PIN_11, spi_config);
    let mut panel = St7789::new(
        spi,
        Output::new(p.PIN_8, Level::Low),
        Output::new(p.PIN_9, Level::High),
        Output::new(p.PIN_12, Level::High),
        Output::new(p.PIN_25, Level::Low),
        Delay,
        width,
        height,
    );
    match panel.init() {
        Ok(()) => info!("Panel initialized ({}x{})", panel.width(), panel.height()),
        Err(e) => error!("Panel init failed: {:?}", e),
    }
    panel.set_backlight(board.backlight);

    // Touch on I2C0: SDA=GPIO4, SCL=GPIO5
    let touch = CapTouch::detect(
        I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c::Config::default()),
        width,
        height,
    );
    let touch_chip = touch.chip();

    // Button on GPIO15 to ground
    let button = GpioButton::new(Input::new(p.PIN_15, Pull::Up));

    let dispatcher = DISPATCHER.init(BoardDispatcher::new(PipeLink::new(), panel, touch, button));
    dispatcher.send(Response::Booting);

    if let Some(chip) = touch_chip {
        info!("Touch controller found: {:?}", chip);
        dispatcher.send(Response::Info("touch ready"));
    } else {
        warn!("Touch controller not responding");
        dispatcher.send(Response::Warning("touch not found"));
    }

    let seed = Instant::now().as_ticks() ^ 0xFACE_B07;
    let engine = match FaceEngine::new(board.face, seed) {
        Ok(engine) => engine,
        Err(e) => {
            // Only reachable with a fallback panel size
            error!("Face config rejected: {:?}", e);
            unwrap!(FaceEngine::new(FaceConfig::for_screen(FALLBACK_SIZE, FALLBACK_SIZE), seed))
        }
    };
    let engine = ENGINE.init(engine);

    engine.set_enabled(true);
    match engine.init(Instant::now().as_millis()) {
        Ok(()) => info!("Framebuffer allocated, face mode on"),
        Err(e) => {
            error!("Face init failed: {:?}", e);
            engine.set_enabled(false);
            dispatcher.send(Response::Warning("face init failed"));
        }
    }

    dispatcher.send(Response::Ready);

    spawner.spawn(tasks::uart_rx_task(rx)).unwrap();
    spawner.spawn(tasks::uart_tx_task(tx)).unwrap();
    spawner.spawn(tasks::face_loop_task(dispatcher, engine)).unwrap();

    info!("All tasks spawned");
}

/// Parse the embedded face.toml, falling back to the default face
fn load_config() -> BoardConfig {
    match parse_face_config(EMBEDDED_CONFIG) {
        Ok(board) => {
            info!(
                "Loaded face.toml: {}x{} @ {} ms/frame",
                board.face.width, board.face.height, board.face.timing.frame_ms
            );
            board
        }
        Err(e) => {
            error!("Failed to parse face.toml: {:?}", e);
            BoardConfig {
                face: FaceConfig::for_screen(FALLBACK_SIZE, FALLBACK_SIZE),
                backlight: true,
            }
        }
    }
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}
