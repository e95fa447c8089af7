//! Dispatcher: one loop iteration of the device
//!
//! Order within an iteration is fixed: commands, touch, button, render.
//! Every command line gets exactly one response line, written before any
//! event produced in the same iteration.

use facebot_protocol::{Command, DeviceEvent, LineParser, Response, StatusReport};

use super::button::{ButtonDebouncer, ButtonEdge};
use crate::color::Rgb565;
use crate::face::FaceEngine;
use crate::traits::{ButtonInput, CommandLink, DisplayControl, TouchSensor};

/// Touches closer together than this report only once
pub const TOUCH_COOLDOWN_MS: u64 = 500;

/// Most link bytes consumed per iteration, so a flooding host cannot
/// starve rendering
pub const READ_BUDGET: usize = 1024;

const READ_CHUNK: usize = 64;

/// What one iteration did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoopReport {
    /// Lines answered (including rejected ones)
    pub commands: u16,
    /// Input events sent
    pub events: u16,
    /// A frame was pushed to the display
    pub rendered: bool,
}

/// Owns the peripherals around the face engine
pub struct Dispatcher<L, D, T, B> {
    link: L,
    display: D,
    touch: T,
    button: B,
    parser: LineParser,
    debouncer: ButtonDebouncer,
    last_touch_ms: Option<u64>,
}

impl<L, D, T, B> Dispatcher<L, D, T, B>
where
    L: CommandLink,
    D: DisplayControl,
    T: TouchSensor,
    B: ButtonInput,
{
    pub fn new(link: L, display: D, touch: T, mut button: B) -> Self {
        // A button held through boot is not a press
        let debouncer = ButtonDebouncer::default().with_initial(button.is_pressed());
        Self {
            link,
            display,
            touch,
            button,
            parser: LineParser::new(),
            debouncer,
            last_touch_ms: None,
        }
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Write a status line to the host
    pub fn send(&mut self, response: Response<'_>) {
        match response.encode() {
            Ok(line) => self.link.write_line(&line),
            Err(_err) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("response dropped: {}", _err);
            }
        }
    }

    /// Write an input event to the host
    pub fn emit(&mut self, event: DeviceEvent) {
        match event.encode() {
            Ok(line) => self.link.write_line(&line),
            Err(_err) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("event dropped: {}", _err);
            }
        }
    }

    /// Run one loop iteration
    pub fn run_once(&mut self, engine: &mut FaceEngine, now_ms: u64) -> LoopReport {
        let mut report = LoopReport {
            commands: self.service_link(engine),
            ..LoopReport::default()
        };

        if self.poll_touch(now_ms) {
            report.events += 1;
        }
        if self.poll_button(now_ms) {
            report.events += 1;
        }

        report.rendered = engine.tick(now_ms, &mut self.display);
        report
    }

    fn service_link(&mut self, engine: &mut FaceEngine) -> u16 {
        let mut buf = [0u8; READ_CHUNK];
        let mut consumed = 0;
        let mut answered = 0u16;

        while consumed < READ_BUDGET {
            let n = self.link.read_available(&mut buf);
            if n == 0 {
                break;
            }
            consumed += n;

            for &byte in &buf[..n] {
                match self.parser.feed(byte) {
                    Ok(Some(line)) => {
                        self.handle_line(engine, &line);
                        answered = answered.saturating_add(1);
                    }
                    Ok(None) => {}
                    Err(err) => {
                        #[cfg(feature = "defmt")]
                        defmt::warn!("command line rejected: {}", err);
                        self.send(Response::Error(err.message()));
                        answered = answered.saturating_add(1);
                    }
                }
            }
        }
        answered
    }

    fn handle_line(&mut self, engine: &mut FaceEngine, line: &[u8]) {
        let response = match Command::parse(line) {
            Ok(command) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("command: {}", command.name());
                self.apply(engine, command)
            }
            Err(err) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("bad command: {}", err);
                Response::Error(err.message())
            }
        };
        self.send(response);
    }

    fn apply(&mut self, engine: &mut FaceEngine, command: Command) -> Response<'static> {
        match command {
            Command::Face { on } => {
                engine.set_enabled(on);
                if !on {
                    self.display.fill(Rgb565::BLACK);
                }
            }
            Command::Mouth { open } => engine.set_mouth(open),
            Command::Love { value } => engine.set_love(value),
            Command::Blink => {
                if !engine.trigger_blink() {
                    #[cfg(feature = "defmt")]
                    defmt::trace!("blink ignored, already blinking");
                }
            }
            Command::Clear { color } => {
                let fill = color
                    .as_deref()
                    .and_then(Rgb565::from_hex)
                    .unwrap_or(Rgb565::BLACK);
                self.display.fill(fill);
            }
            Command::Backlight { on } => self.display.set_backlight(on),
            Command::Status => {
                return Response::Status(StatusReport {
                    face: engine.is_enabled(),
                    mouth: engine.mouth(),
                    love: engine.love(),
                    blinking: engine.is_blinking(),
                })
            }
        }
        Response::Ok
    }

    fn poll_touch(&mut self, now_ms: u64) -> bool {
        let Some(point) = self.touch.read_touch() else {
            return false;
        };
        let cooled = self
            .last_touch_ms
            .map_or(true, |last| now_ms.saturating_sub(last) > TOUCH_COOLDOWN_MS);
        if !cooled {
            return false;
        }
        self.last_touch_ms = Some(now_ms);
        self.emit(DeviceEvent::Touch {
            x: point.x,
            y: point.y,
        });
        true
    }

    fn poll_button(&mut self, now_ms: u64) -> bool {
        let pressed = self.button.is_pressed();
        match self.debouncer.update(pressed, now_ms) {
            Some(ButtonEdge::Pressed) => self.emit(DeviceEvent::ButtonDown),
            Some(ButtonEdge::Released) => self.emit(DeviceEvent::ButtonUp),
            None => return false,
        }
        true
    }
}
