//! In-memory hardware fakes for host tests

use std::collections::VecDeque;
use std::string::String;
use std::vec::Vec;

use crate::color::Rgb565;
use crate::traits::{ButtonInput, CommandLink, DisplayControl, FrameSink, TouchPoint, TouchSensor};

/// Display that records what it was asked to show
#[derive(Debug, Default)]
pub struct CapturedFrames {
    pub pushes: usize,
    pub last_frame: Vec<u16>,
    pub last_size: (u16, u16),
    pub fills: Vec<Rgb565>,
    pub backlight: Option<bool>,
}

impl CapturedFrames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgb565 {
        Rgb565(self.last_frame[y * self.last_size.0 as usize + x])
    }
}

impl FrameSink for CapturedFrames {
    fn push_frame(&mut self, pixels: &[u16], width: u16, height: u16) {
        self.pushes += 1;
        self.last_frame.clear();
        self.last_frame.extend_from_slice(pixels);
        self.last_size = (width, height);
    }
}

impl DisplayControl for CapturedFrames {
    fn fill(&mut self, color: Rgb565) {
        self.fills.push(color);
    }

    fn set_backlight(&mut self, on: bool) {
        self.backlight = Some(on);
    }
}

/// Link fed from a byte script, recording written lines
#[derive(Debug, Default)]
pub struct ScriptedLink {
    pub input: VecDeque<u8>,
    pub output: Vec<String>,
    /// Largest chunk handed out per read
    pub chunk: usize,
}

impl ScriptedLink {
    pub fn new() -> Self {
        Self {
            chunk: 64,
            ..Self::default()
        }
    }

    pub fn send(&mut self, text: &str) {
        self.input.extend(text.bytes());
    }

    pub fn take_output(&mut self) -> Vec<String> {
        core::mem::take(&mut self.output)
    }
}

impl CommandLink for ScriptedLink {
    fn read_available(&mut self, buf: &mut [u8]) -> usize {
        let n = buf.len().min(self.chunk).min(self.input.len());
        for slot in buf.iter_mut().take(n) {
            *slot = self.input.pop_front().unwrap_or(0);
        }
        n
    }

    fn write_line(&mut self, line: &str) {
        self.output.push(line.into());
    }
}

/// Touch controller reporting whatever the test sets
#[derive(Debug, Default)]
pub struct ScriptedTouch {
    pub point: Option<TouchPoint>,
}

impl TouchSensor for ScriptedTouch {
    fn read_touch(&mut self) -> Option<TouchPoint> {
        self.point
    }
}

/// Button held in whatever state the test sets
#[derive(Debug, Default)]
pub struct ScriptedButton {
    pub pressed: bool,
}

impl ButtonInput for ScriptedButton {
    fn is_pressed(&mut self) -> bool {
        self.pressed
    }
}
