//! Configuration type definitions
//!
//! Every tunable the renderer reads lives here so boards can override
//! palette, geometry and timing without touching the animation code.

use crate::color::Rgb565;
use crate::face::hearts::MAX_HEARTS;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Side length of the reference panel the default layout was drawn for
pub const REFERENCE_SIZE: u16 = 480;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Width or height is zero
    ZeroDimension,
    /// Frame interval is zero
    ZeroFrameInterval,
    /// Blink duration is zero
    ZeroBlinkDuration,
    /// More visible hearts requested than the pool holds
    TooManyHearts,
    /// A random spawn range is empty
    EmptyRange,
}

/// Integer pixel position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Face colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Palette {
    /// Dark navy backdrop
    pub background: Rgb565,
    pub eye_white: Rgb565,
    pub pupil: Rgb565,
    /// Sparkle in the upper-left of each pupil
    pub highlight: Rgb565,
    /// Lips and smile arc
    pub mouth: Rgb565,
    /// Mouth interior, shown once the mouth is open far enough
    pub mouth_interior: Rgb565,
    /// Hearts at even pool indices
    pub heart_a: Rgb565,
    /// Hearts at odd pool indices
    pub heart_b: Rgb565,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgb565::from_rgb(18, 18, 40),
            eye_white: Rgb565::from_rgb(255, 255, 255),
            pupil: Rgb565::from_rgb(8, 8, 18),
            highlight: Rgb565::from_rgb(255, 255, 255),
            mouth: Rgb565::from_rgb(230, 100, 120),
            mouth_interior: Rgb565::from_rgb(80, 25, 40),
            heart_a: Rgb565::from_rgb(255, 70, 110),
            heart_b: Rgb565::from_rgb(255, 120, 155),
        }
    }
}

/// Reference positions and sizes of the face elements (pixels)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Layout {
    pub left_eye: Point,
    pub right_eye: Point,
    /// Eye ellipse horizontal radius
    pub eye_rx: i32,
    /// Eye ellipse vertical radius when fully open
    pub eye_ry: i32,
    pub pupil_r: i32,
    pub highlight_r: i32,
    /// Highlight offset from the eye centre
    pub highlight_offset: Point,
    /// Pupil sits this far below the eye centre
    pub pupil_drop: i32,
    pub mouth: Point,
    /// Mouth horizontal radius (also the smile half-width)
    pub mouth_rx: i32,
    pub mouth_ry_closed: i32,
    pub mouth_ry_open: i32,
    /// Depth of the smile curve
    pub smile_depth: i32,
    /// Smile stroke thickness
    pub smile_thickness: i32,
    /// Inset of the dark interior from the lips
    pub mouth_inset: i32,
    /// Maximum float offset of the eyes
    pub float_amplitude: f32,
    /// Mouth float amplitude relative to the eyes
    pub mouth_float_scale: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            left_eye: Point::new(165, 195),
            right_eye: Point::new(315, 195),
            eye_rx: 32,
            eye_ry: 40,
            pupil_r: 14,
            highlight_r: 5,
            highlight_offset: Point::new(-7, -8),
            pupil_drop: 2,
            mouth: Point::new(240, 310),
            mouth_rx: 48,
            mouth_ry_closed: 4,
            mouth_ry_open: 34,
            smile_depth: 10,
            smile_thickness: 3,
            mouth_inset: 5,
            float_amplitude: 5.0,
            mouth_float_scale: 0.7,
        }
    }
}

/// A randomized delay: `min_ms + rand(jitter_ms)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DelayRange {
    pub min_ms: u32,
    /// Exclusive upper bound of the random part; 0 disables jitter
    pub jitter_ms: u32,
}

impl DelayRange {
    pub const fn new(min_ms: u32, jitter_ms: u32) -> Self {
        Self { min_ms, jitter_ms }
    }
}

/// Frame pacing and blink timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Timing {
    /// Minimum interval between rendered frames (25 ms = 40 fps)
    pub frame_ms: u32,
    /// Total duration of one blink
    pub blink_ms: u32,
    /// Delay before the first blink after initialization
    pub first_blink: DelayRange,
    /// Delay before the first blink after face mode is enabled
    pub enable_blink: DelayRange,
    /// Delay between consecutive automatic blinks
    pub blink_interval: DelayRange,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            frame_ms: 25,
            blink_ms: 250,
            first_blink: DelayRange::new(3000, 4000),
            enable_blink: DelayRange::new(2000, 3000),
            blink_interval: DelayRange::new(2500, 4500),
        }
    }
}

/// Heart particle tuning
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeartTuning {
    /// Hearts on screen at full love (at most `MAX_HEARTS`)
    pub max_visible: u8,
    /// Base heart radius
    pub base_size: f32,
    /// Size varies by up to this many pixels either way
    pub size_jitter: i32,
    /// Left edge of the horizontal spawn band
    pub spawn_x_min: i32,
    /// Width of the horizontal spawn band
    pub spawn_x_span: i32,
    /// Hearts spawn up to this far below the bottom edge
    pub spawn_depth: i32,
    /// Slowest upward speed (pixels per frame)
    pub speed_min: f32,
    /// Speed spread above `speed_min` (pixels per frame)
    pub speed_spread: f32,
    pub sway_amplitude: f32,
    /// Sway angular frequency (radians per second)
    pub sway_freq: f32,
    /// Hearts respawn or retire once this far above the top edge
    pub respawn_margin: f32,
    /// Hearts further than this outside the screen are not drawn
    pub draw_margin: f32,
    /// Relative size change of the pulse
    pub pulse_amplitude: f32,
    /// Pulse phase advances one radian per this many milliseconds
    pub pulse_period_ms: f32,
}

impl Default for HeartTuning {
    fn default() -> Self {
        Self {
            max_visible: MAX_HEARTS as u8,
            base_size: 18.0,
            size_jitter: 3,
            spawn_x_min: 50,
            spawn_x_span: 380,
            spawn_depth: 60,
            speed_min: 0.7,
            speed_spread: 0.5,
            sway_amplitude: 22.0,
            sway_freq: 0.8,
            respawn_margin: 40.0,
            draw_margin: 35.0,
            pulse_amplitude: 0.08,
            pulse_period_ms: 500.0,
        }
    }
}

/// Complete face configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FaceConfig {
    /// Framebuffer width in pixels
    pub width: u16,
    /// Framebuffer height in pixels
    pub height: u16,
    pub palette: Palette,
    pub layout: Layout,
    pub timing: Timing,
    pub hearts: HeartTuning,
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            width: REFERENCE_SIZE,
            height: REFERENCE_SIZE,
            palette: Palette::default(),
            layout: Layout::default(),
            timing: Timing::default(),
            hearts: HeartTuning::default(),
        }
    }
}

impl FaceConfig {
    /// Fit the reference face onto a `width` x `height` panel
    ///
    /// Lengths scale by `min(width, height) / 480` and positions are
    /// re-centred, so the face keeps its proportions on any aspect ratio.
    pub fn for_screen(width: u16, height: u16) -> Self {
        let reference = Self::default();
        let scale = width.min(height) as f32 / REFERENCE_SIZE as f32;
        let half_ref = (REFERENCE_SIZE / 2) as i32;
        let cx = (width / 2) as i32;
        let cy = (height / 2) as i32;

        let len = |v: i32| -> i32 { (libm::roundf(v as f32 * scale) as i32).max(1) };
        let pos = |p: Point| -> Point {
            Point::new(
                cx + libm::roundf((p.x - half_ref) as f32 * scale) as i32,
                cy + libm::roundf((p.y - half_ref) as f32 * scale) as i32,
            )
        };

        let l = reference.layout;
        let layout = Layout {
            left_eye: pos(l.left_eye),
            right_eye: pos(l.right_eye),
            eye_rx: len(l.eye_rx),
            eye_ry: len(l.eye_ry),
            pupil_r: len(l.pupil_r),
            highlight_r: len(l.highlight_r),
            highlight_offset: Point::new(
                libm::roundf(l.highlight_offset.x as f32 * scale) as i32,
                libm::roundf(l.highlight_offset.y as f32 * scale) as i32,
            ),
            pupil_drop: libm::roundf(l.pupil_drop as f32 * scale) as i32,
            mouth: pos(l.mouth),
            mouth_rx: len(l.mouth_rx),
            mouth_ry_closed: len(l.mouth_ry_closed),
            mouth_ry_open: len(l.mouth_ry_open),
            smile_depth: len(l.smile_depth),
            smile_thickness: len(l.smile_thickness),
            mouth_inset: len(l.mouth_inset),
            float_amplitude: l.float_amplitude * scale,
            mouth_float_scale: l.mouth_float_scale,
        };

        let h = reference.hearts;
        let hearts = HeartTuning {
            base_size: (h.base_size * scale).max(1.0),
            size_jitter: libm::roundf(h.size_jitter as f32 * scale) as i32,
            spawn_x_min: cx + libm::roundf((h.spawn_x_min - half_ref) as f32 * scale) as i32,
            spawn_x_span: len(h.spawn_x_span),
            spawn_depth: len(h.spawn_depth),
            speed_min: h.speed_min * scale,
            speed_spread: h.speed_spread * scale,
            sway_amplitude: h.sway_amplitude * scale,
            respawn_margin: h.respawn_margin * scale,
            draw_margin: h.draw_margin * scale,
            ..h
        };

        Self {
            width,
            height,
            layout,
            hearts,
            ..reference
        }
    }

    /// Number of pixels in the framebuffer
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Check the configuration for values the renderer cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroDimension);
        }
        if self.timing.frame_ms == 0 {
            return Err(ConfigError::ZeroFrameInterval);
        }
        if self.timing.blink_ms == 0 {
            return Err(ConfigError::ZeroBlinkDuration);
        }
        if self.hearts.max_visible as usize > MAX_HEARTS {
            return Err(ConfigError::TooManyHearts);
        }
        if self.hearts.spawn_x_span <= 0 || self.hearts.spawn_depth <= 0 {
            return Err(ConfigError::EmptyRange);
        }
        Ok(())
    }
}
