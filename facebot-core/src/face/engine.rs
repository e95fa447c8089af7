//! Face composer
//!
//! `FaceEngine` owns the framebuffer, the externally set parameters and
//! all animation state. The dispatch loop calls `tick` every iteration;
//! the engine rate-limits itself and pushes at most one frame per call.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::blink::{sample_delay, Blink};
use super::hearts::HeartPool;
use super::motion::{pupil_drift, LEFT_EYE_FLOAT, MOUTH_FLOAT, RIGHT_EYE_FLOAT};
use super::params::FaceParameters;
use super::FaceError;
use crate::config::{FaceConfig, Layout, Palette, Point};
use crate::render::{fill_circle, fill_ellipse, smile_arc, Framebuffer};
use crate::traits::FrameSink;

/// Eye height lost at full blink (the eye never closes completely)
pub const BLINK_SQUASH: f32 = 0.93;

/// Smallest eye half-height while blinking
pub const MIN_EYE_RY: i32 = 2;

/// Smallest pupil radius while the pupil is visible
pub const MIN_PUPIL_R: i32 = 4;

/// Openness below which the mouth is drawn as a smile
pub const SMILE_THRESHOLD: f32 = 0.12;

/// How the mouth is drawn at a given openness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MouthShape {
    /// Closed, curved smile arc
    Smile,
    /// Filled ellipse of half-height `ry`, with a dark interior if `interior`
    Open { ry: i32, interior: bool },
}

impl MouthShape {
    pub fn for_openness(openness: f32, layout: &Layout) -> Self {
        if openness < SMILE_THRESHOLD {
            return MouthShape::Smile;
        }
        let travel = (layout.mouth_ry_open - layout.mouth_ry_closed) as f32;
        let ry = (layout.mouth_ry_closed + (travel * openness) as i32).max(layout.mouth_ry_closed);
        MouthShape::Open {
            ry,
            interior: ry > layout.mouth_ry_closed * 2,
        }
    }
}

/// The animated face
pub struct FaceEngine {
    config: FaceConfig,
    framebuffer: Option<Framebuffer>,
    params: FaceParameters,
    blink: Blink,
    hearts: HeartPool,
    rng: SmallRng,
    /// Animation clock origin
    start_ms: u64,
    last_frame_ms: Option<u64>,
    /// Face mode was (re-)enabled; restart the clock on the next tick
    restart: bool,
    frames: u32,
}

impl FaceEngine {
    /// Create an engine without a framebuffer
    ///
    /// Nothing is rendered until `init` succeeds.
    pub fn new(config: FaceConfig, seed: u64) -> Result<Self, FaceError> {
        config.validate()?;
        Ok(Self {
            blink: Blink::new(config.timing.blink_ms),
            config,
            framebuffer: None,
            params: FaceParameters::default(),
            hearts: HeartPool::new(),
            rng: SmallRng::seed_from_u64(seed),
            start_ms: 0,
            last_frame_ms: None,
            restart: false,
            frames: 0,
        })
    }

    /// Create an engine drawing into an existing framebuffer
    pub fn with_framebuffer(
        config: FaceConfig,
        seed: u64,
        framebuffer: Framebuffer,
        now_ms: u64,
    ) -> Result<Self, FaceError> {
        if framebuffer.width() != config.width || framebuffer.height() != config.height {
            return Err(FaceError::InvalidDimensions);
        }
        let mut engine = Self::new(config, seed)?;
        engine.framebuffer = Some(framebuffer);
        engine.init(now_ms)?;
        Ok(engine)
    }

    /// Allocate the framebuffer and schedule the first blink
    ///
    /// Enable face mode before calling this to boot straight into the
    /// face with the first-blink delay. On failure face mode can still be toggled but every tick is a no-op.
    pub fn init(&mut self, now_ms: u64) -> Result<(), FaceError> {
        if self.framebuffer.is_none() {
            self.framebuffer = Some(Framebuffer::allocate(self.config.width, self.config.height)?);
        }
        self.start_ms = now_ms;
        self.last_frame_ms = None;
        // The first blink supersedes any pending enable restart
        self.restart = false;
        let delay = sample_delay(self.config.timing.first_blink, &mut self.rng);
        self.blink.schedule(now_ms, delay);
        Ok(())
    }

    /// Give up the framebuffer; later ticks do nothing
    pub fn release(&mut self) -> Option<Framebuffer> {
        self.framebuffer.take()
    }

    /// Whether a framebuffer is available
    pub fn is_ready(&self) -> bool {
        self.framebuffer.is_some()
    }

    /// Enter or leave face mode
    ///
    /// Enabling restarts the animation clock and reschedules the next
    /// blink as of the following tick.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.params.enabled = enabled;
        if enabled {
            self.restart = true;
        }
    }

    /// Set mouth openness, clamped to [0, 1]
    pub fn set_mouth(&mut self, open: f32) {
        self.params.set_mouth(open);
    }

    /// Set love level, clamped to [0, 1]
    pub fn set_love(&mut self, value: f32) {
        self.params.set_love(value);
    }

    /// Request a blink on the next tick
    ///
    /// Returns `false` and does nothing while a blink is in progress.
    pub fn trigger_blink(&mut self) -> bool {
        if self.blink.is_blinking() {
            return false;
        }
        self.params.blink_requested = true;
        true
    }

    pub fn is_enabled(&self) -> bool {
        self.params.enabled
    }

    pub fn mouth(&self) -> f32 {
        self.params.mouth
    }

    pub fn love(&self) -> f32 {
        self.params.love
    }

    pub fn is_blinking(&self) -> bool {
        self.blink.is_blinking()
    }

    /// Eyelid closure of the last rendered frame
    pub fn blink_factor(&self) -> f32 {
        self.blink.factor()
    }

    pub fn blink(&self) -> &Blink {
        &self.blink
    }

    pub fn hearts(&self) -> &HeartPool {
        &self.hearts
    }

    pub fn active_hearts(&self) -> usize {
        self.hearts.active_count()
    }

    /// Frames pushed since creation
    pub fn frame_count(&self) -> u32 {
        self.frames
    }

    pub fn framebuffer(&self) -> Option<&Framebuffer> {
        self.framebuffer.as_ref()
    }

    pub fn config(&self) -> &FaceConfig {
        &self.config
    }

    /// Copy of the current parameters
    pub fn snapshot(&self) -> FaceParameters {
        self.params
    }

    /// Render one frame if face mode is on and the frame interval elapsed
    ///
    /// Returns `true` when a frame was pushed to `sink`.
    pub fn tick<S: FrameSink + ?Sized>(&mut self, now_ms: u64, sink: &mut S) -> bool {
        if !self.params.enabled {
            return false;
        }
        let Some(fb) = self.framebuffer.as_mut() else {
            return false;
        };

        if self.restart {
            self.restart = false;
            self.start_ms = now_ms;
            self.last_frame_ms = None;
            let delay = sample_delay(self.config.timing.enable_blink, &mut self.rng);
            self.blink.schedule(now_ms, delay);
        }

        if let Some(last) = self.last_frame_ms {
            if now_ms.saturating_sub(last) < self.config.timing.frame_ms as u64 {
                return false;
            }
        }
        self.last_frame_ms = Some(now_ms);

        let t = now_ms.saturating_sub(self.start_ms) as f32 / 1000.0;

        if self.params.blink_requested {
            self.params.blink_requested = false;
            self.blink.request();
        }
        let blink = self
            .blink
            .update(now_ms, self.config.timing.blink_interval, &mut self.rng);

        let FaceConfig {
            palette,
            layout,
            hearts: tuning,
            height,
            ..
        } = &self.config;

        fb.clear(palette.background);

        let amplitude = layout.float_amplitude;
        let left = LEFT_EYE_FLOAT.offset(t, amplitude);
        let right = RIGHT_EYE_FLOAT.offset(t, amplitude);
        let mouth = MOUTH_FLOAT.offset(t, amplitude * layout.mouth_float_scale);
        let look = pupil_drift(t);

        draw_eye(fb, layout, palette, layout.left_eye, left, look, blink);
        draw_eye(fb, layout, palette, layout.right_eye, right, look, blink);
        draw_mouth(fb, layout, palette, mouth, self.params.mouth);

        self.hearts
            .update(self.params.love, t, *height, tuning, &mut self.rng);
        self.hearts.draw(fb, now_ms, tuning, palette);

        sink.push_frame(fb.as_slice(), fb.width(), fb.height());
        self.frames = self.frames.wrapping_add(1);
        true
    }
}

fn displaced(base: Point, offset: (f32, f32)) -> (i32, i32) {
    (base.x + offset.0 as i32, base.y + offset.1 as i32)
}

fn draw_eye(
    fb: &mut Framebuffer,
    layout: &Layout,
    palette: &Palette,
    base: Point,
    offset: (f32, f32),
    look: (f32, f32),
    blink: f32,
) {
    let (cx, cy) = displaced(base, offset);
    let ry = ((layout.eye_ry as f32 * (1.0 - blink * BLINK_SQUASH)) as i32).max(MIN_EYE_RY);

    fill_ellipse(fb, cx, cy, layout.eye_rx, ry, palette.eye_white);

    // Pupil and highlight disappear once the eye is mostly shut
    if ry <= layout.eye_ry / 4 {
        return;
    }

    let pupil_r = (layout.pupil_r * ry / layout.eye_ry.max(1))
        .max(MIN_PUPIL_R)
        .min(layout.pupil_r);
    fill_circle(
        fb,
        cx + look.0 as i32,
        cy + layout.pupil_drop + look.1 as i32,
        pupil_r,
        palette.pupil,
    );
    fill_circle(
        fb,
        cx + layout.highlight_offset.x,
        cy + layout.highlight_offset.y,
        layout.highlight_r,
        palette.highlight,
    );
}

fn draw_mouth(
    fb: &mut Framebuffer,
    layout: &Layout,
    palette: &Palette,
    offset: (f32, f32),
    openness: f32,
) {
    let (cx, cy) = displaced(layout.mouth, offset);
    match MouthShape::for_openness(openness, layout) {
        MouthShape::Smile => smile_arc(
            fb,
            cx,
            cy,
            layout.mouth_rx,
            layout.smile_depth,
            layout.smile_thickness,
            palette.mouth,
        ),
        MouthShape::Open { ry, interior } => {
            fill_ellipse(fb, cx, cy, layout.mouth_rx, ry, palette.mouth);
            if interior {
                fill_ellipse(
                    fb,
                    cx,
                    cy,
                    layout.mouth_rx - layout.mouth_inset,
                    ry - layout.mouth_inset,
                    palette.mouth_interior,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HeartTuning;
    use crate::face::hearts::HeartParticle;
    use crate::testing::CapturedFrames;

    const SEED: u64 = 0x5EED;

    fn engine() -> FaceEngine {
        let mut engine = FaceEngine::new(FaceConfig::default(), SEED).unwrap();
        engine.init(0).unwrap();
        engine
    }

    fn enabled_engine() -> FaceEngine {
        let mut engine = engine();
        engine.set_enabled(true);
        engine
    }

    // With the clock at t = 0 the float offsets are fixed: left eye centre
    // (165, 198), its pupil at (165, 202), mouth centre (241, 311).
    const LEFT_PUPIL: (usize, usize) = (165, 202);
    const LEFT_SCLERA: (usize, usize) = (190, 198);
    const MOUTH_CENTRE: (usize, usize) = (241, 311);
    const SMILE_BOTTOM: (usize, usize) = (241, 322);

    #[test]
    fn test_invalid_config_rejected() {
        let config = FaceConfig {
            width: 0,
            ..FaceConfig::default()
        };
        assert!(matches!(
            FaceEngine::new(config, SEED).err(),
            Some(FaceError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_framebuffer_size_must_match() {
        let fb = Framebuffer::allocate(100, 100).unwrap();
        let result = FaceEngine::with_framebuffer(FaceConfig::default(), SEED, fb, 0);
        assert_eq!(result.err(), Some(FaceError::InvalidDimensions));
    }

    #[test]
    fn test_uninitialized_engine_never_renders() {
        let mut engine = FaceEngine::new(FaceConfig::default(), SEED).unwrap();
        let mut sink = CapturedFrames::new();
        engine.set_enabled(true);
        for step in 0..10 {
            assert!(!engine.tick(step * 25, &mut sink));
        }
        assert_eq!(sink.pushes, 0);
        assert!(!engine.is_ready());
    }

    #[test]
    fn test_disabled_engine_leaves_buffer_untouched() {
        let mut engine = engine();
        let mut sink = CapturedFrames::new();
        engine.set_enabled(false);
        assert!(!engine.tick(1000, &mut sink));
        assert_eq!(sink.pushes, 0);
        let fb = engine.framebuffer().unwrap();
        assert!(fb.as_slice().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_released_engine_stops_rendering() {
        let mut engine = enabled_engine();
        let mut sink = CapturedFrames::new();
        assert!(engine.tick(0, &mut sink));
        assert!(engine.release().is_some());
        assert!(!engine.tick(100, &mut sink));
        assert_eq!(sink.pushes, 1);
    }

    #[test]
    fn test_rate_limit() {
        let mut engine = enabled_engine();
        let mut sink = CapturedFrames::new();
        assert!(engine.tick(1000, &mut sink));
        assert!(!engine.tick(1010, &mut sink));
        assert!(!engine.tick(1024, &mut sink));
        assert!(engine.tick(1025, &mut sink));
        assert_eq!(sink.pushes, 2);
        assert_eq!(engine.frame_count(), 2);
        assert_eq!(sink.last_size, (480, 480));
    }

    #[test]
    fn test_clamping() {
        let mut engine = engine();
        engine.set_mouth(-0.5);
        assert_eq!(engine.mouth(), 0.0);
        engine.set_mouth(1.7);
        assert_eq!(engine.mouth(), 1.0);
        engine.set_love(3.0);
        assert_eq!(engine.love(), 1.0);
        engine.set_love(-1.0);
        assert_eq!(engine.love(), 0.0);
    }

    #[test]
    fn test_snapshot() {
        let mut engine = enabled_engine();
        engine.set_mouth(0.4);
        engine.set_love(0.6);
        engine.trigger_blink();
        let params = engine.snapshot();
        assert!(params.enabled);
        assert_eq!(params.mouth, 0.4);
        assert_eq!(params.love, 0.6);
        assert!(params.blink_requested);
    }

    #[test]
    fn test_face_layers() {
        let mut engine = enabled_engine();
        let mut sink = CapturedFrames::new();
        assert!(engine.tick(0, &mut sink));

        let palette = Palette::default();
        assert_eq!(sink.pixel(0, 0), palette.background);
        assert_eq!(sink.pixel(LEFT_PUPIL.0, LEFT_PUPIL.1), palette.pupil);
        assert_eq!(sink.pixel(LEFT_SCLERA.0, LEFT_SCLERA.1), palette.eye_white);
        // Right eye floats to (320, 198)
        assert_eq!(sink.pixel(320, 202), palette.pupil);
        // Resting mouth is a smile: the arc bottom is drawn, the centre is not
        assert_eq!(sink.pixel(SMILE_BOTTOM.0, SMILE_BOTTOM.1), palette.mouth);
        assert_eq!(sink.pixel(MOUTH_CENTRE.0, MOUTH_CENTRE.1), palette.background);
    }

    #[test]
    fn test_open_mouth_shows_interior() {
        let mut engine = enabled_engine();
        let mut sink = CapturedFrames::new();
        engine.set_mouth(1.0);
        engine.tick(0, &mut sink);

        let palette = Palette::default();
        assert_eq!(sink.pixel(MOUTH_CENTRE.0, MOUTH_CENTRE.1), palette.mouth_interior);
        // Lip ring between the interior (rx 43) and the outline (rx 48)
        assert_eq!(sink.pixel(MOUTH_CENTRE.0 + 45, MOUTH_CENTRE.1), palette.mouth);
    }

    #[test]
    fn test_mouth_threshold_boundary() {
        let layout = Layout::default();
        assert_eq!(MouthShape::for_openness(0.0, &layout), MouthShape::Smile);
        assert_eq!(MouthShape::for_openness(0.1199, &layout), MouthShape::Smile);
        assert_eq!(
            MouthShape::for_openness(SMILE_THRESHOLD, &layout),
            MouthShape::Open {
                ry: 7,
                interior: false
            }
        );
        assert_eq!(
            MouthShape::for_openness(1.0, &layout),
            MouthShape::Open {
                ry: 34,
                interior: true
            }
        );

        let palette = Palette::default();
        let mut below = enabled_engine();
        let mut sink = CapturedFrames::new();
        below.set_mouth(0.1199);
        below.tick(0, &mut sink);
        assert_eq!(sink.pixel(MOUTH_CENTRE.0, MOUTH_CENTRE.1), palette.background);

        let mut at = enabled_engine();
        at.set_mouth(SMILE_THRESHOLD);
        at.tick(0, &mut sink);
        assert_eq!(sink.pixel(MOUTH_CENTRE.0, MOUTH_CENTRE.1), palette.mouth);
    }

    #[test]
    fn test_hearts_drawn_over_face() {
        let config = FaceConfig {
            hearts: HeartTuning {
                sway_amplitude: 0.0,
                ..HeartTuning::default()
            },
            ..FaceConfig::default()
        };
        let mut engine = FaceEngine::new(config, SEED).unwrap();
        engine.init(0).unwrap();
        engine.set_enabled(true);
        // Exactly one heart wanted
        engine.set_love(1.0 / 6.0);
        engine.hearts.particles_mut()[0] = HeartParticle {
            base_x: LEFT_PUPIL.0 as f32,
            x: LEFT_PUPIL.0 as f32,
            y: LEFT_PUPIL.1 as f32,
            size: 18.0,
            active: true,
            ..HeartParticle::default()
        };

        let mut sink = CapturedFrames::new();
        engine.tick(0, &mut sink);
        assert_eq!(engine.active_hearts(), 1);
        assert_eq!(sink.pixel(LEFT_PUPIL.0, LEFT_PUPIL.1), config.palette.heart_a);
    }

    #[test]
    fn test_no_love_no_hearts() {
        let mut engine = enabled_engine();
        let mut sink = CapturedFrames::new();
        engine.set_love(0.0);
        for frame in 0..10 {
            engine.tick(frame * 25, &mut sink);
            assert_eq!(engine.active_hearts(), 0);
        }
    }

    #[test]
    fn test_full_love_ramps_to_capacity() {
        let mut engine = enabled_engine();
        let mut sink = CapturedFrames::new();
        engine.set_love(1.0);
        let mut prev = 0;
        for frame in 0..10 {
            engine.tick(frame * 25, &mut sink);
            let count = engine.active_hearts();
            assert!(count >= prev);
            prev = count;
        }
        assert_eq!(prev, engine.config().hearts.max_visible as usize);
        assert_eq!(prev, 6);
    }

    #[test]
    fn test_love_drop_keeps_hearts_for_next_tick() {
        let mut engine = enabled_engine();
        let mut sink = CapturedFrames::new();
        engine.set_love(1.0);
        engine.tick(0, &mut sink);
        let before = engine.active_hearts();
        let heights: Vec<f32> = engine.hearts().particles().iter().map(|p| p.y).collect();

        engine.set_love(0.0);
        engine.tick(25, &mut sink);
        assert_eq!(engine.active_hearts(), before);
        // Retiring hearts keep rising instead of vanishing
        for (particle, y) in engine.hearts().particles().iter().zip(heights) {
            if particle.active {
                assert!(particle.y < y);
            }
        }
    }

    #[test]
    fn test_manual_blink_timeline() {
        let mut engine = enabled_engine();
        let mut sink = CapturedFrames::new();

        assert!(engine.trigger_blink());
        engine.tick(100, &mut sink);
        assert!(engine.is_blinking());
        assert_eq!(engine.blink().started_ms(), 100);

        engine.tick(150, &mut sink);
        // Second trigger during the closing phase is ignored
        assert!(!engine.trigger_blink());
        assert!(!engine.snapshot().blink_requested);

        engine.tick(175, &mut sink);
        assert_eq!(engine.blink_factor(), 1.0);
        assert_eq!(engine.blink().started_ms(), 100);

        engine.tick(325, &mut sink);
        assert!(engine.is_blinking());
        engine.tick(350, &mut sink);
        assert!(!engine.is_blinking());
        assert!(engine.blink().next_blink_ms() > 350);
    }

    #[test]
    fn test_closed_eye_hides_pupil() {
        let mut engine = enabled_engine();
        let mut sink = CapturedFrames::new();
        engine.trigger_blink();
        engine.tick(0, &mut sink);
        // Held phase: eye squashed to a sliver, no pupil
        engine.tick(75, &mut sink);
        let palette = Palette::default();
        assert_eq!(sink.pixel(LEFT_PUPIL.0, LEFT_PUPIL.1), palette.background);
        assert_eq!(sink.pixel(LEFT_PUPIL.0, 198), palette.eye_white);
    }

    #[test]
    fn test_enable_restarts_clock() {
        let mut engine = enabled_engine();
        let mut sink = CapturedFrames::new();
        engine.tick(0, &mut sink);
        let first = sink.last_frame.clone();

        engine.tick(3000, &mut sink);
        engine.set_enabled(false);
        assert!(!engine.tick(4000, &mut sink));

        engine.set_enabled(true);
        engine.tick(9000, &mut sink);
        // Same animation time, same hearts (none), same frame
        assert_eq!(sink.last_frame, first);
        assert!(engine.blink().next_blink_ms() >= 9000 + 2000);
    }

    #[test]
    fn test_enable_before_init_keeps_first_blink() {
        let mut engine = FaceEngine::new(FaceConfig::default(), SEED).unwrap();
        engine.set_enabled(true);
        engine.init(0).unwrap();
        let scheduled = engine.blink().next_blink_ms();
        assert!(scheduled >= 3000);

        let mut sink = CapturedFrames::new();
        assert!(engine.tick(100, &mut sink));
        assert_eq!(engine.blink().next_blink_ms(), scheduled);
    }
}
