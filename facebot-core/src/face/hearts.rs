//! Floating heart particles
//!
//! A fixed pool of hearts rises from below the screen while the love level
//! is non-zero. The number of hearts in flight ramps toward the wanted
//! count one respawn at a time; hearts above the wanted count finish their
//! flight before they retire, so lowering the love level never makes a
//! heart vanish mid-screen.

use libm::sinf;
use rand::Rng;

use crate::color::Rgb565;
use crate::config::{HeartTuning, Palette};
use crate::render::{fill_heart, Framebuffer};

/// Capacity of the heart pool
pub const MAX_HEARTS: usize = 6;

/// One heart in the pool
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HeartParticle {
    /// Horizontal centre of the sway
    pub base_x: f32,
    pub x: f32,
    pub y: f32,
    /// Sway and pulse phase (radians)
    pub phase: f32,
    /// Upward speed (pixels per frame)
    pub speed: f32,
    /// Radius before pulsing
    pub size: f32,
    pub active: bool,
}

/// Number of hearts wanted at `love`, capped at `capacity`
pub fn wanted_hearts(love: f32, capacity: usize) -> usize {
    let love = if love.is_nan() { 0.0 } else { love.clamp(0.0, 1.0) };
    let wanted = (love * MAX_HEARTS as f32 + 0.5) as usize;
    wanted.min(capacity).min(MAX_HEARTS)
}

/// Fixed-capacity heart pool
#[derive(Debug, Clone, Default)]
pub struct HeartPool {
    particles: [HeartParticle; MAX_HEARTS],
}

impl HeartPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance every heart one frame
    ///
    /// `t` is the animation time in seconds, `screen_height` the bottom
    /// edge hearts spawn below.
    pub fn update<R: Rng>(
        &mut self,
        love: f32,
        t: f32,
        screen_height: u16,
        tuning: &HeartTuning,
        rng: &mut R,
    ) {
        let wanted = wanted_hearts(love, tuning.max_visible as usize);

        for (i, heart) in self.particles.iter_mut().enumerate() {
            let should = i < wanted;

            if !heart.active {
                if !should {
                    continue;
                }
                spawn(heart, t, screen_height, tuning, rng);
            }

            heart.y -= heart.speed;
            heart.x = heart.base_x + sinf(t * tuning.sway_freq + heart.phase) * tuning.sway_amplitude;

            if heart.y < -tuning.respawn_margin {
                if should {
                    spawn(heart, t, screen_height, tuning, rng);
                } else {
                    heart.active = false;
                }
            }
        }
    }

    /// Draw the visible hearts, alternating colors by pool index
    pub fn draw(
        &self,
        fb: &mut Framebuffer,
        now_ms: u64,
        tuning: &HeartTuning,
        palette: &Palette,
    ) {
        let bottom = fb.height() as f32 + tuning.draw_margin;
        let beat = now_ms as f32 / tuning.pulse_period_ms;

        for (i, heart) in self.particles.iter().enumerate() {
            if !heart.active || heart.y < -tuning.draw_margin || heart.y > bottom {
                continue;
            }
            let pulse = 1.0 + sinf(beat + heart.phase) * tuning.pulse_amplitude;
            fill_heart(
                fb,
                heart.x as i32,
                heart.y as i32,
                heart.size * pulse,
                heart_color(palette, i),
            );
        }
    }

    /// Number of hearts in flight
    pub fn active_count(&self) -> usize {
        self.particles.iter().filter(|h| h.active).count()
    }

    pub fn particles(&self) -> &[HeartParticle] {
        &self.particles
    }

    #[cfg(test)]
    pub(crate) fn particles_mut(&mut self) -> &mut [HeartParticle] {
        &mut self.particles
    }
}

fn heart_color(palette: &Palette, index: usize) -> Rgb565 {
    if index % 2 == 0 {
        palette.heart_a
    } else {
        palette.heart_b
    }
}

fn spawn<R: Rng>(heart: &mut HeartParticle, t: f32, screen_height: u16, tuning: &HeartTuning, rng: &mut R) {
    heart.base_x = (tuning.spawn_x_min + rng.gen_range(0..tuning.spawn_x_span.max(1))) as f32;
    heart.x = heart.base_x;
    heart.y = (screen_height as i32 + rng.gen_range(0..tuning.spawn_depth.max(1))) as f32;
    heart.phase = t + rng.gen_range(0.0..core::f32::consts::TAU);
    heart.speed = if tuning.speed_spread > 0.0 {
        tuning.speed_min + rng.gen_range(0.0..tuning.speed_spread)
    } else {
        tuning.speed_min
    };
    let jitter = tuning.size_jitter.abs();
    heart.size = (tuning.base_size + rng.gen_range(-jitter..=jitter) as f32).max(1.0);
    heart.active = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const H: u16 = 480;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    #[test]
    fn test_wanted_hearts() {
        assert_eq!(wanted_hearts(0.0, MAX_HEARTS), 0);
        assert_eq!(wanted_hearts(0.05, MAX_HEARTS), 0);
        assert_eq!(wanted_hearts(0.1, MAX_HEARTS), 1);
        assert_eq!(wanted_hearts(0.5, MAX_HEARTS), 3);
        assert_eq!(wanted_hearts(1.0, MAX_HEARTS), 6);
        assert_eq!(wanted_hearts(1.0, 4), 4);
        assert_eq!(wanted_hearts(f32::NAN, MAX_HEARTS), 0);
    }

    #[test]
    fn test_no_love_no_hearts() {
        let tuning = HeartTuning::default();
        let mut rng = rng();
        let mut pool = HeartPool::new();
        for frame in 0..10 {
            pool.update(0.0, frame as f32 * 0.025, H, &tuning, &mut rng);
            assert_eq!(pool.active_count(), 0);
        }
    }

    #[test]
    fn test_full_love_fills_pool() {
        let tuning = HeartTuning::default();
        let mut rng = rng();
        let mut pool = HeartPool::new();
        let mut prev = 0;
        for frame in 0..1000 {
            pool.update(1.0, frame as f32 * 0.025, H, &tuning, &mut rng);
            let count = pool.active_count();
            assert!(count >= prev);
            assert!(count <= MAX_HEARTS);
            prev = count;
        }
        assert_eq!(prev, MAX_HEARTS);
    }

    #[test]
    fn test_spawned_hearts_start_below_screen() {
        let tuning = HeartTuning::default();
        let mut rng = rng();
        let mut pool = HeartPool::new();
        pool.update(1.0, 0.0, H, &tuning, &mut rng);
        for heart in pool.particles() {
            assert!(heart.active);
            // One frame of movement after spawning
            assert!(heart.y >= H as f32 - 1.2);
            assert!(heart.base_x >= 50.0 && heart.base_x < 430.0);
            assert!(heart.speed >= 0.7 && heart.speed < 1.2);
            assert!(heart.size >= 15.0 && heart.size <= 21.0);
        }
    }

    #[test]
    fn test_dropping_love_lets_hearts_finish() {
        let tuning = HeartTuning::default();
        let mut rng = rng();
        let mut pool = HeartPool::new();
        pool.update(1.0, 0.0, H, &tuning, &mut rng);
        assert_eq!(pool.active_count(), MAX_HEARTS);

        pool.update(0.0, 0.025, H, &tuning, &mut rng);
        assert_eq!(pool.active_count(), MAX_HEARTS);

        // Slowest heart needs (480 + 60 + 40) / 0.7 frames to leave
        let mut prev = MAX_HEARTS;
        for frame in 2..1000 {
            pool.update(0.0, frame as f32 * 0.025, H, &tuning, &mut rng);
            let count = pool.active_count();
            assert!(count <= prev);
            prev = count;
        }
        assert_eq!(prev, 0);
    }

    #[test]
    fn test_retired_heart_is_above_screen() {
        let tuning = HeartTuning::default();
        let mut rng = rng();
        let mut pool = HeartPool::new();
        pool.update(1.0, 0.0, H, &tuning, &mut rng);

        let mut prev = pool.particles().to_vec();
        for frame in 1..1000 {
            pool.update(0.0, frame as f32 * 0.025, H, &tuning, &mut rng);
            for (before, after) in prev.iter().zip(pool.particles()) {
                if before.active && !after.active {
                    assert!(after.y < -tuning.respawn_margin);
                }
            }
            prev = pool.particles().to_vec();
        }
    }

    #[test]
    fn test_capacity_limit_respected() {
        let tuning = HeartTuning {
            max_visible: 2,
            ..HeartTuning::default()
        };
        let mut rng = rng();
        let mut pool = HeartPool::new();
        for frame in 0..50 {
            pool.update(1.0, frame as f32 * 0.025, H, &tuning, &mut rng);
        }
        assert_eq!(pool.active_count(), 2);
    }

    #[test]
    fn test_draw_alternates_colors() {
        let tuning = HeartTuning::default();
        let palette = Palette::default();
        let mut fb = Framebuffer::allocate(200, 100).unwrap();
        let mut pool = HeartPool::new();
        {
            let hearts = pool.particles_mut();
            hearts[0] = HeartParticle {
                x: 50.0,
                y: 50.0,
                size: 18.0,
                active: true,
                ..HeartParticle::default()
            };
            hearts[1] = HeartParticle {
                x: 150.0,
                y: 50.0,
                size: 18.0,
                active: true,
                ..HeartParticle::default()
            };
        }
        pool.draw(&mut fb, 0, &tuning, &palette);
        assert_eq!(fb.get_pixel(50, 50), Some(palette.heart_a));
        assert_eq!(fb.get_pixel(150, 50), Some(palette.heart_b));
    }

    #[test]
    fn test_draw_skips_offscreen_hearts() {
        let tuning = HeartTuning::default();
        let palette = Palette::default();
        let mut fb = Framebuffer::allocate(100, 100).unwrap();
        let mut pool = HeartPool::new();
        pool.particles_mut()[0] = HeartParticle {
            x: 50.0,
            y: -36.0,
            size: 40.0,
            active: true,
            ..HeartParticle::default()
        };
        pool.draw(&mut fb, 0, &tuning, &palette);
        assert!(fb.as_slice().iter().all(|&p| p == 0));
    }

    proptest! {
        #[test]
        fn prop_count_never_below_wanted(
            loves in proptest::collection::vec(0.0f32..=1.0, 1..200),
            seed in any::<u64>(),
        ) {
            let tuning = HeartTuning::default();
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut pool = HeartPool::new();
            for (frame, love) in loves.into_iter().enumerate() {
                pool.update(love, frame as f32 * 0.025, H, &tuning, &mut rng);
                let count = pool.active_count();
                prop_assert!(count >= wanted_hearts(love, MAX_HEARTS));
                prop_assert!(count <= MAX_HEARTS);
            }
        }
    }
}
