//! Eye blink state machine
//!
//! Idle until the next scheduled blink (or a manual request), then one
//! blink of fixed duration. Closing, held and opening are sub-phases
//! derived from the elapsed fraction of the blink, not separate timers.

use rand::Rng;

use crate::config::DelayRange;

/// Fraction of the blink at which the eye is fully closed
pub const CLOSE_END: f32 = 0.25;
/// Fraction of the blink at which the eye starts opening again
pub const HOLD_END: f32 = 0.45;

/// Blink sub-phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkPhase {
    /// Eyes open, waiting for the next blink
    Idle,
    /// Eyelid coming down
    Closing,
    /// Eyelid fully down
    Held,
    /// Eyelid going back up, slower than closing
    Opening,
}

impl BlinkPhase {
    /// Sub-phase at `frac` of the blink duration
    pub fn at(frac: f32) -> Self {
        if !(0.0..1.0).contains(&frac) {
            BlinkPhase::Idle
        } else if frac < CLOSE_END {
            BlinkPhase::Closing
        } else if frac < HOLD_END {
            BlinkPhase::Held
        } else {
            BlinkPhase::Opening
        }
    }
}

/// Eyelid closure at `frac` of the blink: 0 = open, 1 = closed
pub fn blink_factor(frac: f32) -> f32 {
    match BlinkPhase::at(frac) {
        BlinkPhase::Idle => 0.0,
        BlinkPhase::Closing => frac / CLOSE_END,
        BlinkPhase::Held => 1.0,
        BlinkPhase::Opening => 1.0 - (frac - HOLD_END) / (1.0 - HOLD_END),
    }
}

/// Draw a random delay from a `DelayRange`
pub(crate) fn sample_delay<R: Rng>(range: DelayRange, rng: &mut R) -> u32 {
    if range.jitter_ms == 0 {
        range.min_ms
    } else {
        range.min_ms + rng.gen_range(0..range.jitter_ms)
    }
}

/// Blink timing state
///
/// Either idle and waiting for `next_ms`, or blinking within
/// `[start_ms, start_ms + duration)`.
#[derive(Debug, Clone)]
pub struct Blink {
    duration_ms: u32,
    blinking: bool,
    start_ms: u64,
    next_ms: u64,
    requested: bool,
    factor: f32,
}

impl Blink {
    /// Create an idle blink state with no blink scheduled yet
    pub fn new(duration_ms: u32) -> Self {
        Self {
            duration_ms: duration_ms.max(1),
            blinking: false,
            start_ms: 0,
            next_ms: u64::MAX,
            requested: false,
            factor: 0.0,
        }
    }

    /// Schedule the next automatic blink `delay_ms` after `now_ms`
    pub fn schedule(&mut self, now_ms: u64, delay_ms: u32) {
        self.next_ms = now_ms.saturating_add(delay_ms as u64);
    }

    /// Request a blink at the next update
    ///
    /// Returns `false` (and does nothing) while a blink is in progress.
    pub fn request(&mut self) -> bool {
        if self.blinking {
            return false;
        }
        self.requested = true;
        true
    }

    /// Advance the state machine and return the eyelid closure factor
    ///
    /// `interval` is sampled for the gap to the next automatic blink each
    /// time a blink completes.
    pub fn update<R: Rng>(&mut self, now_ms: u64, interval: DelayRange, rng: &mut R) -> f32 {
        if !self.blinking && (self.requested || now_ms >= self.next_ms) {
            self.blinking = true;
            self.start_ms = now_ms;
        }
        self.requested = false;

        self.factor = if self.blinking {
            let frac = self.fraction(now_ms);
            if frac >= 1.0 {
                self.blinking = false;
                self.schedule(now_ms, sample_delay(interval, rng));
                0.0
            } else {
                blink_factor(frac)
            }
        } else {
            0.0
        };
        self.factor
    }

    /// Whether a blink is in progress
    pub fn is_blinking(&self) -> bool {
        self.blinking
    }

    /// Whether a manual blink is waiting for the next update
    pub fn is_requested(&self) -> bool {
        self.requested
    }

    /// Closure factor computed by the last update
    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// Current sub-phase as of `now_ms`
    pub fn phase(&self, now_ms: u64) -> BlinkPhase {
        if self.blinking {
            BlinkPhase::at(self.fraction(now_ms))
        } else {
            BlinkPhase::Idle
        }
    }

    /// Time of the next automatic blink
    pub fn next_blink_ms(&self) -> u64 {
        self.next_ms
    }

    /// Time the current (or last) blink started
    pub fn started_ms(&self) -> u64 {
        self.start_ms
    }

    fn fraction(&self, now_ms: u64) -> f32 {
        now_ms.saturating_sub(self.start_ms) as f32 / self.duration_ms as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const INTERVAL: DelayRange = DelayRange::new(2500, 4500);

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    #[test]
    fn test_factor_key_points() {
        assert_eq!(blink_factor(0.0), 0.0);
        assert_eq!(blink_factor(0.25), 1.0);
        assert_eq!(blink_factor(0.3), 1.0);
        assert_eq!(blink_factor(0.45), 1.0);
        assert!(blink_factor(1.0 - 1e-6) < 1e-3);
        assert_eq!(blink_factor(1.0), 0.0);
        assert_eq!(blink_factor(-0.5), 0.0);
    }

    #[test]
    fn test_factor_is_continuous() {
        let mut prev = blink_factor(0.0);
        for step in 1..=1000 {
            let frac = step as f32 / 1000.0;
            let f = blink_factor(frac);
            assert!((f - prev).abs() < 0.01, "jump at {}", frac);
            assert!((0.0..=1.0).contains(&f));
            prev = f;
        }
    }

    #[test]
    fn test_opening_slower_than_closing() {
        // Closing takes 25% of the blink, opening 55%
        let closing_slope = blink_factor(0.1) - blink_factor(0.0);
        let opening_slope = blink_factor(0.5) - blink_factor(0.6);
        assert!(closing_slope > opening_slope);
    }

    #[test]
    fn test_phases() {
        assert_eq!(BlinkPhase::at(0.0), BlinkPhase::Closing);
        assert_eq!(BlinkPhase::at(0.3), BlinkPhase::Held);
        assert_eq!(BlinkPhase::at(0.5), BlinkPhase::Opening);
        assert_eq!(BlinkPhase::at(1.0), BlinkPhase::Idle);
    }

    #[test]
    fn test_scheduled_blink_cycle() {
        let mut rng = rng();
        let mut blink = Blink::new(250);
        blink.schedule(0, 1000);

        assert_eq!(blink.update(975, INTERVAL, &mut rng), 0.0);
        assert!(!blink.is_blinking());

        assert_eq!(blink.update(1000, INTERVAL, &mut rng), 0.0);
        assert!(blink.is_blinking());
        assert_eq!(blink.phase(1000), BlinkPhase::Closing);

        assert_eq!(blink.update(1075, INTERVAL, &mut rng), 1.0);
        assert_eq!(blink.phase(1075), BlinkPhase::Held);

        assert_eq!(blink.update(1250, INTERVAL, &mut rng), 0.0);
        assert!(!blink.is_blinking());
        let next = blink.next_blink_ms();
        assert!(next > 1250);
        assert!((1250 + 2500..1250 + 7000).contains(&next));
    }

    #[test]
    fn test_request_starts_blink_on_next_update() {
        let mut rng = rng();
        let mut blink = Blink::new(250);
        blink.schedule(0, 10_000);

        assert!(blink.request());
        assert!(blink.is_requested());
        assert!(!blink.is_blinking());

        blink.update(500, INTERVAL, &mut rng);
        assert!(blink.is_blinking());
        assert!(!blink.is_requested());
        assert_eq!(blink.started_ms(), 500);
    }

    #[test]
    fn test_request_ignored_while_blinking() {
        let mut rng = rng();
        let mut blink = Blink::new(250);
        blink.request();
        blink.update(100, INTERVAL, &mut rng);

        blink.update(150, INTERVAL, &mut rng);
        assert!(!blink.request());
        blink.update(175, INTERVAL, &mut rng);
        assert_eq!(blink.started_ms(), 100);

        // Ends on the first request's timeline
        blink.update(350, INTERVAL, &mut rng);
        assert!(!blink.is_blinking());
    }

    #[test]
    fn test_sample_delay() {
        let mut rng = rng();
        assert_eq!(sample_delay(DelayRange::new(100, 0), &mut rng), 100);
        for _ in 0..100 {
            let d = sample_delay(INTERVAL, &mut rng);
            assert!((2500..7000).contains(&d));
        }
    }
}
