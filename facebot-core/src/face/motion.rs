//! Motion synthesis
//!
//! Layered sine waves give each face element a slow, organic drift around
//! its reference position. Pure functions of time, safe to call any number
//! of times per frame.

use libm::{cosf, sinf};

/// Frequencies (rad/s) and phases of one element's float motion
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FloatParams {
    pub freq_x: f32,
    pub freq_y: f32,
    pub phase_x: f32,
    pub phase_y: f32,
}

impl FloatParams {
    pub const fn new(freq_x: f32, freq_y: f32, phase_x: f32, phase_y: f32) -> Self {
        Self {
            freq_x,
            freq_y,
            phase_x,
            phase_y,
        }
    }

    /// Offset at time `t` (seconds) scaled by `amplitude` pixels
    pub fn offset(&self, t: f32, amplitude: f32) -> (f32, f32) {
        float_offset(
            t,
            self.freq_x,
            self.freq_y,
            self.phase_x,
            self.phase_y,
            amplitude,
        )
    }
}

// Eyes share frequencies but not phases; the mouth runs slower so the
// three never lock together.
pub const LEFT_EYE_FLOAT: FloatParams = FloatParams::new(0.71, 0.53, 0.0, 0.5);
pub const RIGHT_EYE_FLOAT: FloatParams = FloatParams::new(0.71, 0.53, 1.05, 1.55);
pub const MOUTH_FLOAT: FloatParams = FloatParams::new(0.62, 0.41, 2.1, 2.6);

/// Two-harmonic float offset
///
/// ```text
/// dx = A * (sin(t*fx + px) + 0.3 * sin(1.7*t*fx + 2.3*px))
/// dy = A * (sin(t*fy + py) + 0.3 * cos(1.3*t*fy + 1.7*py))
/// ```
pub fn float_offset(
    t: f32,
    freq_x: f32,
    freq_y: f32,
    phase_x: f32,
    phase_y: f32,
    amplitude: f32,
) -> (f32, f32) {
    let dx = sinf(t * freq_x + phase_x) * amplitude
        + sinf(t * freq_x * 1.7 + phase_x * 2.3) * amplitude * 0.3;
    let dy = sinf(t * freq_y + phase_y) * amplitude
        + cosf(t * freq_y * 1.3 + phase_y * 1.7) * amplitude * 0.3;
    (dx, dy)
}

/// Slow lissajous drift of the pupils, as if the eyes look around
pub fn pupil_drift(t: f32) -> (f32, f32) {
    (sinf(t * 0.3) * 3.0, cosf(t * 0.22) * 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_offset_at_time_zero() {
        let (dx, dy) = float_offset(0.0, 1.0, 1.0, 0.0, 0.0, 5.0);
        assert!(close(dx, 0.0));
        // sin(0) + 0.3 * cos(0)
        assert!(close(dy, 1.5));
    }

    #[test]
    fn test_offset_is_deterministic() {
        let a = LEFT_EYE_FLOAT.offset(12.34, 5.0);
        let b = LEFT_EYE_FLOAT.offset(12.34, 5.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_offset_is_bounded_by_amplitude() {
        for step in 0..2000 {
            let t = step as f32 * 0.05;
            for params in [LEFT_EYE_FLOAT, RIGHT_EYE_FLOAT, MOUTH_FLOAT] {
                let (dx, dy) = params.offset(t, 5.0);
                assert!(dx.abs() <= 6.5 + 1e-3);
                assert!(dy.abs() <= 6.5 + 1e-3);
            }
        }
    }

    #[test]
    fn test_elements_move_independently() {
        let left = LEFT_EYE_FLOAT.offset(3.0, 5.0);
        let right = RIGHT_EYE_FLOAT.offset(3.0, 5.0);
        let mouth = MOUTH_FLOAT.offset(3.0, 5.0);
        assert_ne!(left, right);
        assert_ne!(left, mouth);
    }

    #[test]
    fn test_zero_amplitude_is_still() {
        assert_eq!(MOUTH_FLOAT.offset(7.5, 0.0), (0.0, 0.0));
    }

    #[test]
    fn test_pupil_drift_range() {
        let (x, y) = pupil_drift(0.0);
        assert!(close(x, 0.0));
        assert!(close(y, 2.0));
    }
}
