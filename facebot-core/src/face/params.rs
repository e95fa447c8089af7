//! Externally driven face parameters

/// Clamp to [0, 1], mapping NaN to 0
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Parameters set by the command layer and read by every frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaceParameters {
    /// Face mode on
    pub enabled: bool,
    /// Mouth openness in [0, 1]
    pub mouth: f32,
    /// Love level in [0, 1]
    pub love: f32,
    /// A manual blink is waiting for the next frame
    pub blink_requested: bool,
}

impl FaceParameters {
    pub fn set_mouth(&mut self, open: f32) {
        self.mouth = clamp_unit(open);
    }

    pub fn set_love(&mut self, value: f32) {
        self.love = clamp_unit(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clamping() {
        let mut params = FaceParameters::default();
        params.set_mouth(-0.5);
        assert_eq!(params.mouth, 0.0);
        params.set_mouth(1.7);
        assert_eq!(params.mouth, 1.0);
        params.set_love(f32::NAN);
        assert_eq!(params.love, 0.0);
        params.set_love(f32::INFINITY);
        assert_eq!(params.love, 1.0);
    }

    proptest! {
        #[test]
        fn prop_clamp_unit_in_range(value in any::<f32>()) {
            let clamped = clamp_unit(value);
            prop_assert!((0.0..=1.0).contains(&clamped));
            if (0.0..=1.0).contains(&value) {
                prop_assert_eq!(clamped, value);
            }
        }
    }
}
