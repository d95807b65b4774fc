//! Easing curves
//!
//! Timing curves applied to eased channel transitions. Input is clamped to
//! `[0, 1]` before shaping, so a driver that overshoots its elapsed time
//! still produces an in-range factor.

/// Easing function for timed transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant rate
    Linear,
    /// Quadratic acceleration
    EaseIn,
    /// Quadratic deceleration
    EaseOut,
    /// Smooth both ends; the default chrome curve
    #[default]
    EaseInOut,
    /// Cubic acceleration
    EaseInCubic,
    /// Cubic deceleration
    EaseOutCubic,
}

impl Easing {
    /// Shape a progress value `t` in `[0, 1]`
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => {
                let t = t - 1.0;
                t * t * t + 1.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
            Easing::EaseInCubic,
            Easing::EaseOutCubic,
        ] {
            assert!((easing.apply(0.0) - 0.0).abs() < 1e-6, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_shapes() {
        assert!((Easing::Linear.apply(0.5) - 0.5).abs() < 1e-6);
        assert!(Easing::EaseIn.apply(0.5) < 0.5);
        assert!(Easing::EaseOut.apply(0.5) > 0.5);
        assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_input_is_clamped() {
        assert_eq!(Easing::EaseInOut.apply(-0.5), 0.0);
        assert_eq!(Easing::EaseInOut.apply(1.5), 1.0);
    }
}
