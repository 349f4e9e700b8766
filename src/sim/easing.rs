//! Time-to-progress mapping
//!
//! Shared by the render path and the hit-test path; both must go through
//! these exact functions or clicks drift away from what is drawn.

/// Clamp to [0, 1]. NaN maps to 0.
#[inline]
pub fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Cubic ease-in-out. Input is clamped to [0, 1] first.
#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = clamp_unit(t);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ease_endpoints() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_ease_clamps_input() {
        assert_eq!(ease_in_out_cubic(-3.0), 0.0);
        assert_eq!(ease_in_out_cubic(7.5), 1.0);
        assert_eq!(ease_in_out_cubic(f32::NAN), 0.0);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(-60.0, 460.0, 0.0), -60.0);
        assert_eq!(lerp(-60.0, 460.0, 1.0), 460.0);
        assert_eq!(lerp(0.0, 10.0, 0.25), 2.5);
    }

    proptest! {
        #[test]
        fn ease_stays_in_unit_range(t in 0.0f32..=1.0) {
            let v = ease_in_out_cubic(t);
            prop_assert!((0.0..=1.0).contains(&v));
        }

        #[test]
        fn ease_is_monotonic(a in 0.0f32..=1.0, b in 0.0f32..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(ease_in_out_cubic(lo) <= ease_in_out_cubic(hi));
        }

        #[test]
        fn clamp_unit_bounds(v in proptest::num::f32::ANY) {
            let c = clamp_unit(v);
            prop_assert!((0.0..=1.0).contains(&c));
        }
    }
}
