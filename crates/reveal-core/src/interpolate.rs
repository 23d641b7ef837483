//! Interpolation trait for animatable values.
//!
//! The `Interpolate` trait is the core mechanism the tween stepper is built
//! on: any value that can be blended between a start and an end state can be
//! driven by a tween. The scalar implementations cover the count-up style
//! animations; `RevealState` in the `state` module covers entrance reveals.

/// Trait for types that can be interpolated between two values.
///
/// # Arguments
/// * `to` - Target value to interpolate towards
/// * `t` - Interpolation factor (0.0 = self, 1.0 = to)
pub trait Interpolate: Sized {
    /// Interpolate between self and another value.
    ///
    /// When t = 0.0, returns self.
    /// When t = 1.0, returns to.
    /// Values between 0.0 and 1.0 return intermediate values.
    fn interpolate(&self, to: &Self, t: f32) -> Self;
}

/// Linear interpolation helper for f64 values.
#[inline]
pub(crate) fn lerp_f64(from: f64, to: f64, t: f32) -> f64 {
    from + (to - from) * t as f64
}

/// Linear interpolation helper for f32 values.
#[inline]
pub(crate) fn lerp_f32(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

impl Interpolate for f64 {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        lerp_f64(*self, *to, t)
    }
}

impl Interpolate for f32 {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        lerp_f32(*self, *to, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f64_interpolation() {
        let from = 0.0f64;
        assert_eq!(from.interpolate(&100.0, 0.0), 0.0);
        assert_eq!(from.interpolate(&100.0, 0.5), 50.0);
        assert_eq!(from.interpolate(&100.0, 1.0), 100.0);
    }

    #[test]
    fn test_f32_interpolation() {
        let from = -10.0f32;
        assert_eq!(from.interpolate(&10.0, 0.5), 0.0);
    }

    #[test]
    fn test_interpolation_beyond_range() {
        // Bezier easings can overshoot; interpolation must extrapolate.
        let from = 0.0f64;
        assert_eq!(from.interpolate(&10.0, 1.2), 12.0);
    }
}
