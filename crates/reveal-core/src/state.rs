//! The visual state a reveal animation interpolates.

use serde::{Deserialize, Serialize};

use crate::interpolate::{Interpolate, lerp_f64};

/// Snapshot of the animatable visual properties of a reveal target.
///
/// A reveal plays from a hidden state (offset below its resting position,
/// transparent) to the resting state. Opacity is clamped to `[0, 1]` during
/// interpolation; the vertical offset and scale are not clamped, so easing
/// curves that overshoot produce a small bounce past the resting position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevealState {
    /// Vertical offset from the element's resting position, in pixels.
    /// Positive values push the element downward.
    pub y_offset: f64,
    /// Opacity from 0.0 (transparent) to 1.0 (opaque).
    pub opacity: f64,
    /// Uniform scale factor, 1.0 is the resting size.
    pub scale: f64,
}

impl Default for RevealState {
    fn default() -> Self {
        Self::resting()
    }
}

impl RevealState {
    /// The resting state: in place, opaque, unscaled.
    pub fn resting() -> Self {
        Self {
            y_offset: 0.0,
            opacity: 1.0,
            scale: 1.0,
        }
    }

    /// A hidden start state offset `rise_px` below the resting position.
    pub fn hidden(rise_px: f64) -> Self {
        Self {
            y_offset: rise_px,
            opacity: 0.0,
            scale: 1.0,
        }
    }

    /// Set the scale component.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}

impl Interpolate for RevealState {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        Self {
            y_offset: lerp_f64(self.y_offset, to.y_offset, t),
            opacity: lerp_f64(self.opacity, to.opacity, t).clamp(0.0, 1.0),
            scale: lerp_f64(self.scale, to.scale, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resting_is_default() {
        assert_eq!(RevealState::default(), RevealState::resting());
    }

    #[test]
    fn test_midpoint_interpolation() {
        let from = RevealState::hidden(30.0);
        let to = RevealState::resting();

        let mid = from.interpolate(&to, 0.5);
        assert!((mid.y_offset - 15.0).abs() < 1e-9);
        assert!((mid.opacity - 0.5).abs() < 1e-9);
        assert!((mid.scale - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_opacity_clamped_under_overshoot() {
        let from = RevealState::hidden(30.0);
        let to = RevealState::resting();

        // An overshooting ease can produce t > 1; opacity must stay at 1.
        let over = from.interpolate(&to, 1.1);
        assert_eq!(over.opacity, 1.0);
        // The vertical offset is allowed to overshoot past resting.
        assert!(over.y_offset < 0.0);
    }

    #[test]
    fn test_scale_interpolation() {
        let from = RevealState::hidden(0.0).with_scale(0.8);
        let to = RevealState::resting();

        let mid = from.interpolate(&to, 0.5);
        assert!((mid.scale - 0.9).abs() < 1e-9);
    }
}
