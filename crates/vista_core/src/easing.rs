//! Easing and damping helpers

use serde::{Deserialize, Serialize};

/// Reference frame rate that per-frame factors are authored against
pub const REFERENCE_FPS: f32 = 60.0;

/// Easing curve applied to a normalized alpha
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    /// `t² (3 − 2t)`
    #[default]
    Smoothstep,
    /// `t³ (t (6t − 15) + 10)`
    Smootherstep,
}

impl Easing {
    /// Apply the easing to `t`, clamped to [0, 1] first
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Easing::Linear => clamp01(t),
            Easing::Smoothstep => smoothstep(t),
            Easing::Smootherstep => smootherstep(t),
        }
    }
}

/// Clamp to the unit interval
pub fn clamp01(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Smooth step interpolation (ease-in-out)
pub fn smoothstep(t: f32) -> f32 {
    let t = clamp01(t);
    t * t * (3.0 - 2.0 * t)
}

/// Smoother step interpolation
pub fn smootherstep(t: f32) -> f32 {
    let t = clamp01(t);
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Fraction of the remaining distance covered this frame by exponential
/// damping at `rate` per second: `min(1, dt * rate)`
pub fn damp_factor(rate: f32, dt: f32) -> f32 {
    (dt * rate).clamp(0.0, 1.0)
}

/// Frame-rate independent version of a per-frame lerp factor
///
/// A factor of `per_frame` applied once per frame at 60 fps covers the same
/// distance as `approach_factor(per_frame, dt)` applied over `dt` seconds.
/// Stays strictly below 1 for `per_frame < 1`, so the target is approached
/// but never reached.
pub fn approach_factor(per_frame: f32, dt: f32) -> f32 {
    let keep = (1.0 - per_frame).clamp(0.0, 1.0);
    1.0 - keep.powf(dt.max(0.0) * REFERENCE_FPS)
}
