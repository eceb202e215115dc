//! Euler orientation in degrees
//!
//! Authoring format for camera facing. Convert to [`Quat`](crate::Quat)
//! before blending; Euler angles are never interpolated directly.

use serde::{Deserialize, Serialize};

/// Camera orientation as intrinsic X-Y-Z Euler angles, in degrees
///
/// `pitch` rotates about X, `yaw` about Y and `roll` about Z, applied in
/// that order. Serialized as a `[x, y, z]` triple.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Orientation {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Orientation {
    pub const fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Facing with only a yaw component
    pub const fn yaw(yaw: f32) -> Self {
        Self::new(0.0, yaw, 0.0)
    }

    /// Angles in radians, `(x, y, z)`
    pub fn to_radians(self) -> (f32, f32, f32) {
        (
            self.pitch.to_radians(),
            self.yaw.to_radians(),
            self.roll.to_radians(),
        )
    }

    pub fn is_finite(&self) -> bool {
        self.pitch.is_finite() && self.yaw.is_finite() && self.roll.is_finite()
    }
}

impl From<[f32; 3]> for Orientation {
    fn from([pitch, yaw, roll]: [f32; 3]) -> Self {
        Self::new(pitch, yaw, roll)
    }
}

impl From<Orientation> for [f32; 3] {
    fn from(o: Orientation) -> Self {
        [o.pitch, o.yaw, o.roll]
    }
}
