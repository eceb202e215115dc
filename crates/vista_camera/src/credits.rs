//! Credits drift
//!
//! While the credits roll the camera eases toward a fixed pose, covering a
//! fixed fraction of the remaining distance per reference frame. The pose
//! is approached but never reached.

use crate::config::CreditsConfig;
use crate::transform::CameraTransform;
use vista_core::{approach_factor, Quat};

#[derive(Clone, Copy, Debug)]
pub struct CreditsApproach {
    target: CameraTransform,
    per_frame: f32,
}

impl CreditsApproach {
    pub fn new(config: &CreditsConfig) -> Self {
        Self {
            target: CameraTransform::new(config.position, Quat::from_orientation(config.rotation)),
            per_frame: config.approach,
        }
    }

    pub fn target(&self) -> &CameraTransform {
        &self.target
    }

    /// Move `from` toward the credits pose over `dt` seconds
    pub fn step(&self, from: &CameraTransform, dt: f32) -> CameraTransform {
        from.blend(&self.target, approach_factor(self.per_frame, dt))
    }
}
