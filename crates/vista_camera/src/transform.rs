//! Camera pose output

use vista_core::{Interpolate, Quat, SphericalInterpolate, Vec3};

/// Transform output from the camera engine
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraTransform {
    /// World position
    pub position: Vec3,
    /// Rotation as quaternion
    pub rotation: Quat,
}

impl Default for CameraTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl CameraTransform {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Lerp position and slerp rotation toward `other`
    pub fn blend(&self, other: &CameraTransform, t: f32) -> CameraTransform {
        CameraTransform {
            position: self.position.lerp(other.position, t),
            rotation: self.rotation.slerp(other.rotation, t),
        }
    }

    /// Positions within `epsilon` per axis and rotations within `epsilon`
    /// radians of each other
    pub fn approx_eq(&self, other: &CameraTransform, epsilon: f32) -> bool {
        Interpolate::approx_eq(&self.position, &other.position, epsilon)
            && SphericalInterpolate::approx_eq(&self.rotation, &other.rotation, epsilon)
    }
}

/// Render camera handle
///
/// Receives exactly one pose per frame in which the engine owns the camera.
/// The engine never reads camera state back.
pub trait CameraSink {
    fn write_pose(&mut self, transform: &CameraTransform);
}

impl<F> CameraSink for F
where
    F: FnMut(&CameraTransform),
{
    fn write_pose(&mut self, transform: &CameraTransform) {
        self(transform)
    }
}
