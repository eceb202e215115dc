//! Path camera
//!
//! Combines the spline and the orientation track into a pose for any
//! progress, and closes the scroll state's `current` on its `target` with
//! exponential damping.

use crate::config::PathConfig;
use crate::error::Result;
use crate::scroll::ScrollState;
use crate::track::OrientationTrack;
use crate::transform::CameraTransform;
use vista_core::{damp_factor, CatmullRomCurve};

/// Debug override that pins the path camera to a fixed progress
///
/// Off by default. While set, damping is bypassed and the scroll state's
/// `current` is forced to the override value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrubOverride {
    progress: Option<f32>,
}

impl ScrubOverride {
    pub fn set(&mut self, progress: f32) {
        self.progress = Some(progress.clamp(0.0, 1.0));
    }

    pub fn clear(&mut self) {
        self.progress = None;
    }

    pub fn get(&self) -> Option<f32> {
        self.progress
    }
}

/// Camera locked to the journey path
#[derive(Clone, Debug)]
pub struct PathCamera {
    curve: CatmullRomCurve,
    track: OrientationTrack,
    damping_rate: f32,
    scrub: ScrubOverride,
}

impl PathCamera {
    pub fn new(curve: CatmullRomCurve, track: OrientationTrack, damping_rate: f32) -> Self {
        Self {
            curve,
            track,
            damping_rate,
            scrub: ScrubOverride::default(),
        }
    }

    pub fn from_config(config: &PathConfig) -> Result<Self> {
        Ok(Self::new(
            config.curve()?,
            config.track()?,
            config.damping_rate,
        ))
    }

    pub fn curve(&self) -> &CatmullRomCurve {
        &self.curve
    }

    pub fn track(&self) -> &OrientationTrack {
        &self.track
    }

    pub fn scrub(&self) -> &ScrubOverride {
        &self.scrub
    }

    pub fn scrub_mut(&mut self) -> &mut ScrubOverride {
        &mut self.scrub
    }

    /// Pose at `progress`, clamped to [0, 1]
    pub fn pose_at(&self, progress: f32) -> CameraTransform {
        let progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        CameraTransform::new(
            self.curve.position_at(progress),
            self.track.blend(progress),
        )
    }

    /// Step `current` toward `target` by `dt` seconds and return the pose
    ///
    /// With `dt == 0` the state is left untouched apart from clamping.
    pub fn advance(&self, scroll: &mut ScrollState, dt: f32) -> CameraTransform {
        match self.scrub.get() {
            Some(progress) => scroll.current = progress,
            None => {
                let factor = damp_factor(self.damping_rate, dt);
                scroll.current += (scroll.target - scroll.current) * factor;
            }
        }
        scroll.current = scroll.current.clamp(0.0, 1.0);
        self.pose_at(scroll.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use vista_core::{Quat, Vec3};

    fn camera() -> PathCamera {
        PathCamera::from_config(&SessionConfig::default().path).unwrap()
    }

    #[test]
    fn test_advance_with_zero_dt_is_idempotent() {
        let camera = camera();
        let mut scroll = ScrollState {
            current: 0.3,
            target: 0.7,
        };

        let first = camera.advance(&mut scroll, 0.0);
        let second = camera.advance(&mut scroll, 0.0);
        assert_eq!(scroll.current, 0.3);
        assert_eq!(scroll.target, 0.7);
        assert_eq!(first, second);
        assert_eq!(first, camera.pose_at(0.3));
    }

    #[test]
    fn test_damping_closes_on_target() {
        let camera = camera();
        let mut scroll = ScrollState {
            current: 0.0,
            target: 0.5,
        };

        camera.advance(&mut scroll, 0.1);
        assert!((scroll.current - 0.1).abs() < 1e-6);

        let mut previous_gap = 0.5 - scroll.current;
        for _ in 0..200 {
            camera.advance(&mut scroll, 1.0 / 60.0);
            let gap = 0.5 - scroll.current;
            assert!(gap >= 0.0 && gap <= previous_gap);
            previous_gap = gap;
        }
        assert!(previous_gap < 1e-3);
    }

    #[test]
    fn test_large_dt_snaps_without_overshoot() {
        let camera = camera();
        let mut scroll = ScrollState {
            current: 0.2,
            target: 0.4,
        };

        camera.advance(&mut scroll, 10.0);
        assert!((scroll.current - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_current_clamped_to_unit_range() {
        let camera = camera();
        let mut scroll = ScrollState {
            current: 0.99,
            target: 1.6,
        };

        let pose = camera.advance(&mut scroll, 10.0);
        assert_eq!(scroll.current, 1.0);
        assert_eq!(pose, camera.pose_at(1.0));
    }

    #[test]
    fn test_pose_ends_on_control_points() {
        let config = SessionConfig::default().path;
        let camera = camera();

        let start = camera.pose_at(0.0);
        let end = camera.pose_at(1.0);
        let first = config.points[0];
        let last = config.points[config.points.len() - 1];
        assert!(start.position.distance(first) < 1e-3);
        assert!(end.position.distance(last) < 1e-3);
        assert!(start.rotation.angle_to(Quat::from_orientation(config.keyframes[0].rotation)) < 1e-5);
        assert!(camera.pose_at(-3.0).position.distance(first) < 1e-3);
        assert!(camera.pose_at(f32::NAN).position.is_finite());
        assert_ne!(start.position, Vec3::ZERO);
    }

    #[test]
    fn test_scrub_override_bypasses_damping() {
        let mut camera = camera();
        let mut scroll = ScrollState {
            current: 0.0,
            target: 0.0,
        };

        camera.scrub_mut().set(0.75);
        let pose = camera.advance(&mut scroll, 1.0 / 60.0);
        assert_eq!(scroll.current, 0.75);
        assert_eq!(pose, camera.pose_at(0.75));

        camera.scrub_mut().clear();
        camera.advance(&mut scroll, 1.0 / 60.0);
        assert!(scroll.current < 0.75);
    }
}
