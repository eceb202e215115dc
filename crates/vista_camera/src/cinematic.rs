//! Cinematic sequencer
//!
//! Plays a fixed script of scenes once, driven by elapsed time. Each scene
//! is a chain of segments of equal length; within a segment the camera
//! eases from one waypoint to the next. Scene changes are hard cuts.

use crate::config::SceneConfig;
use crate::error::ScriptError;
use crate::transform::CameraTransform;
use smallvec::SmallVec;
use tracing::{debug, trace};
use vista_core::{Easing, Quat, Vec3};

/// One interpolated move between two waypoints
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CinematicSegment {
    pub position_start: Vec3,
    pub position_end: Vec3,
    pub rotation_start: Quat,
    pub rotation_end: Quat,
    pub duration: f32,
    pub easing: Easing,
}

impl CinematicSegment {
    pub fn start(&self) -> CameraTransform {
        CameraTransform::new(self.position_start, self.rotation_start)
    }

    pub fn end(&self) -> CameraTransform {
        CameraTransform::new(self.position_end, self.rotation_end)
    }

    /// Pose at linear `alpha` in [0, 1], after easing
    pub fn sample(&self, alpha: f32) -> CameraTransform {
        self.start().blend(&self.end(), self.easing.apply(alpha))
    }
}

#[derive(Clone, Debug)]
struct Scene {
    start: f32,
    duration: f32,
    segments: SmallVec<[CinematicSegment; 4]>,
}

/// Validated, immutable cinematic script
#[derive(Clone, Debug)]
pub struct CinematicScript {
    scenes: Vec<Scene>,
    total: f32,
}

/// Where a point in time falls in the script
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CinematicSample {
    pub scene: usize,
    pub segment: usize,
    /// Linear progress through the segment, before easing
    pub alpha: f32,
    pub transform: CameraTransform,
}

impl CinematicScript {
    pub fn new(scenes: &[SceneConfig]) -> Result<Self, ScriptError> {
        if scenes.is_empty() {
            return Err(ScriptError::Empty);
        }

        let mut built = Vec::with_capacity(scenes.len());
        let mut start = 0.0;

        for (index, scene) in scenes.iter().enumerate() {
            if scene.waypoints.len() < 2 {
                return Err(ScriptError::TooFewWaypoints {
                    scene: index,
                    count: scene.waypoints.len(),
                });
            }
            if !scene.duration.is_finite() || scene.duration <= 0.0 {
                return Err(ScriptError::BadDuration {
                    scene: index,
                    duration: scene.duration,
                });
            }
            if let Some(waypoint) = scene
                .waypoints
                .iter()
                .position(|w| !w.position.is_finite() || !w.rotation.is_finite())
            {
                return Err(ScriptError::NonFinite {
                    scene: index,
                    waypoint,
                });
            }

            let segment_duration = scene.duration / (scene.waypoints.len() - 1) as f32;
            let segments = scene
                .waypoints
                .windows(2)
                .map(|pair| CinematicSegment {
                    position_start: pair[0].position,
                    position_end: pair[1].position,
                    rotation_start: Quat::from_orientation(pair[0].rotation),
                    rotation_end: Quat::from_orientation(pair[1].rotation),
                    duration: segment_duration,
                    easing: scene.easing,
                })
                .collect();

            built.push(Scene {
                start,
                duration: scene.duration,
                segments,
            });
            start += scene.duration;
        }

        Ok(Self {
            scenes: built,
            total: start,
        })
    }

    /// Sum of all scene durations, seconds
    pub fn total_duration(&self) -> f32 {
        self.total
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// Segments in every scene, in play order
    pub fn segments(&self) -> impl Iterator<Item = (usize, &CinematicSegment)> {
        self.scenes
            .iter()
            .enumerate()
            .flat_map(|(i, scene)| scene.segments.iter().map(move |s| (i, s)))
    }

    pub fn first_segment(&self) -> &CinematicSegment {
        &self.scenes[0].segments[0]
    }

    pub fn last_segment(&self) -> &CinematicSegment {
        let scene = &self.scenes[self.scenes.len() - 1];
        &scene.segments[scene.segments.len() - 1]
    }

    /// Sample the script at `time` seconds without side effects
    ///
    /// Boundaries belong to the later segment, which starts at alpha 0.
    /// Time at or past the end yields the last segment at alpha 1.
    pub fn pose_at(&self, time: f32) -> CinematicSample {
        let time = if time.is_nan() { 0.0 } else { time.max(0.0) };

        if time >= self.total {
            let scene = self.scenes.len() - 1;
            let segment = self.scenes[scene].segments.len() - 1;
            return CinematicSample {
                scene,
                segment,
                alpha: 1.0,
                transform: self.last_segment().sample(1.0),
            };
        }

        let scene_index = self
            .scenes
            .iter()
            .position(|s| time < s.start + s.duration)
            .unwrap_or(self.scenes.len() - 1);
        let scene = &self.scenes[scene_index];

        let count = scene.segments.len();
        let segment_duration = scene.duration / count as f32;
        let local = (time - scene.start).max(0.0);
        let segment_index = ((local / segment_duration) as usize).min(count - 1);
        let alpha =
            ((local - segment_index as f32 * segment_duration) / segment_duration).clamp(0.0, 1.0);

        CinematicSample {
            scene: scene_index,
            segment: segment_index,
            alpha,
            transform: scene.segments[segment_index].sample(alpha),
        }
    }
}

/// Identifies one activation of the sequencer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(pub u64);

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "run#{}", self.0)
    }
}

/// Playback state of the current run
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CinematicRunState {
    pub elapsed: f32,
    pub finished: bool,
}

/// Output of one sequencer tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CinematicFrame {
    pub sample: CinematicSample,
    /// Set on the single tick that finishes the active run
    pub completed: Option<RunId>,
}

impl CinematicFrame {
    pub fn transform(&self) -> CameraTransform {
        self.sample.transform
    }
}

/// Time-driven player for a [`CinematicScript`]
#[derive(Clone, Debug)]
pub struct CinematicSequencer {
    script: CinematicScript,
    state: CinematicRunState,
    run: Option<RunId>,
    next_run: u64,
}

impl CinematicSequencer {
    pub fn new(script: CinematicScript) -> Self {
        Self {
            script,
            state: CinematicRunState::default(),
            run: None,
            next_run: 1,
        }
    }

    pub fn script(&self) -> &CinematicScript {
        &self.script
    }

    pub fn state(&self) -> &CinematicRunState {
        &self.state
    }

    /// Active run, if any
    pub fn run(&self) -> Option<RunId> {
        self.run
    }

    /// Begin a new run from the top of the script
    pub fn start(&mut self) -> RunId {
        let run = RunId(self.next_run);
        self.next_run += 1;
        self.run = Some(run);
        self.state = CinematicRunState::default();
        debug!("cinematic {} started, {}s", run, self.script.total_duration());
        run
    }

    /// Drop the active run; its completion will never be reported
    pub fn abandon(&mut self) -> Option<RunId> {
        let run = self.run.take();
        if let Some(run) = run {
            debug!("cinematic {} abandoned at {}s", run, self.state.elapsed);
        }
        run
    }

    /// Advance by `dt` seconds
    pub fn tick(&mut self, dt: f32) -> CinematicFrame {
        if dt.is_finite() && dt > 0.0 {
            self.state.elapsed += dt;
        }

        let total = self.script.total_duration();
        if self.state.elapsed >= total {
            self.state.elapsed = total;
        }

        let mut completed = None;
        if self.state.elapsed >= total && !self.state.finished {
            self.state.finished = true;
            match self.run {
                Some(run) => {
                    debug!("cinematic {} finished", run);
                    completed = Some(run);
                }
                None => trace!("finished without an active run"),
            }
        }

        CinematicFrame {
            sample: self.script.pose_at(self.state.elapsed),
            completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SessionConfig, Waypoint};
    use vista_core::Orientation;

    fn default_script() -> CinematicScript {
        SessionConfig::default().cinematic.script().unwrap()
    }

    fn scene(duration: f32, count: usize) -> SceneConfig {
        SceneConfig {
            duration,
            easing: Easing::Smoothstep,
            waypoints: (0..count)
                .map(|i| {
                    Waypoint::new(
                        Vec3::new(i as f32, 0.0, 0.0),
                        Orientation::yaw(i as f32 * 10.0),
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn test_validation() {
        assert_eq!(CinematicScript::new(&[]).unwrap_err(), ScriptError::Empty);
        assert_eq!(
            CinematicScript::new(&[scene(8.0, 1)]).unwrap_err(),
            ScriptError::TooFewWaypoints { scene: 0, count: 1 }
        );
        assert_eq!(
            CinematicScript::new(&[scene(8.0, 2), scene(0.0, 2)]).unwrap_err(),
            ScriptError::BadDuration {
                scene: 1,
                duration: 0.0
            }
        );
        let mut bad = scene(8.0, 3);
        bad.waypoints[2].position.y = f32::INFINITY;
        assert_eq!(
            CinematicScript::new(&[bad]).unwrap_err(),
            ScriptError::NonFinite {
                scene: 0,
                waypoint: 2
            }
        );
    }

    #[test]
    fn test_default_script_shape() {
        let script = default_script();
        assert_eq!(script.total_duration(), 32.0);
        assert_eq!(script.scene_count(), 4);
        assert_eq!(script.segments().count(), 7);
    }

    #[test]
    fn test_bucketing_uses_strict_boundaries() {
        let script = default_script();

        let at = |t| {
            let s = script.pose_at(t);
            (s.scene, s.segment)
        };
        assert_eq!(at(0.0), (0, 0));
        assert_eq!(at(7.99), (0, 0));
        assert_eq!(at(8.0), (1, 0));
        assert_eq!(at(19.99), (2, 0));
        assert_eq!(at(20.0), (2, 1));
        assert_eq!(at(24.0), (3, 0));
        assert_eq!(at(31.99), (3, 2));

        let boundary = script.pose_at(20.0);
        assert_eq!(boundary.alpha, 0.0);
    }

    #[test]
    fn test_segments_share_endpoints_within_scene() {
        let script = default_script();
        let segments: Vec<_> = script.segments().collect();

        for pair in segments.windows(2) {
            let ((scene_a, a), (scene_b, b)) = (pair[0], pair[1]);
            if scene_a == scene_b {
                assert_eq!(a.sample(1.0), b.sample(0.0));
            }
        }
    }

    #[test]
    fn test_starts_at_first_waypoint() {
        let script = default_script();
        assert_eq!(script.pose_at(0.0).transform, script.first_segment().start());
        assert_eq!(script.pose_at(-1.0).transform, script.first_segment().start());
    }

    #[test]
    fn test_end_clamps_to_last_waypoint() {
        let script = default_script();
        let end = script.pose_at(32.0);
        assert_eq!((end.scene, end.segment, end.alpha), (3, 2, 1.0));
        assert_eq!(end.transform, script.last_segment().end());
        assert_eq!(script.pose_at(1000.0), end);
    }

    #[test]
    fn test_completes_exactly_once() {
        let mut sequencer = CinematicSequencer::new(default_script());
        let run = sequencer.start();

        let mut completions = Vec::new();
        for _ in 0..(40 * 60) {
            let frame = sequencer.tick(1.0 / 60.0);
            completions.extend(frame.completed);
        }
        assert_eq!(completions, vec![run]);
        assert!(sequencer.state().finished);
        assert_eq!(sequencer.state().elapsed, 32.0);
    }

    #[test]
    fn test_restart_resets_run() {
        let mut sequencer = CinematicSequencer::new(default_script());
        let first = sequencer.start();
        assert_eq!(sequencer.tick(40.0).completed, Some(first));

        let second = sequencer.start();
        assert_ne!(first, second);
        assert_eq!(*sequencer.state(), CinematicRunState::default());
        assert_eq!(sequencer.tick(40.0).completed, Some(second));
    }

    #[test]
    fn test_abandoned_run_never_completes() {
        let mut sequencer = CinematicSequencer::new(default_script());
        let run = sequencer.start();
        sequencer.tick(10.0);

        assert_eq!(sequencer.abandon(), Some(run));
        assert_eq!(sequencer.tick(40.0).completed, None);
        assert_eq!(sequencer.abandon(), None);
    }

    #[test]
    fn test_linear_easing_midpoint() {
        let mut linear = scene(2.0, 2);
        linear.easing = Easing::Linear;
        let script = CinematicScript::new(&[linear]).unwrap();

        let mid = script.pose_at(0.5);
        assert!((mid.transform.position.x - 0.25).abs() < 1e-6);
    }
}
