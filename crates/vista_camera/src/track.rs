//! Keyframe orientation track
//!
//! Maps path progress to camera facing. Keyframes are authored as Euler
//! angles and converted to quaternions once, at construction; lookups blend
//! the bracketing pair with shortest-path slerp.

use crate::error::TrackError;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use vista_core::{Orientation, Quat};

/// A facing anchored at a point along the path
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrientationKeyframe {
    /// Path progress (0.0 to 1.0)
    pub progress: f32,
    /// Facing at this progress, degrees
    pub rotation: Orientation,
}

impl OrientationKeyframe {
    pub const fn new(progress: f32, rotation: Orientation) -> Self {
        Self { progress, rotation }
    }
}

#[derive(Clone, Copy, Debug)]
struct ResolvedKeyframe {
    progress: f32,
    rotation: Quat,
}

/// Ordered orientation keyframes
///
/// Invariants, checked by [`OrientationTrack::new`]: at least two entries,
/// the first at progress 0, the last at progress 1, strictly ascending.
#[derive(Clone, Debug)]
pub struct OrientationTrack {
    keyframes: SmallVec<[ResolvedKeyframe; 8]>,
}

impl OrientationTrack {
    pub fn new(keyframes: &[OrientationKeyframe]) -> Result<Self, TrackError> {
        if keyframes.len() < 2 {
            return Err(TrackError::TooFewKeyframes(keyframes.len()));
        }

        for (index, kf) in keyframes.iter().enumerate() {
            if !kf.progress.is_finite() || !kf.rotation.is_finite() {
                return Err(TrackError::NonFinite(index));
            }
            if index > 0 {
                let previous = keyframes[index - 1].progress;
                if kf.progress <= previous {
                    return Err(TrackError::NotAscending {
                        index,
                        previous,
                        progress: kf.progress,
                    });
                }
            }
        }

        let first = keyframes[0].progress;
        if first != 0.0 {
            return Err(TrackError::BadStart(first));
        }
        let last = keyframes[keyframes.len() - 1].progress;
        if last != 1.0 {
            return Err(TrackError::BadEnd(last));
        }

        Ok(Self {
            keyframes: keyframes
                .iter()
                .map(|kf| ResolvedKeyframe {
                    progress: kf.progress,
                    rotation: Quat::from_orientation(kf.rotation),
                })
                .collect(),
        })
    }

    /// Number of keyframes
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Always false; a valid track has at least two keyframes
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Progress values of every keyframe, ascending
    pub fn progress_marks(&self) -> impl Iterator<Item = f32> + '_ {
        self.keyframes.iter().map(|kf| kf.progress)
    }

    /// Indices of the keyframe pair bracketing `progress` and the local ratio
    ///
    /// Progress outside [0, 1] uses the first or last pair and clamps the
    /// ratio, so it resolves to the end keyframe itself.
    fn bracket(&self, progress: f32) -> (usize, usize, f32) {
        let last = self.keyframes.len() - 1;
        let progress = if progress.is_nan() { 0.0 } else { progress };

        // First pair with prev <= p <= next; before the start or past the
        // end falls back to the first or last pair
        let i = if progress <= self.keyframes[0].progress {
            0
        } else {
            self.keyframes
                .windows(2)
                .position(|w| progress >= w[0].progress && progress <= w[1].progress)
                .unwrap_or(last - 1)
        };

        let (start, end) = (&self.keyframes[i], &self.keyframes[i + 1]);
        let range = end.progress - start.progress;
        let ratio = if range == 0.0 {
            0.0
        } else {
            ((progress - start.progress) / range).clamp(0.0, 1.0)
        };
        (i, i + 1, ratio)
    }

    /// Blended orientation at `progress`
    pub fn blend(&self, progress: f32) -> Quat {
        let (a, b, ratio) = self.bracket(progress);
        self.keyframes[a]
            .rotation
            .slerp(self.keyframes[b].rotation, ratio)
    }
}
