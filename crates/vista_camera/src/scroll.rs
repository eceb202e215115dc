//! Scroll-to-progress controller
//!
//! Turns wheel and drag deltas into a target progress. The camera never
//! jumps to the target; [`PathCamera`](crate::PathCamera) closes on it with
//! damping every frame.

use crate::checkpoint::Checkpoints;
use crate::config::ScrollConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Pixels per wheel line
pub const LINE_PIXELS: f32 = 40.0;
/// Pixels per wheel page
pub const PAGE_PIXELS: f32 = 800.0;

/// Current and target progress along the path
///
/// Neither value is bounded; both are clamped to [0, 1] only when sampled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollState {
    pub current: f32,
    pub target: f32,
}

impl ScrollState {
    pub fn at(progress: f32) -> Self {
        Self {
            current: progress,
            target: progress,
        }
    }

    /// `current` clamped for sampling
    pub fn progress(&self) -> f32 {
        self.current.clamp(0.0, 1.0)
    }
}

/// A raw scroll delta, positive toward the end of the path
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDelta {
    Pixels(f32),
    Lines(f32),
    Pages(f32),
}

impl ScrollDelta {
    /// Normalize to pixels
    pub fn pixels(self) -> f32 {
        match self {
            ScrollDelta::Pixels(px) => px,
            ScrollDelta::Lines(lines) => lines * LINE_PIXELS,
            ScrollDelta::Pages(pages) => pages * PAGE_PIXELS,
        }
    }
}

/// Result of applying one delta
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScrollOutcome {
    /// Target moved by the full step
    Moved,
    /// Forward step stopped exactly at a locked checkpoint
    Pinned {
        checkpoint: usize,
        /// The stuck signal was raised by this delta
        newly_stuck: bool,
    },
    /// Moved back far enough to clear the stuck signal
    Released { checkpoint: usize },
    /// Zero or non-finite delta
    Ignored,
}

/// Wheel handler state: scroll target plus the stuck signal
#[derive(Clone, Debug)]
pub struct ScrollController {
    config: ScrollConfig,
    state: ScrollState,
    stuck: Option<usize>,
}

impl ScrollController {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            config,
            state: ScrollState::default(),
            stuck: None,
        }
    }

    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ScrollState {
        &mut self.state
    }

    /// Checkpoint currently holding the camera, if any
    pub fn stuck(&self) -> Option<usize> {
        self.stuck
    }

    /// Progress change for a delta before checkpoint gating
    pub fn step_for(&self, delta: ScrollDelta) -> f32 {
        let px = delta.pixels();
        if !px.is_finite() || px == 0.0 {
            return 0.0;
        }
        let ratio = (px.abs() / self.config.pixel_scale).min(self.config.max_ratio);
        px.signum() * self.config.speed * ratio
    }

    /// Apply one delta to the target, gated by the lowest locked checkpoint
    pub fn on_scroll_delta(
        &mut self,
        delta: ScrollDelta,
        checkpoints: &Checkpoints,
    ) -> ScrollOutcome {
        let step = self.step_for(delta);
        if step == 0.0 {
            trace!("ignoring empty scroll delta {:?}", delta);
            return ScrollOutcome::Ignored;
        }

        let proposed = self.state.target + step;

        if let Some((index, threshold)) = checkpoints.next_locked() {
            if step > 0.0 && proposed > threshold {
                self.state.target = threshold;
                let newly_stuck = self.stuck != Some(index);
                if newly_stuck {
                    debug!("scroll pinned at checkpoint {} ({})", index, threshold);
                    self.stuck = Some(index);
                }
                return ScrollOutcome::Pinned {
                    checkpoint: index,
                    newly_stuck,
                };
            }
        }

        self.state.target = proposed;

        if let Some(index) = self.stuck {
            let released = checkpoints
                .get(index)
                .is_some_and(|c| proposed < c.progress - self.config.release_margin);
            if released {
                debug!("scrolled back from checkpoint {}", index);
                self.stuck = None;
                return ScrollOutcome::Released { checkpoint: index };
            }
        }

        ScrollOutcome::Moved
    }

    /// Drop the stuck signal. Returns the checkpoint it was held at.
    pub fn clear_stuck(&mut self) -> Option<usize> {
        self.stuck.take()
    }
}
