//! Session scripts
//!
//! A session script is a TOML list of timed input events that stands in for
//! a real user. `vista run` replays one against a director.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use vista_camera::InputEvent;

/// Built-in journey used when no script is given
const JOURNEY: &str = include_str!("../scripts/journey.toml");

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionScript {
    /// Seconds to simulate
    pub duration: f32,
    /// Seconds between pose samples in the report
    pub sample_every: f32,
    pub steps: Vec<ScriptStep>,
}

impl Default for SessionScript {
    fn default() -> Self {
        Self {
            duration: 60.0,
            sample_every: 1.0,
            steps: Vec::new(),
        }
    }
}

/// One scripted input, optionally repeated
#[derive(Debug, Deserialize, Serialize)]
pub struct ScriptStep {
    pub at: f32,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
    #[serde(default)]
    pub every: f32,
    pub event: InputEvent,
}

fn default_repeat() -> u32 {
    1
}

impl SessionScript {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let script: Self = toml::from_str(text).context("Failed to parse session script")?;
        script.validate()?;
        Ok(script)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("Invalid script {}", path.display()))
    }

    /// The built-in journey through the default session
    pub fn journey() -> Result<Self> {
        Self::from_toml_str(JOURNEY).context("Built-in journey script is invalid")
    }

    fn validate(&self) -> Result<()> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            anyhow::bail!("duration must be positive, got {}", self.duration);
        }
        if !self.sample_every.is_finite() || self.sample_every <= 0.0 {
            anyhow::bail!("sample_every must be positive, got {}", self.sample_every);
        }
        for (index, step) in self.steps.iter().enumerate() {
            if !step.at.is_finite() || step.at < 0.0 {
                anyhow::bail!("step {} starts at invalid time {}", index, step.at);
            }
            if step.repeat == 0 {
                anyhow::bail!("step {} repeats zero times", index);
            }
            if !step.every.is_finite() || step.every < 0.0 {
                anyhow::bail!("step {} has invalid interval {}", index, step.every);
            }
        }
        Ok(())
    }

    /// Expand every step into a single ordered timeline
    pub fn timeline(&self) -> Timeline {
        let mut timeline = Timeline::default();
        for step in &self.steps {
            for i in 0..step.repeat {
                timeline.schedule(step.at + step.every * i as f32, step.event.clone());
            }
        }
        timeline
    }
}

#[derive(Debug)]
struct TimedEvent {
    at: f32,
    order: u64,
    event: InputEvent,
}

/// Input events waiting for their time
///
/// Events due at the same time come out in the order they were scheduled.
#[derive(Debug, Default)]
pub struct Timeline {
    pending: Vec<TimedEvent>,
    next_order: u64,
}

impl Timeline {
    pub fn schedule(&mut self, at: f32, event: InputEvent) {
        let entry = TimedEvent {
            at,
            order: self.next_order,
            event,
        };
        self.next_order += 1;

        let index = self
            .pending
            .partition_point(|e| e.at.total_cmp(&at).is_le());
        self.pending.insert(index, entry);
    }

    /// Remove and return everything due at or before `now`
    pub fn due(&mut self, now: f32) -> Vec<InputEvent> {
        let split = self.pending.partition_point(|e| e.at <= now);
        self.pending.drain(..split).map(|e| e.event).collect()
    }

    /// Drop pending events matching `pred`, returning how many went
    pub fn cancel(&mut self, mut pred: impl FnMut(&InputEvent) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|e| !pred(&e.event));
        before - self.pending.len()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vista_camera::ScrollDelta;

    #[test]
    fn test_journey_parses() {
        let script = SessionScript::journey().unwrap();
        assert_eq!(script.duration, 75.0);
        assert_eq!(script.steps[0].repeat, 60);
        assert_eq!(script.timeline().len(), 60 + 220 + 7);
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let script = SessionScript::from_toml_str(
            r#"
            [[steps]]
            at = 1.5
            event = { kind = "begin_credits", run = 3 }
            "#,
        )
        .unwrap();

        assert_eq!(script.duration, 60.0);
        assert_eq!(script.steps[0].repeat, 1);
        assert_eq!(script.steps[0].event, InputEvent::BeginCredits { run: 3 });
    }

    #[test]
    fn test_cancel_drops_matching_events() {
        let mut timeline = Timeline::default();
        timeline.schedule(1.0, InputEvent::BeginCredits { run: 1 });
        timeline.schedule(2.0, InputEvent::ChestOpened);
        timeline.schedule(3.0, InputEvent::BeginCredits { run: 2 });

        let dropped = timeline.cancel(|e| *e == InputEvent::BeginCredits { run: 1 });
        assert_eq!(dropped, 1);
        assert_eq!(
            timeline.due(5.0),
            vec![InputEvent::ChestOpened, InputEvent::BeginCredits { run: 2 }]
        );
    }

    #[test]
    fn test_rejects_bad_steps() {
        assert!(SessionScript::from_toml_str("duration = 0.0").is_err());
        assert!(SessionScript::from_toml_str(
            r#"
            [[steps]]
            at = -1.0
            event = { kind = "chest_opened" }
            "#
        )
        .is_err());
        assert!(SessionScript::from_toml_str(
            r#"
            [[steps]]
            at = 1.0
            event = { kind = "teleport" }
            "#
        )
        .is_err());
    }

    #[test]
    fn test_timeline_orders_by_time_then_insertion() {
        let mut timeline = Timeline::default();
        timeline.schedule(2.0, InputEvent::ChestOpened);
        timeline.schedule(1.0, InputEvent::scroll(ScrollDelta::Pixels(1.0)));
        timeline.schedule(1.0, InputEvent::scroll(ScrollDelta::Pixels(2.0)));

        assert!(timeline.due(0.5).is_empty());
        assert_eq!(
            timeline.due(1.0),
            vec![
                InputEvent::scroll(ScrollDelta::Pixels(1.0)),
                InputEvent::scroll(ScrollDelta::Pixels(2.0)),
            ]
        );
        assert_eq!(timeline.due(10.0), vec![InputEvent::ChestOpened]);
        assert!(timeline.is_empty());
    }

    #[test]
    fn test_repeat_expands() {
        let script = SessionScript::from_toml_str(
            r#"
            [[steps]]
            at = 1.0
            repeat = 3
            every = 0.5
            event = { kind = "scroll", delta = { lines = 1.0 } }
            "#,
        )
        .unwrap();

        let mut timeline = script.timeline();
        assert_eq!(timeline.due(1.0).len(), 1);
        assert_eq!(timeline.due(2.0).len(), 2);
    }
}
