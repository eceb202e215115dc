//! Headless session driver
//!
//! Plays the part of the presentation layer: feeds scripted input into the
//! director at a fixed frame rate, adds the timed transitions a real front
//! end would (the flash before the cinematic, the pause before credits) and
//! reports what happens.

use crate::script::{SessionScript, Timeline};
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use tracing::info;
use vista_camera::{CameraSink, CameraTransform, Director, DirectorEvent, DirectorState, InputEvent};

/// Seconds of white flash between clicking the last character and the cinematic
pub const TRIGGER_DELAY: f32 = 3.0;
/// Seconds between the end of the cinematic and the credits
pub const CREDITS_DELAY: f32 = 8.0;

/// Schedules the transitions a front end owns
#[derive(Debug)]
pub struct Presenter {
    final_character: String,
}

impl Presenter {
    pub fn new(final_character: impl Into<String>) -> Self {
        Self {
            final_character: final_character.into(),
        }
    }

    /// React to input about to reach the director
    pub fn on_input(&self, now: f32, event: &InputEvent, timeline: &mut Timeline) {
        if let InputEvent::InteractionOpened { character } = event {
            if *character == self.final_character {
                info!("{} reached, cinematic in {}s", character, TRIGGER_DELAY);
                timeline.schedule(now + TRIGGER_DELAY, InputEvent::FinalCharacterTriggered);
            }
        }
    }

    /// React to something the director reported
    pub fn on_event(&self, now: f32, event: &DirectorEvent, timeline: &mut Timeline) {
        match event {
            DirectorEvent::CinematicCompleted { run } => {
                timeline.schedule(now + CREDITS_DELAY, InputEvent::BeginCredits { run: *run });
            }
            DirectorEvent::CinematicAbandoned { run } => {
                let dropped = timeline.cancel(|e| *e == InputEvent::BeginCredits { run: *run });
                if dropped > 0 {
                    info!("credits for run#{} called off", run);
                }
            }
            _ => {}
        }
    }
}

/// Report format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

#[derive(Serialize)]
struct EventRecord<'a> {
    t: f32,
    #[serde(flatten)]
    event: &'a DirectorEvent,
}

#[derive(Serialize)]
struct PoseRecord {
    t: f32,
    state: String,
    progress: f32,
    position: [f32; 3],
    /// Euler degrees
    rotation: [f32; 3],
}

impl PoseRecord {
    fn new(t: f32, director: &Director, pose: &CameraTransform) -> Self {
        Self {
            t,
            state: format!("{:?}", director.state()),
            progress: director.scroll().progress(),
            position: pose.position.to_array(),
            rotation: pose.rotation.to_orientation().into(),
        }
    }
}

/// Writes events and pose samples as text or JSON lines
pub struct Reporter<W: Write> {
    format: Format,
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(format: Format, out: W) -> Self {
        Self { format, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn event(&mut self, t: f32, event: &DirectorEvent) -> Result<()> {
        match self.format {
            Format::Text => writeln!(self.out, "[{t:7.2}s] {event}")?,
            Format::Json => {
                serde_json::to_writer(&mut self.out, &EventRecord { t, event })?;
                writeln!(self.out)?;
            }
        }
        Ok(())
    }

    fn pose(&mut self, record: &PoseRecord) -> Result<()> {
        match self.format {
            Format::Text => {
                let [x, y, z] = record.position;
                let [rx, ry, rz] = record.rotation;
                writeln!(
                    self.out,
                    "[{:7.2}s] {:<9} p={:.3} pos=({:.2}, {:.2}, {:.2}) rot=({:.1}, {:.1}, {:.1})",
                    record.t, record.state, record.progress, x, y, z, rx, ry, rz
                )?;
            }
            Format::Json => {
                serde_json::to_writer(&mut self.out, record)?;
                writeln!(self.out)?;
            }
        }
        Ok(())
    }
}

/// Render target that remembers what it was given
#[derive(Debug, Default)]
pub struct PoseLog {
    pub last: Option<CameraTransform>,
    pub written: u64,
}

impl CameraSink for PoseLog {
    fn write_pose(&mut self, transform: &CameraTransform) {
        self.last = Some(*transform);
        self.written += 1;
    }
}

/// What a finished session looked like
#[derive(Debug)]
pub struct SessionSummary {
    pub frames: u64,
    pub poses_written: u64,
    pub final_state: DirectorState,
    pub last_pose: Option<CameraTransform>,
    pub events: Vec<DirectorEvent>,
}

/// Replay `script` against `director` at `fps` frames per second
pub fn run_session<W: Write>(
    director: &mut Director,
    script: &SessionScript,
    fps: u32,
    reporter: &mut Reporter<W>,
) -> Result<SessionSummary> {
    if fps == 0 {
        anyhow::bail!("frame rate must be at least 1");
    }

    let presenter = Presenter::new(director.final_character());
    let mut timeline = script.timeline();
    let mut sink = PoseLog::default();
    let mut history = Vec::new();

    info!(
        "replaying {} scripted inputs over {}s at {} fps",
        timeline.len(),
        script.duration,
        fps
    );

    let dt = 1.0 / fps as f32;
    let frames = (script.duration * fps as f32).ceil() as u64;
    let mut next_sample = 0.0;

    for frame in 0..frames {
        let now = frame as f32 * dt;

        for event in timeline.due(now) {
            presenter.on_input(now, &event, &mut timeline);
            director.push(event);
        }

        let pose = director.frame(dt, &mut sink);

        let events: Vec<_> = director.drain_events().collect();
        for event in &events {
            reporter.event(now, event)?;
            presenter.on_event(now, event, &mut timeline);
        }
        history.extend(events);

        if now >= next_sample {
            if let Some(pose) = pose {
                reporter.pose(&PoseRecord::new(now, director, &pose))?;
            }
            next_sample += script.sample_every;
        }
    }

    Ok(SessionSummary {
        frames,
        poses_written: sink.written,
        final_state: director.state(),
        last_pose: sink.last,
        events: history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vista_camera::SessionConfig;

    #[test]
    fn test_journey_reaches_credits() {
        let mut director = Director::new(&SessionConfig::default()).unwrap();
        let script = SessionScript::journey().unwrap();
        let mut reporter = Reporter::new(Format::Text, Vec::new());

        let summary = run_session(&mut director, &script, 60, &mut reporter).unwrap();

        assert_eq!(summary.final_state, DirectorState::Credits);
        assert_eq!(summary.poses_written, summary.frames);

        let position = |wanted: &DirectorEvent| summary.events.iter().position(|e| e == wanted);
        let stuck = position(&DirectorEvent::StuckAtCheckpoint { checkpoint: 0 });
        let unlocked = position(&DirectorEvent::CheckpointUnlocked {
            checkpoint: 0,
            character: "villager-1".to_string(),
        });
        let started = position(&DirectorEvent::CinematicStarted { run: 1 });
        let completed = position(&DirectorEvent::CinematicCompleted { run: 1 });
        let credits = position(&DirectorEvent::CreditsStarted);

        assert!(stuck < unlocked);
        assert!(unlocked < started);
        assert!(started < completed);
        assert!(completed < credits);
        assert!(credits.is_some());
        assert!(summary.events.contains(&DirectorEvent::FinalPromptRevealed));

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(text.contains("credits started"));
    }

    #[test]
    fn test_json_lines() {
        let mut director = Director::new(&SessionConfig::default()).unwrap();
        let script = SessionScript::from_toml_str(
            r#"
            duration = 2.0

            [[steps]]
            at = 0.5
            event = { kind = "select_mode", mode = "Free" }
            "#,
        )
        .unwrap();
        let mut reporter = Reporter::new(Format::Json, Vec::new());

        let summary = run_session(&mut director, &script, 30, &mut reporter).unwrap();
        assert_eq!(summary.final_state, DirectorState::Free);

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(lines[0]["state"], "Path");
        assert!(lines
            .iter()
            .any(|l| l["event"] == "mode_changed" && l["mode"] == "Free"));
    }

    #[test]
    fn test_credits_wait_for_the_run_that_finished() {
        let mut config = SessionConfig::default();
        config.cinematic.scenes.truncate(1);
        config.cinematic.scenes[0].duration = 2.0;
        let mut director = Director::new(&config).unwrap();

        // Run 1 finishes around 5s, the user leaves and comes back, run 2
        // finishes around 12s while run 1's credits were due at 13s
        let script = SessionScript::from_toml_str(
            r#"
            duration = 25.0

            [[steps]]
            at = 0.0
            event = { kind = "interaction_opened", character = "villager-4" }

            [[steps]]
            at = 6.0
            event = { kind = "select_mode", mode = "Free" }

            [[steps]]
            at = 6.5
            event = { kind = "select_mode", mode = "Path" }

            [[steps]]
            at = 7.0
            event = { kind = "interaction_opened", character = "villager-4" }
            "#,
        )
        .unwrap();
        let mut reporter = Reporter::new(Format::Json, Vec::new());

        let summary = run_session(&mut director, &script, 60, &mut reporter).unwrap();
        assert_eq!(summary.final_state, DirectorState::Credits);
        assert!(summary
            .events
            .contains(&DirectorEvent::CinematicAbandoned { run: 1 }));

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        let time_of = |event: &str, run: Option<u64>| -> Vec<f64> {
            lines
                .iter()
                .filter(|l| l["event"] == event)
                .filter(|l| run.map_or(true, |r| l["run"] == r))
                .map(|l| l["t"].as_f64().unwrap())
                .collect()
        };

        let completed = time_of("cinematic_completed", Some(2));
        let credits = time_of("credits_started", None);
        assert_eq!(completed.len(), 1);
        assert_eq!(credits.len(), 1);
        assert!(credits[0] - completed[0] >= (CREDITS_DELAY - 0.05) as f64);
    }

    #[test]
    fn test_zero_fps_rejected() {
        let mut director = Director::new(&SessionConfig::default()).unwrap();
        let script = SessionScript::default();
        let mut reporter = Reporter::new(Format::Text, Vec::new());
        assert!(run_session(&mut director, &script, 0, &mut reporter).is_err());
    }
}
