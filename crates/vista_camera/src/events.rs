//! Director input and output events

use crate::cinematic::RunId;
use crate::scroll::ScrollDelta;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Camera control the user has picked
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraMode {
    /// Orbit controls owned by the host
    Free,
    /// Scroll-driven path
    #[default]
    Path,
}

impl fmt::Display for CameraMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraMode::Free => write!(f, "Free"),
            CameraMode::Path => write!(f, "Path"),
        }
    }
}

/// Unknown camera mode name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown camera mode '{0}', expected 'Path' or 'Free'")]
pub struct ParseModeError(pub String);

impl FromStr for CameraMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Path" | "path" => Ok(CameraMode::Path),
            "Free" | "free" => Ok(CameraMode::Free),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

/// Signals a host queues on the director between frames
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputEvent {
    /// Wheel or drag delta
    Scroll { delta: ScrollDelta },
    /// User picked a camera mode
    SelectMode { mode: CameraMode },
    /// A character's dialog opened
    InteractionOpened { character: String },
    /// A character's dialog closed
    InteractionClosed { character: String },
    /// The final character was clicked
    FinalCharacterTriggered,
    /// The chest was clicked
    ChestOpened,
    /// Presentation layer is ready to roll credits after cinematic `run`
    BeginCredits { run: u64 },
}

impl InputEvent {
    pub fn scroll(delta: ScrollDelta) -> Self {
        InputEvent::Scroll { delta }
    }

    pub fn select(mode: CameraMode) -> Self {
        InputEvent::SelectMode { mode }
    }

    pub fn opened(character: impl Into<String>) -> Self {
        InputEvent::InteractionOpened {
            character: character.into(),
        }
    }

    pub fn closed(character: impl Into<String>) -> Self {
        InputEvent::InteractionClosed {
            character: character.into(),
        }
    }

    pub fn begin_credits(run: RunId) -> Self {
        InputEvent::BeginCredits { run: run.0 }
    }
}

/// Outward notifications, drained with
/// [`Director::drain_events`](crate::Director::drain_events)
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DirectorEvent {
    ModeChanged { mode: CameraMode },
    /// Forward scrolling is being held at a checkpoint
    StuckAtCheckpoint { checkpoint: usize },
    StuckCleared { checkpoint: usize },
    InteractionCompleted { character: String },
    CheckpointUnlocked { checkpoint: usize, character: String },
    CinematicStarted { run: u64 },
    CinematicCompleted { run: u64 },
    CinematicAbandoned { run: u64 },
    CreditsStarted,
    FinalPromptRevealed,
}

impl DirectorEvent {
    pub(crate) fn started(run: RunId) -> Self {
        DirectorEvent::CinematicStarted { run: run.0 }
    }

    pub(crate) fn completed(run: RunId) -> Self {
        DirectorEvent::CinematicCompleted { run: run.0 }
    }

    pub(crate) fn abandoned(run: RunId) -> Self {
        DirectorEvent::CinematicAbandoned { run: run.0 }
    }
}

impl fmt::Display for DirectorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectorEvent::ModeChanged { mode } => write!(f, "mode changed to {mode}"),
            DirectorEvent::StuckAtCheckpoint { checkpoint } => {
                write!(f, "stuck at checkpoint {checkpoint}")
            }
            DirectorEvent::StuckCleared { checkpoint } => {
                write!(f, "released from checkpoint {checkpoint}")
            }
            DirectorEvent::InteractionCompleted { character } => {
                write!(f, "talked to {character}")
            }
            DirectorEvent::CheckpointUnlocked {
                checkpoint,
                character,
            } => write!(f, "checkpoint {checkpoint} unlocked by {character}"),
            DirectorEvent::CinematicStarted { run } => write!(f, "cinematic run#{run} started"),
            DirectorEvent::CinematicCompleted { run } => {
                write!(f, "cinematic run#{run} completed")
            }
            DirectorEvent::CinematicAbandoned { run } => {
                write!(f, "cinematic run#{run} abandoned")
            }
            DirectorEvent::CreditsStarted => write!(f, "credits started"),
            DirectorEvent::FinalPromptRevealed => write!(f, "final prompt revealed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parses() {
        assert_eq!("Path".parse::<CameraMode>(), Ok(CameraMode::Path));
        assert_eq!("Free".parse::<CameraMode>(), Ok(CameraMode::Free));
        assert_eq!("free".parse::<CameraMode>(), Ok(CameraMode::Free));
        assert!("Orbit".parse::<CameraMode>().is_err());
        assert_eq!(CameraMode::Free.to_string(), "Free");
    }

    #[test]
    fn test_input_event_toml() {
        #[derive(Deserialize)]
        struct Holder {
            events: Vec<InputEvent>,
        }

        let holder: Holder = toml::from_str(
            r#"
            events = [
                { kind = "scroll", delta = { pixels = 120.0 } },
                { kind = "select_mode", mode = "Free" },
                { kind = "interaction_opened", character = "villager-1" },
                { kind = "chest_opened" },
            ]
            "#,
        )
        .unwrap();

        assert_eq!(
            holder.events,
            vec![
                InputEvent::scroll(ScrollDelta::Pixels(120.0)),
                InputEvent::select(CameraMode::Free),
                InputEvent::opened("villager-1"),
                InputEvent::ChestOpened,
            ]
        );
    }

    #[test]
    fn test_director_event_json_shape() {
        let json = serde_json::to_string(&DirectorEvent::StuckAtCheckpoint { checkpoint: 0 }).unwrap();
        assert_eq!(json, r#"{"event":"stuck_at_checkpoint","checkpoint":0}"#);
    }
}
