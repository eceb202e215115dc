//! Vista Camera Engine
//!
//! Scroll-driven camera timeline for a guided 3D journey.
//!
//! # Features
//!
//! - **Path Camera**: Catmull-Rom path with keyframed facing and damped travel
//! - **Scroll Control**: wheel deltas to target progress, held at checkpoints
//! - **Checkpoints**: progress gates unlocked by talking to a character
//! - **Cinematics**: multi-scene scripted fly-through, completing once per run
//! - **Credits**: frame-rate independent drift toward a closing pose
//! - **Director**: per-frame state machine over Free / Path / Cinematic / Credits
//!
//! # Example
//!
//! ```rust
//! use vista_camera::{Director, InputEvent, ScrollDelta, SessionConfig};
//!
//! let mut director = Director::new(&SessionConfig::default()).unwrap();
//! director.push(InputEvent::scroll(ScrollDelta::Pixels(120.0)));
//!
//! let pose = director.update(1.0 / 60.0).unwrap();
//! assert!(pose.position.is_finite());
//! ```

pub mod checkpoint;
pub mod cinematic;
pub mod config;
pub mod credits;
pub mod director;
pub mod error;
pub mod events;
pub mod interaction;
pub mod path;
pub mod scroll;
pub mod track;
pub mod transform;


pub use checkpoint::{Checkpoint, Checkpoints};
pub use cinematic::{
    CinematicFrame, CinematicRunState, CinematicSample, CinematicScript, CinematicSegment,
    CinematicSequencer, RunId,
};
pub use config::{
    CheckpointConfig, CinematicConfig, CreditsConfig, PathConfig, SceneConfig, ScrollConfig,
    SessionConfig, Waypoint,
};
pub use credits::CreditsApproach;
pub use director::{Director, DirectorState};
pub use error::{ConfigError, Result, ScriptError, TrackError};
pub use events::{CameraMode, DirectorEvent, InputEvent, ParseModeError};
pub use interaction::InteractionGate;
pub use path::{PathCamera, ScrubOverride};
pub use scroll::{ScrollController, ScrollDelta, ScrollOutcome, ScrollState};
pub use track::{OrientationKeyframe, OrientationTrack};
pub use transform::{CameraSink, CameraTransform};
