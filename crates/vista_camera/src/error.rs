//! Error types for vista_camera
//!
//! Every error here is a configuration error raised while building the
//! engine. Frame updates never fail.

use thiserror::Error;
use vista_core::CurveError;

/// Errors in an orientation keyframe table
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackError {
    /// Fewer than two keyframes
    #[error("orientation track needs at least 2 keyframes, got {0}")]
    TooFewKeyframes(usize),

    /// First keyframe is not at progress 0
    #[error("first keyframe must be at progress 0, found {0}")]
    BadStart(f32),

    /// Last keyframe is not at progress 1
    #[error("last keyframe must be at progress 1, found {0}")]
    BadEnd(f32),

    /// Progress values are not strictly ascending
    #[error("keyframe {index} at progress {progress} does not follow {previous}")]
    NotAscending {
        index: usize,
        previous: f32,
        progress: f32,
    },

    /// NaN or infinite progress or angle
    #[error("keyframe {0} has a non-finite value")]
    NonFinite(usize),
}

/// Errors in a cinematic script
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    /// Script has no scenes
    #[error("cinematic script has no scenes")]
    Empty,

    /// Scene has fewer than two waypoints, so no segment to play
    #[error("scene {scene} needs at least 2 waypoints, got {count}")]
    TooFewWaypoints { scene: usize, count: usize },

    /// Scene duration is zero, negative or not finite
    #[error("scene {scene} has invalid duration {duration}")]
    BadDuration { scene: usize, duration: f32 },

    /// Waypoint has a NaN or infinite component
    #[error("scene {scene} waypoint {waypoint} has a non-finite value")]
    NonFinite { scene: usize, waypoint: usize },
}

/// Errors building a session from configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Camera path control points are invalid
    #[error("camera path: {0}")]
    Curve(#[from] CurveError),

    /// Orientation keyframes are invalid
    #[error("orientation track: {0}")]
    Track(#[from] TrackError),

    /// Cinematic script is invalid
    #[error("cinematic script: {0}")]
    Script(#[from] ScriptError),

    /// Checkpoint list is invalid
    #[error("checkpoint {index}: {reason}")]
    Checkpoint { index: usize, reason: String },

    /// Scroll or damping tuning is invalid
    #[error("tuning: {0}")]
    Tuning(String),

    /// Configuration text could not be parsed
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration file could not be read
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for vista_camera construction
pub type Result<T> = std::result::Result<T, ConfigError>;
