//! Session configuration
//!
//! Every tunable of a session lives in one [`SessionConfig`]. The defaults
//! are the production journey; a TOML file may override any section and
//! missing sections fall back to the defaults.
//!
//! ```toml
//! final_character = "villager-4"
//!
//! [path]
//! damping_rate = 2.0
//!
//! [[checkpoints]]
//! progress = 0.139
//! character = "villager-1"
//! ```

use crate::cinematic::CinematicScript;
use crate::error::{ConfigError, Result};
use crate::track::{OrientationKeyframe, OrientationTrack};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use vista_core::{CatmullRomCurve, CurveKind, Easing, Orientation, Vec3};

// =============================================================================
// Session
// =============================================================================

/// Complete configuration of one session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Character whose interaction starts the cinematic
    pub final_character: String,
    pub path: PathConfig,
    pub scroll: ScrollConfig,
    pub checkpoints: Vec<CheckpointConfig>,
    pub cinematic: CinematicConfig,
    pub credits: CreditsConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            final_character: "villager-4".to_string(),
            path: PathConfig::default(),
            scroll: ScrollConfig::default(),
            checkpoints: vec![CheckpointConfig {
                progress: 0.139,
                character: "villager-1".to_string(),
            }],
            cinematic: CinematicConfig::default(),
            credits: CreditsConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Render as pretty TOML
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Check every section without building a session
    pub fn validate(&self) -> Result<()> {
        self.path.curve()?;
        self.path.track()?;
        self.scroll.validate()?;
        validate_checkpoints(&self.checkpoints)?;
        self.cinematic.script()?;
        self.credits.validate()?;

        if !self.path.damping_rate.is_finite() || self.path.damping_rate <= 0.0 {
            return Err(ConfigError::Tuning(format!(
                "damping rate must be positive, got {}",
                self.path.damping_rate
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Path
// =============================================================================

/// Camera path: curve control points, damping and orientation keyframes
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    pub kind: CurveKind,
    /// Per-second rate at which the camera closes on the scroll target
    pub damping_rate: f32,
    pub points: Vec<Vec3>,
    pub keyframes: Vec<OrientationKeyframe>,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            kind: CurveKind::Centripetal,
            damping_rate: 2.0,
            points: vec![
                Vec3::new(21.42, 4.84, 48.16),
                Vec3::new(7.63, 5.75, 30.63),
                Vec3::new(16.85, 4.92, 23.44),
                Vec3::new(22.35, 2.42, -6.96),
                Vec3::new(10.83, 3.0, -21.16),
                Vec3::new(16.2, 11.57, 11.09),
                Vec3::new(7.25, 16.41, 10.9),
                Vec3::new(7.31, 16.74, -0.05),
                Vec3::new(-16.87, 15.34, -0.03),
            ],
            keyframes: vec![
                OrientationKeyframe::new(0.0, Orientation::yaw(21.0)),
                OrientationKeyframe::new(0.2, Orientation::yaw(180.0)),
                OrientationKeyframe::new(0.21, Orientation::yaw(0.0)),
                OrientationKeyframe::new(0.38, Orientation::yaw(180.0)),
                OrientationKeyframe::new(0.5, Orientation::yaw(27.0)),
                OrientationKeyframe::new(0.8, Orientation::yaw(69.0)),
                OrientationKeyframe::new(1.0, Orientation::yaw(90.0)),
            ],
        }
    }
}

impl PathConfig {
    pub fn curve(&self) -> Result<CatmullRomCurve> {
        Ok(CatmullRomCurve::with_kind(self.points.clone(), self.kind)?)
    }

    pub fn track(&self) -> Result<OrientationTrack> {
        Ok(OrientationTrack::new(&self.keyframes)?)
    }
}

// =============================================================================
// Scroll
// =============================================================================

/// Wheel and drag tuning
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Progress added by one normalized step
    pub speed: f32,
    /// Pixels per normalized step
    pub pixel_scale: f32,
    /// Largest step ratio a single delta may produce
    pub max_ratio: f32,
    /// Distance below a checkpoint at which the stuck signal clears
    pub release_margin: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            speed: 0.002,
            pixel_scale: 50.0,
            max_ratio: 2.0,
            release_margin: 0.05,
        }
    }
}

impl ScrollConfig {
    fn validate(&self) -> Result<()> {
        let fields = [
            ("speed", self.speed),
            ("pixel_scale", self.pixel_scale),
            ("max_ratio", self.max_ratio),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Tuning(format!(
                    "scroll {name} must be positive, got {value}"
                )));
            }
        }
        if !self.release_margin.is_finite() || self.release_margin < 0.0 {
            return Err(ConfigError::Tuning(format!(
                "scroll release_margin must not be negative, got {}",
                self.release_margin
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Checkpoints
// =============================================================================

/// A progress threshold held until `character` has been talked to
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckpointConfig {
    pub progress: f32,
    pub character: String,
}

pub(crate) fn validate_checkpoints(checkpoints: &[CheckpointConfig]) -> Result<()> {
    for (index, checkpoint) in checkpoints.iter().enumerate() {
        if !checkpoint.progress.is_finite()
            || checkpoint.progress <= 0.0
            || checkpoint.progress >= 1.0
        {
            return Err(ConfigError::Checkpoint {
                index,
                reason: format!("progress {} is outside (0, 1)", checkpoint.progress),
            });
        }
        if checkpoint.character.is_empty() {
            return Err(ConfigError::Checkpoint {
                index,
                reason: "gating character is empty".to_string(),
            });
        }
        if index > 0 && checkpoint.progress <= checkpoints[index - 1].progress {
            return Err(ConfigError::Checkpoint {
                index,
                reason: format!(
                    "progress {} does not follow {}",
                    checkpoint.progress,
                    checkpoints[index - 1].progress
                ),
            });
        }
    }
    Ok(())
}

// =============================================================================
// Cinematic
// =============================================================================

/// A camera pose authored in the cinematic script
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub position: Vec3,
    pub rotation: Orientation,
}

impl Waypoint {
    pub fn new(position: Vec3, rotation: Orientation) -> Self {
        Self { position, rotation }
    }
}

/// One scene: a chain of waypoints played over `duration` seconds
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub duration: f32,
    #[serde(default)]
    pub easing: Easing,
    pub waypoints: Vec<Waypoint>,
}

impl SceneConfig {
    fn new(duration: f32, waypoints: Vec<Waypoint>) -> Self {
        Self {
            duration,
            easing: Easing::Smoothstep,
            waypoints,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CinematicConfig {
    pub scenes: Vec<SceneConfig>,
}

impl Default for CinematicConfig {
    fn default() -> Self {
        let wp = |x, y, z, rx, ry, rz| {
            Waypoint::new(Vec3::new(x, y, z), Orientation::new(rx, ry, rz))
        };

        Self {
            scenes: vec![
                SceneConfig::new(
                    8.0,
                    vec![
                        wp(64.12, -5.37, -15.01, 127.0, 70.0, -128.0),
                        wp(36.97, -7.58, 49.77, 21.0, 32.0, -11.0),
                    ],
                ),
                SceneConfig::new(
                    8.0,
                    vec![
                        wp(-22.27, 6.87, -61.62, 175.0, -23.0, 178.0),
                        wp(35.51, 6.36, -18.39, 161.0, 62.0, -163.0),
                    ],
                ),
                SceneConfig::new(
                    8.0,
                    vec![
                        wp(-50.2, 12.75, -60.72, 160.0, -38.0, 167.0),
                        wp(-65.09, 26.97, 20.31, 5.0, -58.0, 4.0),
                        wp(46.5, 20.18, 44.17, 8.0, 56.0, -7.0),
                    ],
                ),
                SceneConfig::new(
                    8.0,
                    vec![
                        wp(-11.34, 35.58, 0.18, -96.0, 84.0, 96.0),
                        wp(24.57, 38.2, -0.19, -98.0, 86.0, 98.0),
                        wp(26.07, 17.55, -0.26, -98.0, 86.0, 98.0),
                        wp(-11.47, 15.97, -0.03, 167.0, 87.0, -167.0),
                    ],
                ),
            ],
        }
    }
}

impl CinematicConfig {
    pub fn script(&self) -> Result<CinematicScript> {
        Ok(CinematicScript::new(&self.scenes)?)
    }
}

// =============================================================================
// Credits
// =============================================================================

/// Fixed pose the camera drifts toward while the credits roll
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditsConfig {
    pub position: Vec3,
    pub rotation: Orientation,
    /// Fraction of the remaining distance covered per 60 fps frame
    pub approach: f32,
}

impl Default for CreditsConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(21.52, -7.14, -73.89),
            rotation: Orientation::new(159.0, 20.0, -173.0),
            approach: 0.05,
        }
    }
}

impl CreditsConfig {
    fn validate(&self) -> Result<()> {
        if !self.position.is_finite() || !self.rotation.is_finite() {
            return Err(ConfigError::Tuning(
                "credits pose has a non-finite value".to_string(),
            ));
        }
        if !self.approach.is_finite() || self.approach <= 0.0 || self.approach > 1.0 {
            return Err(ConfigError::Tuning(format!(
                "credits approach must be in (0, 1], got {}",
                self.approach
            )));
        }
        Ok(())
    }
}
