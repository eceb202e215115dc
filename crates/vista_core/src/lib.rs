//! Vista Core Math
//!
//! Pure math shared by the Vista camera engine:
//!
//! - **Vectors**: [`Vec3`] with exact-endpoint linear interpolation
//! - **Rotations**: [`Quat`] with shortest-path slerp, built from authored
//!   [`Orientation`] Euler angles in degrees
//! - **Curves**: [`CatmullRomCurve`] with arc-length sampling
//! - **Easing**: smoothstep family, exponential damping and frame-rate
//!   independent approach factors
//!
//! # Example
//!
//! ```rust
//! use vista_core::{Orientation, Quat};
//!
//! let a = Quat::from_orientation(Orientation::yaw(0.0));
//! let b = Quat::from_orientation(Orientation::yaw(90.0));
//! let half = a.slerp(b, 0.5);
//!
//! assert!((half.angle_to(a) - 45f32.to_radians()).abs() < 1e-4);
//! ```

pub mod curve;
pub mod easing;
pub mod orientation;
pub mod quat;
pub mod values;
pub mod vec3;

pub use curve::{CatmullRomCurve, CurveError, CurveKind, ARC_LENGTH_DIVISIONS};
pub use easing::{
    approach_factor, clamp01, damp_factor, smootherstep, smoothstep, Easing, REFERENCE_FPS,
};
pub use orientation::Orientation;
pub use quat::Quat;
pub use values::{Interpolate, SphericalInterpolate};
pub use vec3::Vec3;
