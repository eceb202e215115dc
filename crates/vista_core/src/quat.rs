//! Quaternion for 3D rotations

use crate::{Orientation, Vec3};

/// Quaternion for representing 3D rotations
///
/// Quaternions avoid gimbal lock and interpolate smoothly.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    /// Identity quaternion (no rotation)
    pub const IDENTITY: Quat = Quat {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Create a new quaternion
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Create from intrinsic X-Y-Z Euler angles (in radians)
    ///
    /// Equivalent to `Rx(x) * Ry(y) * Rz(z)`.
    pub fn from_euler_xyz(x: f32, y: f32, z: f32) -> Self {
        let (s1, c1) = (x * 0.5).sin_cos();
        let (s2, c2) = (y * 0.5).sin_cos();
        let (s3, c3) = (z * 0.5).sin_cos();

        Self {
            x: s1 * c2 * c3 + c1 * s2 * s3,
            y: c1 * s2 * c3 - s1 * c2 * s3,
            z: c1 * c2 * s3 + s1 * s2 * c3,
            w: c1 * c2 * c3 - s1 * s2 * s3,
        }
    }

    /// Create from an authored orientation (degrees)
    pub fn from_orientation(orientation: Orientation) -> Self {
        let (x, y, z) = orientation.to_radians();
        Self::from_euler_xyz(x, y, z)
    }

    /// Create from axis-angle representation
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let half_angle = angle * 0.5;
        let s = half_angle.sin();
        let len = axis.length();

        if len < 1e-6 {
            return Self::IDENTITY;
        }

        let inv_len = 1.0 / len;
        Self {
            x: axis.x * inv_len * s,
            y: axis.y * inv_len * s,
            z: axis.z * inv_len * s,
            w: half_angle.cos(),
        }
    }

    /// Normalize the quaternion
    pub fn normalize(&self) -> Self {
        let len = self.dot(*self).sqrt();
        if len < 1e-6 {
            return Self::IDENTITY;
        }
        let inv_len = 1.0 / len;
        Self {
            x: self.x * inv_len,
            y: self.y * inv_len,
            z: self.z * inv_len,
            w: self.w * inv_len,
        }
    }

    /// Get the conjugate (inverse for unit quaternions)
    pub fn conjugate(&self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: self.w,
        }
    }

    /// Dot product of two quaternions
    pub fn dot(&self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Multiply two quaternions
    pub fn mul(&self, other: &Self) -> Self {
        Self {
            x: self.w * other.x + self.x * other.w + self.y * other.z - self.z * other.y,
            y: self.w * other.y - self.x * other.z + self.y * other.w + self.z * other.x,
            z: self.w * other.z + self.x * other.y - self.y * other.x + self.z * other.w,
            w: self.w * other.w - self.x * other.x - self.y * other.y - self.z * other.z,
        }
    }

    /// Rotate a vector by this quaternion
    pub fn rotate_vec3(&self, v: Vec3) -> Vec3 {
        let qv = Self::new(v.x, v.y, v.z, 0.0);
        let result = self.mul(&qv).mul(&self.conjugate());
        Vec3::new(result.x, result.y, result.z)
    }

    /// Angle in radians of the rotation taking `self` to `other`
    ///
    /// Sign-agnostic: `q` and `-q` describe the same rotation and are 0 apart.
    pub fn angle_to(&self, other: Self) -> f32 {
        let delta = self.normalize().conjugate().mul(&other.normalize());
        let sin_half = (delta.x * delta.x + delta.y * delta.y + delta.z * delta.z).sqrt();
        2.0 * sin_half.atan2(delta.w.abs())
    }

    /// Spherical linear interpolation along the shortest arc
    ///
    /// `t <= 0.0` returns `self` and `t >= 1.0` returns `other` unchanged.
    pub fn slerp(&self, other: Self, t: f32) -> Self {
        if t <= 0.0 {
            return *self;
        }
        if t >= 1.0 {
            return other;
        }

        let a = *self;
        let mut cos_half_theta = a.dot(other);

        // If negative dot, negate one quaternion to take shorter path
        let mut b = other;
        if cos_half_theta < 0.0 {
            b = Self::new(-b.x, -b.y, -b.z, -b.w);
            cos_half_theta = -cos_half_theta;
        }

        // If quaternions are close, use linear interpolation
        if cos_half_theta > 0.9995 {
            return Self::new(
                a.x + t * (b.x - a.x),
                a.y + t * (b.y - a.y),
                a.z + t * (b.z - a.z),
                a.w + t * (b.w - a.w),
            )
            .normalize();
        }

        let half_theta = cos_half_theta.acos();
        let sin_half_theta = (1.0 - cos_half_theta * cos_half_theta).sqrt();

        let ratio_a = ((1.0 - t) * half_theta).sin() / sin_half_theta;
        let ratio_b = (t * half_theta).sin() / sin_half_theta;

        Self::new(
            a.x * ratio_a + b.x * ratio_b,
            a.y * ratio_a + b.y * ratio_b,
            a.z * ratio_a + b.z * ratio_b,
            a.w * ratio_a + b.w * ratio_b,
        )
    }

    /// Convert to intrinsic X-Y-Z Euler angles (radians)
    pub fn to_euler_xyz(&self) -> (f32, f32, f32) {
        let q = self.normalize();

        // Rotation matrix terms needed for the XYZ decomposition
        let m13 = 2.0 * (q.x * q.z + q.w * q.y);
        let m12 = 2.0 * (q.x * q.y - q.w * q.z);
        let m11 = 1.0 - 2.0 * (q.y * q.y + q.z * q.z);
        let m23 = 2.0 * (q.y * q.z - q.w * q.x);
        let m33 = 1.0 - 2.0 * (q.x * q.x + q.y * q.y);
        let m32 = 2.0 * (q.y * q.z + q.w * q.x);
        let m22 = 1.0 - 2.0 * (q.x * q.x + q.z * q.z);

        let y = m13.clamp(-1.0, 1.0).asin();
        if m13.abs() < 0.999_999 {
            ((-m23).atan2(m33), y, (-m12).atan2(m11))
        } else {
            (m32.atan2(m22), y, 0.0)
        }
    }

    /// Convert back to an authored orientation (degrees)
    pub fn to_orientation(&self) -> Orientation {
        let (x, y, z) = self.to_euler_xyz();
        Orientation::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }
}

impl std::ops::Mul for Quat {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Quat::mul(&self, &rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_identity() {
        let q = Quat::IDENTITY;
        let v = Vec3::new(1.0, 2.0, 3.0);
        let rotated = q.rotate_vec3(v);

        assert!((rotated.x - v.x).abs() < 1e-5);
        assert!((rotated.y - v.y).abs() < 1e-5);
        assert!((rotated.z - v.z).abs() < 1e-5);
    }

    #[test]
    fn test_from_axis_angle() {
        // Rotate 90 degrees around Y axis
        let q = Quat::from_axis_angle(Vec3::UP, PI / 2.0);
        let v = Vec3::new(1.0, 0.0, 0.0);
        let rotated = q.rotate_vec3(v);

        assert!((rotated.x - 0.0).abs() < 1e-5);
        assert!((rotated.y - 0.0).abs() < 1e-5);
        assert!((rotated.z - (-1.0)).abs() < 1e-5);
    }

    #[test]
    fn test_euler_xyz_composes_in_order() {
        let (x, y, z) = (0.4, -1.1, 2.3);
        let composed = Quat::from_axis_angle(Vec3::new(1.0, 0.0, 0.0), x)
            * Quat::from_axis_angle(Vec3::UP, y)
            * Quat::from_axis_angle(Vec3::new(0.0, 0.0, 1.0), z);

        assert!(Quat::from_euler_xyz(x, y, z).angle_to(composed) < 1e-4);
    }

    #[test]
    fn test_orientation_yaw_matches_axis_angle() {
        let q = Quat::from_orientation(Orientation::yaw(90.0));
        let expected = Quat::from_axis_angle(Vec3::UP, PI / 2.0);
        assert!(q.angle_to(expected) < 1e-5);
    }

    #[test]
    fn test_euler_round_trip_away_from_gimbal_lock() {
        let o = Orientation::new(21.0, 32.0, -11.0);
        let back = Quat::from_orientation(o).to_orientation();

        assert!((back.pitch - o.pitch).abs() < 1e-3);
        assert!((back.yaw - o.yaw).abs() < 1e-3);
        assert!((back.roll - o.roll).abs() < 1e-3);
    }

    #[test]
    fn test_slerp() {
        // Test slerp with 90 degrees (avoids 180-degree floating-point edge case)
        let a = Quat::IDENTITY;
        let b = Quat::from_axis_angle(Vec3::UP, PI / 2.0);

        let mid = a.slerp(b, 0.5);
        let v = Vec3::new(1.0, 0.0, 0.0);
        let rotated = mid.rotate_vec3(v);

        // Should be rotated 45 degrees: x ≈ 0.707, z ≈ -0.707
        let expected = (PI / 4.0).cos();
        assert!((rotated.x - expected).abs() < 1e-4, "x: {}, expected: {}", rotated.x, expected);
        assert!((rotated.z - (-expected)).abs() < 1e-4, "z: {}, expected: {}", rotated.z, -expected);
    }

    #[test]
    fn test_slerp_endpoints_are_exact() {
        let a = Quat::from_orientation(Orientation::new(127.0, 70.0, -128.0));
        let b = Quat::from_orientation(Orientation::new(21.0, 32.0, -11.0));

        assert_eq!(a.slerp(b, 0.0), a);
        assert_eq!(a.slerp(b, 1.0), b);
        assert_eq!(a.slerp(b, -3.0), a);
        assert_eq!(a.slerp(b, 7.0), b);
    }

    #[test]
    fn test_slerp_takes_short_path() {
        let a = Quat::from_axis_angle(Vec3::UP, 0.1);
        let b = Quat::from_axis_angle(Vec3::UP, 0.3);
        let negated_b = Quat::new(-b.x, -b.y, -b.z, -b.w);

        let direct = a.slerp(b, 0.5);
        let flipped = a.slerp(negated_b, 0.5);
        assert!(direct.angle_to(flipped) < 1e-5);
        assert!(direct.angle_to(Quat::from_axis_angle(Vec3::UP, 0.2)) < 1e-4);
    }

    #[test]
    fn test_angle_to_ignores_sign() {
        let q = Quat::from_axis_angle(Vec3::UP, 1.0);
        let neg = Quat::new(-q.x, -q.y, -q.z, -q.w);
        assert!(q.angle_to(neg) < 1e-5);
        assert!((Quat::IDENTITY.angle_to(q) - 1.0).abs() < 1e-4);
    }
}
