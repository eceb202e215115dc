//! Catmull-Rom spline through fixed control points
//!
//! The curve is immutable once built. [`CatmullRomCurve::position_at`]
//! samples by normalized arc length, so equal progress steps cover equal
//! distances along the path regardless of control point spacing.

use crate::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of samples in the arc-length table
pub const ARC_LENGTH_DIVISIONS: usize = 200;

/// Errors raised while building a curve
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// Fewer than two control points
    #[error("curve needs at least 2 control points, got {0}")]
    TooFewPoints(usize),

    /// A control point has a NaN or infinite component
    #[error("control point {index} is not finite: {point:?}")]
    NonFinitePoint { index: usize, point: Vec3 },

    /// All control points coincide, so there is no path to travel
    #[error("curve has zero length")]
    ZeroLength,
}

/// Knot parameterization of the spline
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    /// Uniform knots (α = 0)
    Uniform,
    /// Centripetal knots (α = 0.5), no cusps or self-intersections
    #[default]
    Centripetal,
    /// Chordal knots (α = 1)
    Chordal,
}

impl CurveKind {
    /// Exponent applied to the squared segment length
    fn knot_power(self) -> f32 {
        match self {
            CurveKind::Uniform => 0.0,
            CurveKind::Centripetal => 0.25,
            CurveKind::Chordal => 0.5,
        }
    }
}

/// Cubic polynomial `c0 + c1 t + c2 t² + c3 t³` for one axis of a segment
#[derive(Clone, Copy, Debug)]
struct CubicPoly {
    c0: f32,
    c1: f32,
    c2: f32,
    c3: f32,
}

impl CubicPoly {
    /// Hermite form from endpoints and tangents
    fn hermite(x0: f32, x1: f32, t0: f32, t1: f32) -> Self {
        Self {
            c0: x0,
            c1: t0,
            c2: -3.0 * x0 + 3.0 * x1 - 2.0 * t0 - t1,
            c3: 2.0 * x0 - 2.0 * x1 + t0 + t1,
        }
    }

    /// Non-uniform Catmull-Rom between `x1` and `x2`
    fn catmull_rom(x0: f32, x1: f32, x2: f32, x3: f32, dt0: f32, dt1: f32, dt2: f32) -> Self {
        let t1 = (x1 - x0) / dt0 - (x2 - x0) / (dt0 + dt1) + (x2 - x1) / dt1;
        let t2 = (x2 - x1) / dt1 - (x3 - x1) / (dt1 + dt2) + (x3 - x2) / dt2;
        Self::hermite(x1, x2, t1 * dt1, t2 * dt1)
    }

    fn eval(&self, t: f32) -> f32 {
        let t2 = t * t;
        let t3 = t2 * t;
        self.c0 + self.c1 * t + self.c2 * t2 + self.c3 * t3
    }
}

/// Open Catmull-Rom curve
///
/// # Example
///
/// ```
/// use vista_core::{CatmullRomCurve, Vec3};
///
/// let curve = CatmullRomCurve::new(vec![
///     Vec3::new(0.0, 0.0, 0.0),
///     Vec3::new(10.0, 0.0, 0.0),
/// ])
/// .unwrap();
///
/// let mid = curve.position_at(0.5);
/// assert!((mid.x - 5.0).abs() < 1e-3);
/// ```
#[derive(Clone, Debug)]
pub struct CatmullRomCurve {
    points: Vec<Vec3>,
    kind: CurveKind,
    /// Cumulative length at each of `ARC_LENGTH_DIVISIONS + 1` samples
    arc_lengths: Vec<f32>,
}

impl CatmullRomCurve {
    /// Build a centripetal curve
    pub fn new(points: Vec<Vec3>) -> Result<Self, CurveError> {
        Self::with_kind(points, CurveKind::default())
    }

    /// Build a curve with the given knot parameterization
    pub fn with_kind(points: Vec<Vec3>, kind: CurveKind) -> Result<Self, CurveError> {
        if points.len() < 2 {
            return Err(CurveError::TooFewPoints(points.len()));
        }
        if let Some((index, point)) = points.iter().enumerate().find(|(_, p)| !p.is_finite()) {
            return Err(CurveError::NonFinitePoint {
                index,
                point: *point,
            });
        }

        let mut curve = Self {
            points,
            kind,
            arc_lengths: Vec::with_capacity(ARC_LENGTH_DIVISIONS + 1),
        };
        curve.arc_lengths = curve.compute_arc_lengths();

        if curve.length() <= f32::EPSILON {
            return Err(CurveError::ZeroLength);
        }
        Ok(curve)
    }

    /// Control points
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Approximate total length
    pub fn length(&self) -> f32 {
        self.arc_lengths.last().copied().unwrap_or(0.0)
    }

    /// Point at raw spline parameter `t` in [0, 1]
    ///
    /// Control points are spaced evenly in `t`, not in distance.
    pub fn point(&self, t: f32) -> Vec3 {
        let points = &self.points;
        let l = points.len();
        let t = t.clamp(0.0, 1.0);

        let p = (l - 1) as f32 * t;
        let mut index = p.floor() as usize;
        let mut weight = p - index as f32;

        if index >= l - 1 {
            index = l - 2;
            weight = 1.0;
        }

        // Phantom end points mirror the neighbour through the end point
        let p0 = if index > 0 {
            points[index - 1]
        } else {
            points[0] + (points[0] - points[1])
        };
        let p1 = points[index];
        let p2 = points[index + 1];
        let p3 = if index + 2 < l {
            points[index + 2]
        } else {
            points[l - 1] + (points[l - 1] - points[l - 2])
        };

        let power = self.kind.knot_power();
        let mut dt0 = p0.distance_squared(p1).powf(power);
        let mut dt1 = p1.distance_squared(p2).powf(power);
        let mut dt2 = p2.distance_squared(p3).powf(power);

        // Safety check for repeated points
        if dt1 < 1e-4 {
            dt1 = 1.0;
        }
        if dt0 < 1e-4 {
            dt0 = dt1;
        }
        if dt2 < 1e-4 {
            dt2 = dt1;
        }

        let px = CubicPoly::catmull_rom(p0.x, p1.x, p2.x, p3.x, dt0, dt1, dt2);
        let py = CubicPoly::catmull_rom(p0.y, p1.y, p2.y, p3.y, dt0, dt1, dt2);
        let pz = CubicPoly::catmull_rom(p0.z, p1.z, p2.z, p3.z, dt0, dt1, dt2);

        Vec3::new(px.eval(weight), py.eval(weight), pz.eval(weight))
    }

    /// Point at normalized arc length `u` in [0, 1]; out-of-range input clamps
    /// and NaN reads as the start
    pub fn position_at(&self, u: f32) -> Vec3 {
        self.point(self.arc_length_to_t(u))
    }

    /// Map normalized arc length to the raw spline parameter
    pub fn arc_length_to_t(&self, u: f32) -> f32 {
        let lengths = &self.arc_lengths;
        let count = lengths.len();
        let u = if u.is_nan() { 0.0 } else { u.clamp(0.0, 1.0) };
        let target = u * self.length();

        // Last sample whose cumulative length does not exceed the target
        let i = lengths
            .partition_point(|&len| len <= target)
            .saturating_sub(1)
            .min(count - 2);

        let before = lengths[i];
        if before == target {
            return i as f32 / (count - 1) as f32;
        }

        let segment = lengths[i + 1] - before;
        let fraction = if segment > 0.0 {
            ((target - before) / segment).clamp(0.0, 1.0)
        } else {
            0.0
        };
        (i as f32 + fraction) / (count - 1) as f32
    }

    fn compute_arc_lengths(&self) -> Vec<f32> {
        let mut lengths = Vec::with_capacity(ARC_LENGTH_DIVISIONS + 1);
        let mut last = self.point(0.0);
        let mut sum = 0.0;
        lengths.push(0.0);

        for step in 1..=ARC_LENGTH_DIVISIONS {
            let current = self.point(step as f32 / ARC_LENGTH_DIVISIONS as f32);
            sum += current.distance(last);
            lengths.push(sum);
            last = current;
        }
        lengths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bent() -> CatmullRomCurve {
        CatmullRomCurve::new(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 8.0),
            Vec3::new(-4.0, 2.0, 9.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_rejects_degenerate_input() {
        assert_eq!(
            CatmullRomCurve::new(vec![Vec3::ZERO]).unwrap_err(),
            CurveError::TooFewPoints(1)
        );
        assert_eq!(
            CatmullRomCurve::new(vec![Vec3::ONE, Vec3::ONE]).unwrap_err(),
            CurveError::ZeroLength
        );
        assert!(matches!(
            CatmullRomCurve::new(vec![Vec3::ZERO, Vec3::new(f32::NAN, 0.0, 0.0)]),
            Err(CurveError::NonFinitePoint { index: 1, .. })
        ));
    }

    #[test]
    fn test_passes_through_end_points() {
        let curve = bent();
        let start = curve.position_at(0.0);
        let end = curve.position_at(1.0);

        assert!(start.distance(Vec3::ZERO) < 1e-4);
        assert!(end.distance(Vec3::new(-4.0, 2.0, 9.0)) < 1e-3);
    }

    #[test]
    fn test_passes_through_interior_points() {
        let curve = bent();
        // Raw parameter hits control points at i / (n - 1)
        assert!(curve.point(1.0 / 3.0).distance(Vec3::new(1.0, 0.0, 0.0)) < 1e-4);
        assert!(curve.point(2.0 / 3.0).distance(Vec3::new(1.0, 0.0, 8.0)) < 1e-4);
    }

    #[test]
    fn test_position_at_clamps() {
        let curve = bent();
        assert_eq!(curve.position_at(-0.5), curve.position_at(0.0));
        assert_eq!(curve.position_at(1.5), curve.position_at(1.0));
    }

    #[test]
    fn test_nan_reads_as_start() {
        let curve = bent();
        assert_eq!(curve.arc_length_to_t(f32::NAN), 0.0);
        let p = curve.position_at(f32::NAN);
        assert!(p.is_finite());
        assert_eq!(p, curve.position_at(0.0));
    }

    #[test]
    fn test_arc_length_parameterization_is_uniform() {
        let curve = bent();
        let steps = 20;
        let expected = curve.length() / steps as f32;

        for i in 0..steps {
            let a = curve.position_at(i as f32 / steps as f32);
            let b = curve.position_at((i + 1) as f32 / steps as f32);
            let chord = a.distance(b);
            // Chords are slightly shorter than arcs on bends
            assert!(chord <= expected * 1.02, "step {i}: {chord} > {expected}");
            assert!(chord >= expected * 0.6, "step {i}: {chord} < {expected}");
        }
    }

    #[test]
    fn test_arc_length_to_t_is_monotonic() {
        let curve = bent();
        let mut last = -1.0;
        for i in 0..=100 {
            let t = curve.arc_length_to_t(i as f32 / 100.0);
            assert!(t >= last);
            last = t;
        }
        assert_eq!(curve.arc_length_to_t(0.0), 0.0);
        assert!((curve.arc_length_to_t(1.0) - 1.0).abs() < 1e-6);
    }
}
