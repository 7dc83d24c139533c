use glam::DVec3;
use serde::Serialize;

use crate::error::PlaneError;
use crate::point::Point3d;

/// Magnitude below which a normal vector or a coefficient is considered degenerate.
pub const DEGENERATE_EPS: f64 = 1e-6;

/// A plane `a*x + b*y + c*z + d = 0` with a unit normal `(a, b, c)`.
///
/// The normal is normalized at construction and stored with a canonical
/// orientation: `c > 0`, or `b > 0` when `c == 0`, or `a > 0` when both are
/// zero. With this convention `d` is the signed offset of the plane along a
/// normal that faces away from the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlaneEquation {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}

impl PlaneEquation {
    /// Create a plane from raw coefficients, normalizing the normal vector.
    ///
    /// # Errors
    ///
    /// Returns [`PlaneError::DegenerateNormal`] if `|(a, b, c)|` is below
    /// [`DEGENERATE_EPS`] and [`PlaneError::NonFiniteCoefficient`] on NaN or
    /// infinite input.
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Result<Self, PlaneError> {
        if ![a, b, c, d].iter().all(|v| v.is_finite()) {
            return Err(PlaneError::NonFiniteCoefficient);
        }

        let norm = DVec3::new(a, b, c).length();
        if norm < DEGENERATE_EPS {
            return Err(PlaneError::DegenerateNormal(norm));
        }

        let sign = if c != 0.0 {
            c.signum()
        } else if b != 0.0 {
            b.signum()
        } else {
            a.signum()
        };
        let scale = sign / norm;

        Ok(Self {
            a: a * scale,
            b: b * scale,
            c: c * scale,
            d: d * scale,
        })
    }

    /// Create the plane passing through three points.
    ///
    /// The normal is the cross product of the edges `p2 - p1` and `p3 - p1` and
    /// the offset is taken from `p1`. Returns `None` when the points are
    /// collinear or coincide.
    pub fn from_points(p1: &Point3d, p2: &Point3d, p3: &Point3d) -> Option<Self> {
        let origin = p1.to_dvec3();
        let normal = (p2.to_dvec3() - origin).cross(p3.to_dvec3() - origin);
        if normal.length() < DEGENERATE_EPS {
            return None;
        }

        let unit = normal.normalize();
        let d = -unit.dot(origin);
        Self::new(unit.x, unit.y, unit.z, d).ok()
    }

    /// The horizontal plane `z = 0`, used as the degraded result of a failed fit.
    pub const fn horizontal() -> Self {
        Self {
            a: 0.0,
            b: 0.0,
            c: 1.0,
            d: 0.0,
        }
    }

    /// The unit normal `(a, b, c)`.
    #[inline]
    pub fn normal(&self) -> DVec3 {
        DVec3::new(self.a, self.b, self.c)
    }

    /// The offset `d`.
    #[inline]
    pub fn offset(&self) -> f64 {
        self.d
    }

    /// The coefficients `[a, b, c, d]`.
    #[inline]
    pub fn coefficients(&self) -> [f64; 4] {
        [self.a, self.b, self.c, self.d]
    }

    /// Signed distance from a point to the plane.
    #[inline]
    pub fn signed_distance(&self, point: &Point3d) -> f64 {
        self.normal().dot(point.to_dvec3()) + self.d
    }

    /// Absolute distance from a point to the plane.
    #[inline]
    pub fn distance(&self, point: &Point3d) -> f64 {
        self.signed_distance(point).abs()
    }

    /// Solve the plane equation for `z` at the pixel `(x, y)`.
    ///
    /// Returns `None` when the plane is nearly parallel to the depth axis,
    /// i.e. `|c| <= DEGENERATE_EPS`.
    pub fn solve_z(&self, x: f64, y: f64) -> Option<f64> {
        if self.c.abs() > DEGENERATE_EPS {
            Some(-(self.a * x + self.b * y + self.d) / self.c)
        } else {
            None
        }
    }
}

impl Default for PlaneEquation {
    fn default() -> Self {
        Self::horizontal()
    }
}

impl std::fmt::Display for PlaneEquation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}x + {}y + {}z + {} = 0",
            self.a, self.b, self.c, self.d
        )
    }
}
