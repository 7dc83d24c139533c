use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A 3d point in image-pixel / depth-unit space.
///
/// `x` and `y` are pixel coordinates and `z` is the depth reading, usually in
/// millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3d {
    /// x coordinate
    pub x: f64,
    /// y coordinate
    pub y: f64,
    /// z coordinate
    pub z: f64,
}

impl Point3d {
    /// Create a new point from its coordinates.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Create a new point from an array of 3 f64 values.
    pub fn from_array(array: &[f64; 3]) -> Self {
        Self::new(array[0], array[1], array[2])
    }

    /// Get the point as an array `[x, y, z]`.
    #[inline]
    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Get the point as a [`DVec3`].
    #[inline]
    pub fn to_dvec3(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    /// Euclidean 3d distance to another point.
    ///
    /// Example:
    /// ```
    /// use dualplane_3d::Point3d;
    ///
    /// let a = Point3d::new(1.0, 2.0, 3.0);
    /// let b = Point3d::new(4.0, 5.0, 6.0);
    /// assert!((a.distance(&b) - 27f64.sqrt()).abs() < 1e-12);
    /// ```
    pub fn distance(&self, other: &Point3d) -> f64 {
        self.to_dvec3().distance(other.to_dvec3())
    }

    /// Euclidean distance to another point using only the x and y coordinates.
    pub fn distance_xy(&self, other: &Point3d) -> f64 {
        self.to_dvec3().truncate().distance(other.to_dvec3().truncate())
    }
}

impl From<[f64; 3]> for Point3d {
    fn from(array: [f64; 3]) -> Self {
        Self::from_array(&array)
    }
}

impl From<Point3d> for [f64; 3] {
    fn from(point: Point3d) -> Self {
        point.to_array()
    }
}

impl From<DVec3> for Point3d {
    fn from(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Point3d> for DVec3 {
    fn from(point: Point3d) -> Self {
        point.to_dvec3()
    }
}
