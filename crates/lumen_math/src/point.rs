use crate::{InvalidVector, Vector};
use glam::DVec3;
use std::fmt;

/// A location in 3D space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Point(DVec3);

impl Point {
    /// The origin.
    pub const ZERO: Point = Point(DVec3::ZERO);

    /// Create a new point.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self(DVec3::new(x, y, z))
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.0.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.0.y
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.0.z
    }

    /// Get a coordinate by axis index (0=X, 1=Y, 2=Z).
    #[inline]
    pub fn axis(&self, n: usize) -> f64 {
        match n {
            0 => self.0.x,
            1 => self.0.y,
            _ => self.0.z,
        }
    }

    /// The raw coordinates.
    #[inline]
    pub fn coords(&self) -> DVec3 {
        self.0
    }

    /// Move this point along a vector.
    #[inline]
    pub fn add(&self, v: Vector) -> Point {
        Point(self.0 + v.coords())
    }

    /// The vector from `other` to this point.
    ///
    /// Fails when both points coincide.
    #[inline]
    pub fn subtract(&self, other: Point) -> Result<Vector, InvalidVector> {
        Vector::try_from(self.0 - other.0)
    }

    #[inline]
    pub fn distance_squared(&self, other: Point) -> f64 {
        self.0.distance_squared(other.0)
    }

    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        self.0.distance(other.0)
    }

    /// Component-wise minimum of two points.
    #[inline]
    pub fn min(&self, other: Point) -> Point {
        Point(self.0.min(other.0))
    }

    /// Component-wise maximum of two points.
    #[inline]
    pub fn max(&self, other: Point) -> Point {
        Point(self.0.max(other.0))
    }
}

impl From<DVec3> for Point {
    fn from(v: DVec3) -> Self {
        Self(v)
    }
}

impl From<[f64; 3]> for Point {
    fn from(v: [f64; 3]) -> Self {
        Self(DVec3::from_array(v))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0.x, self.0.y, self.0.z)
    }
}
