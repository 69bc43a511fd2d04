//! Infinite plane primitive.

use super::{points_in_range, Surface};
use crate::GeometryError;
use lumen_math::{align_zero, BoundingBox, InvalidVector, Point, Ray, Vector};

/// An infinite plane through a reference point with a unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    q: Point,
    normal: Vector,
}

impl Plane {
    /// Create a plane from a point on it and its normal (normalized here).
    pub fn new(q: Point, normal: Vector) -> Self {
        Self {
            q,
            normal: normal.normalize(),
        }
    }

    /// Create the plane through three points.
    ///
    /// Fails when two points coincide or all three are collinear.
    pub fn from_points(p1: Point, p2: Point, p3: Point) -> Result<Self, GeometryError> {
        let normal = p2
            .subtract(p1)
            .and_then(|v1| v1.cross(p3.subtract(p1)?))
            .map_err(|_| GeometryError::Degenerate)?;
        Ok(Self::new(p1, normal))
    }

    /// The reference point.
    pub fn point(&self) -> Point {
        self.q
    }

    /// The unit normal.
    pub fn normal(&self) -> Vector {
        self.normal
    }

    /// Ray parameter of the hit with this plane, if the ray crosses it in
    /// front of its origin.
    pub(crate) fn hit_distance(&self, ray: &Ray) -> Option<f64> {
        let Ok(to_q) = self.q.subtract(ray.origin()) else {
            return None;
        };
        let nd = align_zero(self.normal.dot(ray.direction()));
        if nd == 0.0 {
            return None;
        }
        let t = align_zero(self.normal.dot(to_q) / nd);
        (t > 0.0).then_some(t)
    }
}

impl Surface for Plane {
    fn normal_at(&self, _point: Point) -> Result<Vector, InvalidVector> {
        Ok(self.normal)
    }

    fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<Point> {
        match self.hit_distance(ray) {
            Some(t) => points_in_range(ray, &[t], max_distance),
            None => Vec::new(),
        }
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        None
    }
}
