//! Sphere primitive.

use super::{points_in_range, Surface};
use crate::GeometryError;
use glam::DVec3;
use lumen_math::{align_zero, BoundingBox, InvalidVector, Point, Ray, Vector};

/// A sphere given by its center and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Point,
    radius: f64,
}

impl Sphere {
    /// Create a new sphere. The radius must be positive.
    pub fn new(center: Point, radius: f64) -> Result<Self, GeometryError> {
        if radius.is_nan() || radius <= 0.0 {
            return Err(GeometryError::NonPositiveRadius);
        }
        Ok(Self { center, radius })
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Surface for Sphere {
    fn normal_at(&self, point: Point) -> Result<Vector, InvalidVector> {
        Ok(point.subtract(self.center)?.normalize())
    }

    fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<Point> {
        // Ray starts at the center: one hit, one radius away
        let Ok(u) = self.center.subtract(ray.origin()) else {
            return points_in_range(ray, &[self.radius], max_distance);
        };

        let tm = ray.direction().dot(u);
        let d_squared = u.length_squared() - tm * tm;
        let th_squared = align_zero(self.radius * self.radius - d_squared);
        if th_squared <= 0.0 {
            return Vec::new();
        }

        let th = th_squared.sqrt();
        points_in_range(ray, &[tm - th, tm + th], max_distance)
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        let r = DVec3::splat(self.radius);
        let c = self.center.coords();
        Some(BoundingBox::from_points(Point::from(c - r), Point::from(c + r)))
    }
}
