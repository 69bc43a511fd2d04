//! Finite, capped cylinder primitive.

use super::tube::radial_normal;
use super::{points_in_range, Plane, Surface, Tube};
use crate::GeometryError;
use glam::DVec3;
use lumen_math::{align_zero, is_zero, BoundingBox, InvalidVector, Point, Ray, Vector};

/// A tube cut to `height` along its axis and closed by two flat caps.
///
/// The bottom cap sits at the axis origin, the top cap `height` further
/// along the axis direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    tube: Tube,
    height: f64,
    bottom: Plane,
    top: Plane,
}

impl Cylinder {
    /// Create a cylinder. Radius and height must be positive.
    pub fn new(axis: Ray, radius: f64, height: f64) -> Result<Self, GeometryError> {
        let tube = Tube::new(axis, radius)?;
        if height.is_nan() || height <= 0.0 {
            return Err(GeometryError::NonPositiveHeight);
        }

        let dir = axis.direction();
        Ok(Self {
            tube,
            height,
            bottom: Plane::new(axis.origin(), dir),
            top: Plane::new(axis.at(height), dir),
        })
    }

    pub fn axis(&self) -> &Ray {
        self.tube.axis()
    }

    pub fn radius(&self) -> f64 {
        self.tube.radius()
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Hit with a cap plane if it lands inside the cap disk.
    fn cap_hit(&self, cap: &Plane, ray: &Ray, max_distance: f64) -> Option<Point> {
        let t = cap.hit_distance(ray)?;
        let p = points_in_range(ray, &[t], max_distance).into_iter().next()?;
        let r2 = self.radius() * self.radius();
        (align_zero(cap.point().distance_squared(p) - r2) <= 0.0).then_some(p)
    }

    fn on_rim(&self, cap: &Plane, p: Point) -> bool {
        is_zero(cap.point().distance_squared(p) - self.radius() * self.radius())
    }
}

impl Surface for Cylinder {
    fn normal_at(&self, point: Point) -> Result<Vector, InvalidVector> {
        let dir = self.axis().direction();
        let t = self.tube.axial_coordinate(point);

        // Caps, rims included
        if is_zero(t) {
            return Ok(-dir);
        }
        if is_zero(t - self.height) {
            return Ok(dir);
        }
        radial_normal(self.axis(), point)
    }

    fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<Point> {
        let mut points: Vec<Point> = points_in_range(ray, &self.tube.side_distances(ray), max_distance)
            .into_iter()
            .filter(|&p| {
                let t = self.tube.axial_coordinate(p);
                align_zero(t) > 0.0 && align_zero(t - self.height) < 0.0
            })
            .collect();

        // Through the side twice: the caps cannot be hit as well
        if points.len() == 2 {
            return points;
        }

        let bottom = self.cap_hit(&self.bottom, ray, max_distance);
        let top = self.cap_hit(&self.top, ray, max_distance);

        // Grazing the side along the axis touches only the two rims
        if let (Some(b), Some(t)) = (bottom, top) {
            if points.is_empty() && self.on_rim(&self.bottom, b) && self.on_rim(&self.top, t) {
                let along = t.coords() - b.coords();
                let parallel = along.cross(self.axis().direction().coords());
                if is_zero(parallel.length_squared()) {
                    return Vec::new();
                }
            }
        }

        points.extend(bottom);
        points.extend(top);
        points
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        let a = self.axis().origin().coords();
        let b = self.top.point().coords();
        let dir = self.axis().direction().coords();
        let r = self.radius();

        // Extent of a disk of radius r with this normal, per axis
        let extent = DVec3::new(
            r * (1.0 - dir.x * dir.x).max(0.0).sqrt(),
            r * (1.0 - dir.y * dir.y).max(0.0).sqrt(),
            r * (1.0 - dir.z * dir.z).max(0.0).sqrt(),
        );
        Some(BoundingBox::from_points(
            Point::from(a.min(b) - extent),
            Point::from(a.max(b) + extent),
        ))
    }
}
