//! Infinite tube primitive.

use super::{points_in_range, Surface};
use crate::GeometryError;
use lumen_math::{align_zero, BoundingBox, InvalidVector, Point, Ray, Vector};

/// An infinite cylindrical surface of constant radius around an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tube {
    axis: Ray,
    radius: f64,
}

impl Tube {
    /// Create a tube around `axis`. The radius must be positive.
    pub fn new(axis: Ray, radius: f64) -> Result<Self, GeometryError> {
        if radius.is_nan() || radius <= 0.0 {
            return Err(GeometryError::NonPositiveRadius);
        }
        Ok(Self { axis, radius })
    }

    pub fn axis(&self) -> &Ray {
        &self.axis
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Signed distance of the projection of `p` along the axis.
    pub(crate) fn axial_coordinate(&self, p: Point) -> f64 {
        let offset = p.coords() - self.axis.origin().coords();
        self.axis.direction().coords().dot(offset)
    }

    /// Ray parameters where `ray` crosses the side surface.
    ///
    /// The ray and its origin offset are projected orthogonally to the axis,
    /// which leaves a 2D circle test: `a t² + b t + c = 0`.
    pub(crate) fn side_distances(&self, ray: &Ray) -> Vec<f64> {
        let axis_dir = self.axis.direction().coords();
        let d = ray.direction().coords();
        let delta = ray.origin().coords() - self.axis.origin().coords();

        let d_perp = d - axis_dir * d.dot(axis_dir);
        let delta_perp = delta - axis_dir * delta.dot(axis_dir);

        // Parallel to the axis: never crosses the side
        let a = align_zero(d_perp.length_squared());
        if a == 0.0 {
            return Vec::new();
        }
        let b = 2.0 * delta_perp.dot(d_perp);
        let c = delta_perp.length_squared() - self.radius * self.radius;

        // Tangent rays do not count
        let discriminant = align_zero(b * b - 4.0 * a * c);
        if discriminant <= 0.0 {
            return Vec::new();
        }

        let root = discriminant.sqrt();
        vec![(-b - root) / (2.0 * a), (-b + root) / (2.0 * a)]
    }
}

/// Unit vector from the axis to `p`, perpendicular to the axis.
pub(crate) fn radial_normal(axis: &Ray, p: Point) -> Result<Vector, InvalidVector> {
    let t = align_zero(axis.direction().dot(p.subtract(axis.origin())?));
    if t == 0.0 {
        return Ok(p.subtract(axis.origin())?.normalize());
    }
    Ok(p.subtract(axis.at(t))?.normalize())
}

impl Surface for Tube {
    fn normal_at(&self, point: Point) -> Result<Vector, InvalidVector> {
        radial_normal(&self.axis, point)
    }

    fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<Point> {
        let ts = self.side_distances(ray);
        points_in_range(ray, &ts, max_distance)
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        None
    }
}
