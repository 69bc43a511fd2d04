use crate::util::align_zero;
use crate::{Point, Vector};
use std::fmt;

/// Distance a secondary ray origin is pushed off a surface, so that the
/// surface it starts on does not shadow or reflect itself.
pub const DELTA: f64 = 0.1;

/// A ray in 3D space with an origin and a unit direction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: Point,
    direction: Vector,
}

impl Ray {
    /// Create a new ray. The direction is normalized.
    pub fn new(origin: Point, direction: Vector) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Create a ray starting near `point`, moved by [`DELTA`] along `normal`
    /// to the side the ray travels towards.
    ///
    /// When the direction is tangent to the surface the origin is not moved.
    pub fn with_offset(point: Point, direction: Vector, normal: Vector) -> Self {
        let nd = align_zero(normal.dot(direction));
        let bias = if nd > 0.0 { DELTA } else { -DELTA };
        let origin = match normal.scale(bias) {
            Ok(offset) if nd != 0.0 => point.add(offset),
            _ => point,
        };
        Self::new(origin, direction)
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Get the unit direction of the ray.
    #[inline]
    pub fn direction(&self) -> Vector {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction, and the origin itself for `t == 0`.
    pub fn at(&self, t: f64) -> Point {
        match Vector::try_from(self.direction.coords() * t) {
            Ok(step) => self.origin.add(step),
            Err(_) => self.origin,
        }
    }

    /// The point of `points` closest to the ray origin.
    pub fn find_closest_point(&self, points: &[Point]) -> Option<Point> {
        self.find_closest_by(points, |p| *p).copied()
    }

    /// The item of `items` whose location is closest to the ray origin.
    pub fn find_closest_by<'a, T>(
        &self,
        items: &'a [T],
        location: impl Fn(&T) -> Point,
    ) -> Option<&'a T> {
        items
            .iter()
            .map(|item| (item, self.origin.distance_squared(location(item))))
            .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(item, _)| item)
    }
}

impl fmt::Display for Ray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ray {} -> {}", self.origin, self.direction)
    }
}
