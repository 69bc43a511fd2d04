use crate::{Interval, Point, Ray};

/// Direction components below this are treated as parallel to a slab.
const PARALLEL_EPSILON: f64 = 1e-10;

/// Axis-aligned bounding box used by the BVH.
///
/// Invariant: `min.axis(n) <= max.axis(n)` for every axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    /// Create a box from two opposite corners, in any order.
    pub fn from_points(a: Point, b: Point) -> Self {
        let mut bbox = Self {
            min: a.min(b),
            max: a.max(b),
        };
        bbox.pad_to_minimums();
        bbox
    }

    /// The smallest box containing every point, or `None` for no points.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self::from_points(min, max))
    }

    /// Create a box that surrounds two other boxes.
    pub fn surrounding(a: &BoundingBox, b: &BoundingBox) -> Self {
        Self {
            min: a.min.min(b.min),
            max: a.max.max(b.max),
        }
    }

    /// Returns the center point of the box.
    pub fn center(&self) -> Point {
        Point::from((self.min.coords() + self.max.coords()) * 0.5)
    }

    /// The extent of the box along an axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        Interval::new(self.min.axis(n), self.max.axis(n))
    }

    /// Returns true if `p` lies inside or on the box.
    pub fn contains(&self, p: Point) -> bool {
        (0..3).all(|n| self.axis_interval(n).contains(p.axis(n)))
    }

    /// Test if a ray hits this box no further than `max_distance`.
    ///
    /// Uses the slab method: the running parameter interval starts as
    /// `[0, max_distance]` and is narrowed by each axis in turn; the test
    /// fails as soon as it becomes empty.
    pub fn intersects(&self, ray: &Ray, max_distance: f64) -> bool {
        let origin = ray.origin();
        let dir = ray.direction();
        let mut ray_t = Interval::new(0.0, max_distance);

        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let o = origin.axis(axis);
            let d = dir.axis(axis);

            // Parallel to this slab: the origin has to be inside it already
            if d.abs() < PARALLEL_EPSILON {
                if !slab.contains(o) {
                    return false;
                }
                continue;
            }

            let inv_d = 1.0 / d;
            let mut t0 = (slab.min - o) * inv_d;
            let mut t1 = (slab.max - o) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            ray_t = ray_t.intersect(&Interval::new(t0, t1));
            if ray_t.is_empty() {
                return false;
            }
        }

        true
    }

    /// Pad zero-width axes so flat primitives still get a usable box.
    fn pad_to_minimums(&mut self) {
        let delta = 0.0001;
        let mut min = self.min.coords();
        let mut max = self.max.coords();
        for n in 0..3 {
            if max[n] - min[n] < delta {
                min[n] -= delta / 2.0;
                max[n] += delta / 2.0;
            }
        }
        self.min = Point::from(min);
        self.max = Point::from(max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vector;

    fn unit_box() -> BoundingBox {
        BoundingBox::from_points(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_bbox_from_points_orders_corners() {
        let bbox = BoundingBox::from_points(Point::new(10.0, 0.0, 10.0), Point::new(0.0, 10.0, 0.0));
        assert_eq!(bbox.min, Point::new(0.0, 0.0, 0.0));
        assert_eq!(bbox.max, Point::new(10.0, 10.0, 10.0));
    }

    #[test]
    fn test_bbox_enclosing() {
        let bbox = BoundingBox::enclosing([
            Point::new(1.0, 5.0, -2.0),
            Point::new(-3.0, 0.0, 4.0),
            Point::new(0.0, 2.0, 0.0),
        ])
        .unwrap();
        assert_eq!(bbox.min, Point::new(-3.0, 0.0, -2.0));
        assert_eq!(bbox.max, Point::new(1.0, 5.0, 4.0));

        assert!(BoundingBox::enclosing(std::iter::empty()).is_none());
    }

    #[test]
    fn test_bbox_flat_axis_is_padded() {
        let bbox = BoundingBox::from_points(Point::new(0.0, 0.0, 0.0), Point::new(1.0, 1.0, 0.0));
        assert!(bbox.max.z() > bbox.min.z());
        assert!(bbox.contains(Point::new(0.5, 0.5, 0.0)));
    }

    #[test]
    fn test_bbox_surrounding() {
        let box1 = BoundingBox::from_points(Point::ZERO, Point::new(5.0, 5.0, 5.0));
        let box2 = BoundingBox::from_points(Point::new(3.0, 3.0, 3.0), Point::new(10.0, 10.0, 10.0));
        let surrounding = BoundingBox::surrounding(&box1, &box2);

        assert_eq!(surrounding.min, Point::ZERO);
        assert_eq!(surrounding.max, Point::new(10.0, 10.0, 10.0));
    }

    #[test]
    fn test_bbox_center() {
        let bbox = BoundingBox::from_points(Point::ZERO, Point::new(10.0, 10.0, 10.0));
        assert_eq!(bbox.center(), Point::new(5.0, 5.0, 5.0));
    }

    #[test]
    fn test_bbox_hit_towards_and_away() {
        let bbox = unit_box();

        let towards = Ray::new(Point::new(2.0, 0.0, 0.0), Vector::new(-1.0, 0.0, 0.0).unwrap());
        assert!(bbox.intersects(&towards, f64::INFINITY));

        let away = Ray::new(Point::new(2.0, 0.0, 0.0), Vector::X);
        assert!(!bbox.intersects(&away, f64::INFINITY));
    }

    #[test]
    fn test_bbox_hit_parallel_slab() {
        let bbox = unit_box();

        // Parallel to the x and y slabs, inside both
        let inside = Ray::new(Point::new(0.5, 0.5, -5.0), Vector::Z);
        assert!(bbox.intersects(&inside, f64::INFINITY));

        // Parallel to the x slab but outside of it
        let outside = Ray::new(Point::new(5.0, 0.0, -5.0), Vector::Z);
        assert!(!bbox.intersects(&outside, f64::INFINITY));
    }

    #[test]
    fn test_bbox_hit_diagonal_miss() {
        let bbox = unit_box();
        let ray = Ray::new(Point::new(3.0, 0.0, 0.0), Vector::new(0.0, 1.0, 1.0).unwrap());
        assert!(!bbox.intersects(&ray, f64::INFINITY));
    }

    #[test]
    fn test_bbox_hit_respects_max_distance() {
        let bbox = unit_box();
        let ray = Ray::new(Point::new(0.0, 0.0, -10.0), Vector::Z);
        assert!(!bbox.intersects(&ray, 5.0));
        assert!(bbox.intersects(&ray, 9.5));
    }

    #[test]
    fn test_bbox_hit_from_inside() {
        let bbox = unit_box();
        let ray = Ray::new(Point::ZERO, Vector::new(1.0, 2.0, 3.0).unwrap());
        assert!(bbox.intersects(&ray, f64::INFINITY));
    }
}
