//! Convex polygon and triangle primitives.

use super::{Plane, Surface};
use crate::GeometryError;
use lumen_math::{align_zero, is_zero, BoundingBox, InvalidVector, Point, Ray, Vector};

/// A flat, convex polygon given by its ordered vertex loop.
///
/// Points exactly on an edge or a vertex do not count as hits.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point>,
    plane: Plane,
}

impl Polygon {
    /// Create a polygon from at least three ordered, coplanar vertices
    /// forming a convex loop.
    pub fn new(vertices: Vec<Point>) -> Result<Self, GeometryError> {
        if vertices.len() < 3 {
            return Err(GeometryError::TooFewVertices(vertices.len()));
        }

        let plane = Plane::from_points(vertices[0], vertices[1], vertices[2])?;
        if vertices.len() > 3 {
            check_convex(&vertices, plane.normal())?;
        }

        Ok(Self { vertices, plane })
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Whether `ray` passes strictly inside every edge.
    fn inside_edges(&self, ray: &Ray) -> bool {
        let origin = ray.origin();
        let dir = ray.direction();
        let n = self.vertices.len();

        let mut sign = None;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let edge_normal = a
                .subtract(origin)
                .and_then(|va| va.cross(b.subtract(origin)?));
            // Origin in line with the edge
            let Ok(edge_normal) = edge_normal else {
                return false;
            };

            let s = align_zero(dir.dot(edge_normal.normalize()));
            if s == 0.0 {
                return false;
            }
            match sign {
                None => sign = Some(s > 0.0),
                Some(positive) if positive != (s > 0.0) => return false,
                Some(_) => {}
            }
        }
        true
    }
}

/// Check coplanarity and convexity of a vertex loop with `n` as the plane
/// normal. The turn between every two consecutive edges must have the
/// same sign.
fn check_convex(vertices: &[Point], n: Vector) -> Result<(), GeometryError> {
    let len = vertices.len();
    let mut edge1 = vertices[len - 1].subtract(vertices[len - 2])?;
    let mut edge2 = vertices[0].subtract(vertices[len - 1])?;

    let turn = |e1: Vector, e2: Vector| -> Result<bool, GeometryError> {
        let cross = e1.cross(e2).map_err(|_| GeometryError::Degenerate)?;
        Ok(align_zero(cross.dot(n)) > 0.0)
    };

    let positive = turn(edge1, edge2)?;
    for i in 1..len {
        let offset = vertices[i].subtract(vertices[0])?;
        if !is_zero(offset.dot(n)) {
            return Err(GeometryError::NonPlanar);
        }

        edge1 = edge2;
        edge2 = vertices[i].subtract(vertices[i - 1])?;
        if turn(edge1, edge2)? != positive {
            return Err(GeometryError::NotConvex);
        }
    }
    Ok(())
}

impl Surface for Polygon {
    fn normal_at(&self, _point: Point) -> Result<Vector, InvalidVector> {
        Ok(self.plane.normal())
    }

    fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<Point> {
        let points = self.plane.intersect(ray, max_distance);
        if points.is_empty() || !self.inside_edges(ray) {
            return Vec::new();
        }
        points
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::enclosing(self.vertices.iter().copied())
    }
}

/// A polygon with exactly three vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle(Polygon);

impl Triangle {
    /// Create a triangle. Fails when the vertices are coincident or
    /// collinear.
    pub fn new(a: Point, b: Point, c: Point) -> Result<Self, GeometryError> {
        Polygon::new(vec![a, b, c]).map(Triangle)
    }

    pub fn vertices(&self) -> &[Point] {
        self.0.vertices()
    }
}

impl Surface for Triangle {
    fn normal_at(&self, point: Point) -> Result<Vector, InvalidVector> {
        self.0.normal_at(point)
    }

    fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<Point> {
        self.0.intersect(ray, max_distance)
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        self.0.bounding_box()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point {
        Point::new(x, y, z)
    }

    fn square_ish() -> Polygon {
        Polygon::new(vec![
            p(1.0, 1.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(-1.0, -1.0, 0.0),
            p(0.0, 1.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_polygon_valid() {
        let polygon = Polygon::new(vec![
            p(0.0, 0.0, 1.0),
            p(1.0, 0.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(-1.0, 1.0, 1.0),
        ]);
        assert!(polygon.is_ok());
    }

    #[test]
    fn test_polygon_invalid_vertex_loops() {
        let base = [p(0.0, 0.0, 1.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)];
        let with = |extra: Point| {
            let mut v = base.to_vec();
            v.push(extra);
            Polygon::new(v)
        };

        // Wrong vertex order
        let wrong_order = Polygon::new(vec![
            p(0.0, 0.0, 1.0),
            p(0.0, 1.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(-1.0, 1.0, 1.0),
        ]);
        assert!(wrong_order.is_err());

        // Not in the same plane
        assert_eq!(with(p(0.0, 2.0, 2.0)), Err(GeometryError::NonPlanar));
        // Concave
        assert!(with(p(0.5, 0.25, 0.5)).is_err());
        // Vertex on a side
        assert!(with(p(0.0, 0.5, 0.5)).is_err());
        // Last point equals the first
        assert!(with(p(0.0, 0.0, 1.0)).is_err());
        // Co-located points
        assert!(Polygon::new(vec![base[0], base[1], base[1], base[2]]).is_err());
    }

    #[test]
    fn test_polygon_too_few_vertices() {
        assert_eq!(
            Polygon::new(vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)]),
            Err(GeometryError::TooFewVertices(2))
        );
    }

    #[test]
    fn test_polygon_normal() {
        let pts = [p(0.0, 0.0, 1.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0), p(-1.0, 1.0, 1.0)];
        let polygon = Polygon::new(pts.to_vec()).unwrap();
        let n = polygon.normal_at(p(0.0, 0.0, 1.0)).unwrap();

        assert!((n.length() - 1.0).abs() < 1e-9);
        for i in 0..3 {
            let edge = pts[i + 1].subtract(pts[i]).unwrap();
            assert!(n.dot(edge).abs() < 1e-9);
        }
    }

    #[test]
    fn test_polygon_inside() {
        let ray = Ray::new(p(-0.5, -0.5, 1.0), -Vector::Z);
        assert_eq!(
            square_ish().intersect(&ray, f64::INFINITY),
            vec![p(-0.5, -0.5, 0.0)]
        );
    }

    #[test]
    fn test_polygon_outside() {
        let polygon = square_ish();

        // Against an edge
        let ray = Ray::new(p(0.5, 2.0, 1.0), -Vector::Z);
        assert!(polygon.intersect(&ray, f64::INFINITY).is_empty());

        // Against a vertex
        let ray = Ray::new(p(2.0, 2.0, 1.0), -Vector::Z);
        assert!(polygon.intersect(&ray, f64::INFINITY).is_empty());
    }

    #[test]
    fn test_polygon_boundary() {
        let polygon = square_ish();

        // On an edge
        let ray = Ray::new(p(0.5, 1.0, -1.0), Vector::Z);
        assert!(polygon.intersect(&ray, f64::INFINITY).is_empty());

        // On a vertex
        let ray = Ray::new(p(1.0, 1.0, 1.0), -Vector::Z);
        assert!(polygon.intersect(&ray, f64::INFINITY).is_empty());

        // On an edge's continuation
        let ray = Ray::new(p(2.0, 1.0, -1.0), Vector::Z);
        assert!(polygon.intersect(&ray, f64::INFINITY).is_empty());
    }

    #[test]
    fn test_polygon_max_distance() {
        let polygon = square_ish();
        let ray = Ray::new(p(-0.5, -0.5, 2.0), -Vector::Z);

        assert!(polygon.intersect(&ray, 1.0).is_empty());
        assert_eq!(polygon.intersect(&ray, 10.0).len(), 1);
    }

    #[test]
    fn test_polygon_bounding_box() {
        let bbox = square_ish().bounding_box().unwrap();
        assert_eq!(bbox.min.x(), -1.0);
        assert_eq!(bbox.max.y(), 1.0);
        assert!(bbox.contains(p(0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_triangle() {
        let triangle = Triangle::new(p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0), p(0.0, 2.0, 0.0)).unwrap();

        let inside = Ray::new(p(0.5, 0.5, 1.0), -Vector::Z);
        assert_eq!(triangle.intersect(&inside, f64::INFINITY), vec![p(0.5, 0.5, 0.0)]);

        // Beyond the hypotenuse
        let outside = Ray::new(p(1.5, 1.5, 1.0), -Vector::Z);
        assert!(triangle.intersect(&outside, f64::INFINITY).is_empty());

        // On the hypotenuse
        let edge = Ray::new(p(1.0, 1.0, 1.0), -Vector::Z);
        assert!(triangle.intersect(&edge, f64::INFINITY).is_empty());

        let collinear = Triangle::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0), p(2.0, 2.0, 2.0));
        assert_eq!(collinear, Err(GeometryError::Degenerate));
    }
}
