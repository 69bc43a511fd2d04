//! Intersectable scene graph: primitives, flat groups and BVH branches.

use crate::geometry::Geometry;
use lumen_math::{BoundingBox, InvalidVector, Point, Ray, Vector};

/// A point on the surface of a specific geometry.
#[derive(Debug, Clone, Copy)]
pub struct GeoPoint<'a> {
    pub geometry: &'a Geometry,
    pub point: Point,
}

impl<'a> GeoPoint<'a> {
    /// Surface normal of the geometry at this point.
    pub fn normal(&self) -> Result<Vector, InvalidVector> {
        self.geometry.normal_at(self.point)
    }
}

impl PartialEq for GeoPoint<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.geometry, other.geometry) && self.point == other.point
    }
}

/// Node of the intersectable scene graph.
///
/// Built once, then only read while rendering. Any node with a bounding
/// box rejects rays that miss it before looking at its children.
#[derive(Debug, Default)]
pub enum Intersectable {
    /// Nothing to hit.
    #[default]
    Empty,
    /// A single geometry.
    Primitive(Geometry),
    /// Members tested one by one. `bbox` is `None` when any member is
    /// unbounded.
    Group {
        members: Vec<Intersectable>,
        bbox: Option<BoundingBox>,
    },
    /// Internal BVH node with exactly two children.
    Branch {
        left: Box<Intersectable>,
        right: Box<Intersectable>,
        bbox: BoundingBox,
    },
}

impl Intersectable {
    /// Wrap nodes in a flat group, computing its bounding box.
    pub fn group(members: Vec<Intersectable>) -> Self {
        let bbox = members
            .iter()
            .map(Intersectable::bounding_box)
            .try_fold(None::<BoundingBox>, |acc, b| {
                let b = b?;
                Some(Some(match acc {
                    Some(acc) => BoundingBox::surrounding(&acc, &b),
                    None => b,
                }))
            })
            .flatten();
        Intersectable::Group { members, bbox }
    }

    /// Flat group of geometries, without acceleration.
    pub fn flat(geometries: Vec<Geometry>) -> Self {
        Self::group(geometries.into_iter().map(Intersectable::Primitive).collect())
    }

    /// Bounding box of the node, `None` when empty or unbounded.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        match self {
            Intersectable::Empty => None,
            Intersectable::Primitive(geometry) => geometry.bounding_box(),
            Intersectable::Group { bbox, .. } => *bbox,
            Intersectable::Branch { bbox, .. } => Some(*bbox),
        }
    }

    /// Number of geometries below this node.
    pub fn geometry_count(&self) -> usize {
        match self {
            Intersectable::Empty => 0,
            Intersectable::Primitive(_) => 1,
            Intersectable::Group { members, .. } => {
                members.iter().map(Intersectable::geometry_count).sum()
            }
            Intersectable::Branch { left, right, .. } => {
                left.geometry_count() + right.geometry_count()
            }
        }
    }

    /// All intersections of `ray` within `max_distance`, in no particular
    /// order.
    pub fn find_intersections(&self, ray: &Ray, max_distance: f64) -> Vec<GeoPoint<'_>> {
        let mut hits = Vec::new();
        self.collect_intersections(ray, max_distance, &mut hits);
        hits
    }

    /// The intersection closest to the ray origin.
    pub fn find_closest(&self, ray: &Ray) -> Option<GeoPoint<'_>> {
        let hits = self.find_intersections(ray, f64::INFINITY);
        ray.find_closest_by(&hits, |hit| hit.point).copied()
    }

    fn collect_intersections<'a>(
        &'a self,
        ray: &Ray,
        max_distance: f64,
        hits: &mut Vec<GeoPoint<'a>>,
    ) {
        match self {
            Intersectable::Empty => {}
            Intersectable::Primitive(geometry) => {
                hits.extend(
                    geometry
                        .intersect(ray, max_distance)
                        .into_iter()
                        .map(|point| GeoPoint { geometry, point }),
                );
            }
            Intersectable::Group { members, bbox } => {
                if bbox.is_some_and(|b| !b.intersects(ray, max_distance)) {
                    return;
                }
                for member in members {
                    member.collect_intersections(ray, max_distance, hits);
                }
            }
            Intersectable::Branch { left, right, bbox } => {
                if !bbox.intersects(ray, max_distance) {
                    return;
                }
                left.collect_intersections(ray, max_distance, hits);
                right.collect_intersections(ray, max_distance, hits);
            }
        }
    }
}
