//! Geometric primitives.
//!
//! Every primitive implements [`Surface`]: a unit normal at a surface point,
//! the intersections of a ray up to a maximum distance, and an optional
//! bounding box. Unbounded primitives (planes and tubes) return `None` and
//! are never put in the BVH.

mod cylinder;
mod plane;
mod polygon;
mod sphere;
mod tube;

pub use cylinder::Cylinder;
pub use plane::Plane;
pub use polygon::{Polygon, Triangle};
pub use sphere::Sphere;
pub use tube::Tube;

use lumen_core::{Color, Material};
use lumen_math::{BoundingBox, InvalidVector, Point, Ray, Vector};

/// Shape contract shared by all primitives.
pub trait Surface {
    /// Unit normal at a point on the surface.
    ///
    /// Fails only for points where the normal is undefined, such as the
    /// center of a sphere.
    fn normal_at(&self, point: Point) -> Result<Vector, InvalidVector>;

    /// Intersection points of `ray` no further than `max_distance` from its
    /// origin. Order is unspecified.
    fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<Point>;

    /// Axis-aligned box around the shape, `None` when unbounded.
    fn bounding_box(&self) -> Option<BoundingBox>;
}

/// One of the supported primitives.
#[derive(Debug, Clone)]
pub enum Shape {
    Sphere(Sphere),
    Plane(Plane),
    Polygon(Polygon),
    Triangle(Triangle),
    Tube(Tube),
    Cylinder(Cylinder),
}

impl Shape {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Sphere(_) => "sphere",
            Shape::Plane(_) => "plane",
            Shape::Polygon(_) => "polygon",
            Shape::Triangle(_) => "triangle",
            Shape::Tube(_) => "tube",
            Shape::Cylinder(_) => "cylinder",
        }
    }

    fn surface(&self) -> &dyn Surface {
        match self {
            Shape::Sphere(s) => s,
            Shape::Plane(s) => s,
            Shape::Polygon(s) => s,
            Shape::Triangle(s) => s,
            Shape::Tube(s) => s,
            Shape::Cylinder(s) => s,
        }
    }
}

impl Surface for Shape {
    fn normal_at(&self, point: Point) -> Result<Vector, InvalidVector> {
        self.surface().normal_at(point)
    }

    fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<Point> {
        self.surface().intersect(ray, max_distance)
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        self.surface().bounding_box()
    }
}

macro_rules! impl_from_shape {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Shape {
                fn from(shape: $variant) -> Self {
                    Shape::$variant(shape)
                }
            }
        )*
    };
}

impl_from_shape!(Sphere, Plane, Polygon, Triangle, Tube, Cylinder);

/// A shape with its emission and surface material.
#[derive(Debug, Clone)]
pub struct Geometry {
    shape: Shape,
    emission: Color,
    material: Material,
    bbox: Option<BoundingBox>,
}

impl Geometry {
    /// Create a black, non-reflective geometry.
    pub fn new(shape: impl Into<Shape>) -> Self {
        let shape = shape.into();
        let bbox = shape.bounding_box();
        Self {
            shape,
            emission: Color::ZERO,
            material: Material::default(),
            bbox,
        }
    }

    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = emission;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn emission(&self) -> Color {
        self.emission
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Cached bounding box of the shape.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.bbox
    }

    pub fn normal_at(&self, point: Point) -> Result<Vector, InvalidVector> {
        self.shape.normal_at(point)
    }

    /// Intersections with `ray`, rejecting early when the ray misses the
    /// bounding box.
    pub fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<Point> {
        match self.bbox {
            Some(bbox) if !bbox.intersects(ray, max_distance) => Vec::new(),
            _ => self.shape.intersect(ray, max_distance),
        }
    }
}

/// Keep the points of `ts` that are in front of the ray and within range.
///
/// Parameters are snapped with `align_zero` first, so a root at the origin
/// is never reported.
pub(crate) fn points_in_range(ray: &Ray, ts: &[f64], max_distance: f64) -> Vec<Point> {
    ts.iter()
        .map(|&t| lumen_math::align_zero(t))
        .filter(|&t| t > 0.0 && lumen_math::align_zero(t - max_distance) <= 0.0)
        .map(|t| ray.at(t))
        .collect()
}
