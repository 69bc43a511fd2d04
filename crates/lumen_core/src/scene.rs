//! Renderer-agnostic scene description.
//!
//! These types describe what a scene contains without building any
//! acceleration structure. The renderer turns a `SceneDescription` into its
//! own intersectable scene graph.

use lumen_math::{Point, Vector};

use crate::{AmbientLight, Color, Light, Material};

/// Shape parameters of one geometry.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeDescription {
    Sphere {
        center: Point,
        radius: f64,
    },
    Plane {
        point: Point,
        normal: Vector,
    },
    Triangle([Point; 3]),
    /// Ordered, convex vertex loop
    Polygon(Vec<Point>),
    /// Infinite cylindrical surface around an axis
    Tube {
        axis_origin: Point,
        axis_direction: Vector,
        radius: f64,
    },
    /// Capped cylinder starting at `axis_origin`
    Cylinder {
        axis_origin: Point,
        axis_direction: Vector,
        radius: f64,
        height: f64,
    },
}

impl ShapeDescription {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ShapeDescription::Sphere { .. } => "sphere",
            ShapeDescription::Plane { .. } => "plane",
            ShapeDescription::Triangle(_) => "triangle",
            ShapeDescription::Polygon(_) => "polygon",
            ShapeDescription::Tube { .. } => "tube",
            ShapeDescription::Cylinder { .. } => "cylinder",
        }
    }
}

/// A shape with its surface properties.
#[derive(Clone, Debug, PartialEq)]
pub struct GeometryDescription {
    pub shape: ShapeDescription,
    pub material: Material,
    pub emission: Color,
}

impl GeometryDescription {
    pub fn new(shape: ShapeDescription) -> Self {
        Self {
            shape,
            material: Material::default(),
            emission: Color::ZERO,
        }
    }
}

/// Camera placement and view plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraDescription {
    pub location: Point,
    /// Forward direction
    pub to: Vector,
    pub up: Vector,
    /// View plane width
    pub width: f64,
    /// View plane height
    pub height: f64,
    /// Distance from the camera to the view plane
    pub distance: f64,
}

impl Default for CameraDescription {
    fn default() -> Self {
        Self {
            location: Point::ZERO,
            to: -Vector::Z,
            up: Vector::Y,
            width: 200.0,
            height: 200.0,
            distance: 1000.0,
        }
    }
}

/// Everything needed to build a renderable scene.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneDescription {
    pub name: String,
    pub background: Color,
    pub ambient: AmbientLight,
    pub geometries: Vec<GeometryDescription>,
    pub lights: Vec<Light>,
    /// Camera stored with the scene, if any
    pub camera: Option<CameraDescription>,
}

impl SceneDescription {
    /// Create an empty scene with a black background.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            background: Color::ZERO,
            ambient: AmbientLight::NONE,
            geometries: Vec::new(),
            lights: Vec::new(),
            camera: None,
        }
    }

    /// Number of geometries of each kind, for logging.
    pub fn geometry_summary(&self) -> String {
        let mut counts: Vec<(&'static str, usize)> = Vec::new();
        for geometry in &self.geometries {
            let kind = geometry.shape.kind();
            match counts.iter_mut().find(|(k, _)| *k == kind) {
                Some((_, n)) => *n += 1,
                None => counts.push((kind, 1)),
            }
        }
        counts
            .iter()
            .map(|(kind, n)| format!("{n} {kind}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_summary() {
        let mut scene = SceneDescription::new("summary");
        for i in 0..2 {
            scene.geometries.push(GeometryDescription::new(ShapeDescription::Sphere {
                center: Point::new(i as f64, 0.0, 0.0),
                radius: 1.0,
            }));
        }
        scene.geometries.push(GeometryDescription::new(ShapeDescription::Plane {
            point: Point::ZERO,
            normal: Vector::Z,
        }));

        assert_eq!(scene.geometry_summary(), "2 sphere, 1 plane");
    }

    #[test]
    fn test_default_camera_is_orthogonal() {
        let camera = CameraDescription::default();
        assert_eq!(camera.to.dot(camera.up), 0.0);
    }
}
