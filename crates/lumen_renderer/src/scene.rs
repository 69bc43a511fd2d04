//! Renderable scene: lights, background and the intersectable scene graph.

use std::path::Path;

use crate::bvh;
use crate::geometry::{Cylinder, Geometry, Plane, Polygon, Shape, Sphere, Triangle, Tube};
use crate::{GeometryError, Intersectable, SceneError};
use lumen_core::{AmbientLight, Color, Light, SceneDescription, ShapeDescription};
use lumen_math::Ray;

/// A scene ready to be traced. Immutable once built.
#[derive(Debug)]
pub struct Scene {
    pub name: String,
    pub background: Color,
    pub ambient: AmbientLight,
    pub lights: Vec<Light>,
    pub geometries: Intersectable,
}

impl Scene {
    /// Start building a scene.
    pub fn builder(name: impl Into<String>) -> SceneBuilder {
        SceneBuilder::new(name)
    }

    /// Build a scene, and its BVH, from a description.
    pub fn from_description(description: &SceneDescription) -> Result<Scene, SceneError> {
        let geometries = description
            .geometries
            .iter()
            .enumerate()
            .map(|(index, g)| {
                let shape = build_shape(&g.shape).map_err(|source| SceneError::Geometry {
                    index,
                    kind: g.shape.kind(),
                    source,
                })?;
                Ok(Geometry::new(shape)
                    .with_material(g.material)
                    .with_emission(g.emission))
            })
            .collect::<Result<Vec<_>, SceneError>>()?;

        Ok(Scene::builder(description.name.clone())
            .with_background(description.background)
            .with_ambient(description.ambient)
            .with_lights(description.lights.iter().copied())
            .with_geometries(geometries)
            .build())
    }

    /// Load a JSON scene file and build it.
    pub fn load(path: impl AsRef<Path>) -> Result<Scene, SceneError> {
        let description = lumen_core::load_scene_json(path)?;
        Self::from_description(&description)
    }
}

fn build_shape(shape: &ShapeDescription) -> Result<Shape, GeometryError> {
    let shape = match shape {
        ShapeDescription::Sphere { center, radius } => Sphere::new(*center, *radius)?.into(),
        ShapeDescription::Plane { point, normal } => Plane::new(*point, *normal).into(),
        ShapeDescription::Triangle([a, b, c]) => Triangle::new(*a, *b, *c)?.into(),
        ShapeDescription::Polygon(vertices) => Polygon::new(vertices.clone())?.into(),
        ShapeDescription::Tube {
            axis_origin,
            axis_direction,
            radius,
        } => Tube::new(Ray::new(*axis_origin, *axis_direction), *radius)?.into(),
        ShapeDescription::Cylinder {
            axis_origin,
            axis_direction,
            radius,
            height,
        } => Cylinder::new(Ray::new(*axis_origin, *axis_direction), *radius, *height)?.into(),
    };
    Ok(shape)
}

/// Builder for [`Scene`].
#[derive(Debug)]
pub struct SceneBuilder {
    name: String,
    background: Color,
    ambient: AmbientLight,
    lights: Vec<Light>,
    geometries: Vec<Geometry>,
    use_bvh: bool,
}

impl SceneBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            background: Color::ZERO,
            ambient: AmbientLight::NONE,
            lights: Vec::new(),
            geometries: Vec::new(),
            use_bvh: true,
        }
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_ambient(mut self, ambient: AmbientLight) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn with_light(mut self, light: impl Into<Light>) -> Self {
        self.lights.push(light.into());
        self
    }

    pub fn with_lights(mut self, lights: impl IntoIterator<Item = Light>) -> Self {
        self.lights.extend(lights);
        self
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometries.push(geometry);
        self
    }

    pub fn with_geometries(mut self, geometries: impl IntoIterator<Item = Geometry>) -> Self {
        self.geometries.extend(geometries);
        self
    }

    /// Build a BVH over the geometries (default), or keep them in one flat
    /// group when `false`.
    pub fn with_bvh(mut self, use_bvh: bool) -> Self {
        self.use_bvh = use_bvh;
        self
    }

    pub fn build(self) -> Scene {
        let count = self.geometries.len();
        let geometries = if self.use_bvh {
            bvh::build(self.geometries)
        } else {
            Intersectable::flat(self.geometries)
        };

        log::info!(
            "Scene '{}' ready: {} geometries, {} lights{}",
            self.name,
            count,
            self.lights.len(),
            if self.use_bvh { "" } else { " (no BVH)" }
        );

        Scene {
            name: self.name,
            background: self.background,
            ambient: self.ambient,
            lights: self.lights,
            geometries,
        }
    }
}
