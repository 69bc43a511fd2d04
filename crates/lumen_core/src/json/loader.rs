//! High-level JSON scene loading.
//!
//! This module provides the entry points for reading scene files and
//! converting them into a `SceneDescription`.

use std::path::Path;

use lumen_math::{Point, Vector};
use thiserror::Error;

use super::types::{
    RawAmbientLight, RawCamera, RawCoefficient, RawGeometry, RawLight, RawMaterial, RawScene,
    RawShape, SceneFile, Triple,
};
use crate::{
    AmbientLight, CameraDescription, Color, DirectionalLight, Double3, GeometryDescription, Light,
    Material, PointLight, SceneDescription, ShapeDescription, SpotLight,
};

/// Errors that can occur during scene loading.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Zero vector given for {0}")]
    ZeroVector(&'static str),

    #[error("Triangle needs exactly 3 vertices, found {0}")]
    TriangleVertices(usize),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Load a JSON scene file.
///
/// The scene name defaults to the file stem when the file has none.
pub fn load_scene_json<P: AsRef<Path>>(path: P) -> LoadResult<SceneDescription> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let mut scene = load_scene_from_str(&text)?;

    if scene.name.is_empty() {
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            scene.name = stem.to_string();
        }
    }

    Ok(scene)
}

/// Parse a JSON scene from a string.
pub fn load_scene_from_str(text: &str) -> LoadResult<SceneDescription> {
    let file: SceneFile = serde_json::from_str(text)?;
    let scene = convert_scene(file.scene)?;

    log::info!(
        "Loaded scene '{}': {} geometries ({}), {} lights",
        scene.name,
        scene.geometries.len(),
        scene.geometry_summary(),
        scene.lights.len()
    );
    if scene.geometries.is_empty() {
        log::warn!("Scene '{}' has no geometries", scene.name);
    }

    Ok(scene)
}

fn convert_scene(raw: RawScene) -> LoadResult<SceneDescription> {
    let mut scene = SceneDescription::new(raw.name.unwrap_or_default());

    if let Some(background) = raw.background_color {
        scene.background = color(background);
    }
    if let Some(ambient) = raw.ambient_light {
        scene.ambient = convert_ambient(ambient);
    }
    scene.geometries = raw
        .geometries
        .into_iter()
        .map(convert_geometry)
        .collect::<LoadResult<_>>()?;
    scene.lights = raw
        .lights
        .into_iter()
        .map(convert_light)
        .collect::<LoadResult<_>>()?;
    scene.camera = raw.camera.map(convert_camera).transpose()?;

    Ok(scene)
}

fn convert_ambient(raw: RawAmbientLight) -> AmbientLight {
    let ka = raw.ka.map(coefficient).unwrap_or(Double3::ONE);
    AmbientLight::new(color(raw.color), ka)
}

fn convert_geometry(raw: RawGeometry) -> LoadResult<GeometryDescription> {
    let shape = match raw.shape {
        RawShape::Sphere(s) => ShapeDescription::Sphere {
            center: point(s.center),
            radius: s.radius,
        },
        RawShape::Plane(p) => ShapeDescription::Plane {
            point: point(p.point),
            normal: vector(p.normal, "plane normal")?,
        },
        RawShape::Triangle(vertices) => {
            let vertices: [Point; 3] = vertices
                .into_iter()
                .map(point)
                .collect::<Vec<_>>()
                .try_into()
                .map_err(|v: Vec<Point>| LoadError::TriangleVertices(v.len()))?;
            ShapeDescription::Triangle(vertices)
        }
        RawShape::Polygon(vertices) => {
            ShapeDescription::Polygon(vertices.into_iter().map(point).collect())
        }
        RawShape::Tube(t) => ShapeDescription::Tube {
            axis_origin: point(t.axis.origin),
            axis_direction: vector(t.axis.direction, "tube axis")?,
            radius: t.radius,
        },
        RawShape::Cylinder(c) => ShapeDescription::Cylinder {
            axis_origin: point(c.axis.origin),
            axis_direction: vector(c.axis.direction, "cylinder axis")?,
            radius: c.radius,
            height: c.height,
        },
    };

    Ok(GeometryDescription {
        shape,
        material: raw.material.map(convert_material).unwrap_or_default(),
        emission: raw.emission.map(color).unwrap_or(Color::ZERO),
    })
}

fn convert_material(raw: RawMaterial) -> Material {
    let mut material = Material::new();
    if let Some(kd) = raw.kd {
        material = material.with_kd(coefficient(kd));
    }
    if let Some(ks) = raw.ks {
        material = material.with_ks(coefficient(ks));
    }
    if let Some(kr) = raw.kr {
        material = material.with_kr(coefficient(kr));
    }
    if let Some(kt) = raw.kt {
        material = material.with_kt(coefficient(kt));
    }
    if let Some(ns) = raw.ns {
        material = material.with_shininess(ns);
    }
    material
}

fn convert_light(raw: RawLight) -> LoadResult<Light> {
    let light = match raw {
        RawLight::Point(p) => {
            let mut light = PointLight::new(color(p.color), point(p.position));
            if let Some(kc) = p.kc {
                light = light.with_kc(kc);
            }
            if let Some(kl) = p.kl {
                light = light.with_kl(kl);
            }
            if let Some(kq) = p.kq {
                light = light.with_kq(kq);
            }
            Light::Point(light)
        }
        RawLight::Spot(s) => {
            let mut light = SpotLight::new(
                color(s.color),
                point(s.position),
                vector(s.direction, "spot light direction")?,
            );
            if let Some(kc) = s.kc {
                light = light.with_kc(kc);
            }
            if let Some(kl) = s.kl {
                light = light.with_kl(kl);
            }
            if let Some(kq) = s.kq {
                light = light.with_kq(kq);
            }
            if let Some(narrow_beam) = s.narrow_beam {
                light = light.with_narrow_beam(narrow_beam);
            }
            Light::Spot(light)
        }
        RawLight::Directional(d) => Light::Directional(DirectionalLight::new(
            color(d.color),
            vector(d.direction, "directional light direction")?,
        )),
    };
    Ok(light)
}

fn convert_camera(raw: RawCamera) -> LoadResult<CameraDescription> {
    Ok(CameraDescription {
        location: point(raw.location),
        to: vector(raw.to, "camera forward direction")?,
        up: vector(raw.up, "camera up direction")?,
        width: raw.width,
        height: raw.height,
        distance: raw.distance,
    })
}

fn point(t: Triple) -> Point {
    Point::from(t.0)
}

fn color(t: Triple) -> Color {
    Color::from_array(t.0)
}

fn vector(t: Triple, field: &'static str) -> LoadResult<Vector> {
    let [x, y, z] = t.0;
    Vector::new(x, y, z).map_err(|_| LoadError::ZeroVector(field))
}

fn coefficient(c: RawCoefficient) -> Double3 {
    match c {
        RawCoefficient::Scalar(k) => Double3::splat(k),
        RawCoefficient::Triple(t) => Double3::from_array(t.0),
    }
}
