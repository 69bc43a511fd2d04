//! Lumen Renderer - Whitted-style CPU ray tracing
//!
//! Recursive ray tracer with local Phong-style lighting, shadows attenuated
//! by transparent blockers, mirror reflection and straight-through
//! refraction.
//!
//! - **Geometry**: spheres, planes, triangles, convex polygons, tubes and
//!   capped cylinders behind one [`geometry::Surface`] contract
//! - **Acceleration**: a BVH over the bounded geometries
//! - **Rendering**: a [`Camera`] that shoots primary rays (optionally with
//!   anti-aliasing and depth of field) over a fixed pool of worker threads
//!   pulling image buckets
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use lumen_renderer::{Camera, ImageWriter, Scene, ThreadCount, WhittedTracer};
//!
//! let scene = Arc::new(Scene::load("scenes/spheres.json")?);
//! let mut camera = Camera::builder()
//!     .with_location(Point::new(0.0, 0.0, 1000.0))
//!     .with_direction(-Vector::Z, Vector::Y)
//!     .with_view_plane_size(200.0, 200.0)
//!     .with_view_plane_distance(1000.0)
//!     .with_image_sink(ImageWriter::new("spheres.png", 800, 800))
//!     .with_ray_tracer(WhittedTracer::new(scene))
//!     .with_threads(ThreadCount::Auto)
//!     .build()?;
//! camera.render_image();
//! camera.write_to_image()?;
//! ```

mod bucket;
mod bvh;
mod camera;
mod error;
pub mod geometry;
mod intersectable;
mod output;
mod render;
mod scene;
mod tracer;

pub use bucket::{generate_buckets, Bucket, DEFAULT_BUCKET_SIZE};
pub use bvh::build as build_bvh;
pub use camera::{Camera, CameraBuilder, RenderSettings};
pub use error::{CameraError, GeometryError, ImageError, SceneError};
pub use intersectable::{GeoPoint, Intersectable};
pub use output::{color_to_rgb, ImageSink, ImageWriter, PixelBuffer};
pub use render::ThreadCount;
pub use scene::{Scene, SceneBuilder};
pub use tracer::{RayTracer, WhittedTracer, INITIAL_K, MAX_CALC_COLOR_LEVEL, MIN_CALC_COLOR_K};

/// Re-export the math and scene description crates
pub use lumen_core::{Color, Double3, Light, Material};
pub use lumen_math::{Point, Ray, Vector};
