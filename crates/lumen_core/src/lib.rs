//! Lumen Core - scene description types shared by the renderer and tools.
//!
//! This crate provides:
//!
//! - **Shading inputs**: `Color`, `Material`, light sources
//! - **Scene description**: a renderer-agnostic `SceneDescription`
//! - **JSON support**: scene file loading
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::load_scene_json;
//!
//! let description = load_scene_json("scenes/spheres.json")?;
//! println!("Loaded {} geometries, {} lights",
//!     description.geometries.len(),
//!     description.lights.len());
//! ```

pub mod color;
pub mod json;
pub mod light;
pub mod material;
pub mod scene;

// Re-export commonly used types
pub use color::{below, Color, Double3};
pub use json::{load_scene_from_str, load_scene_json, LoadError};
pub use light::{AmbientLight, DirectionalLight, Light, PointLight, SpotLight};
pub use material::Material;
pub use scene::{CameraDescription, GeometryDescription, SceneDescription, ShapeDescription};
