//! Error types for scene construction, camera setup and image output.

use lumen_core::LoadError;
use lumen_math::InvalidVector;
use thiserror::Error;

/// Invalid primitive parameters, reported when the primitive is created.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("zero vector in geometry definition: {0}")]
    ZeroVector(#[from] InvalidVector),

    #[error("radius must be positive")]
    NonPositiveRadius,

    #[error("height must be positive")]
    NonPositiveHeight,

    #[error("a polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("vertices are coincident or collinear")]
    Degenerate,

    #[error("all vertices of a polygon must lie in the same plane")]
    NonPlanar,

    #[error("vertices must be ordered and the polygon must be convex")]
    NotConvex,
}

/// Invalid camera configuration, reported by `CameraBuilder::build`.
#[derive(Error, Debug)]
pub enum CameraError {
    #[error("camera value not set: {0}")]
    MissingField(&'static str),

    #[error("camera forward and up directions must be orthogonal")]
    NotOrthogonal,

    #[error("camera {0} must be positive")]
    NonPositive(&'static str),

    #[error("{0} grid size must be at least 1")]
    InvalidSampling(&'static str),

    #[error("failed to create render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Errors raised while turning a scene description into a renderable scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("failed to load scene: {0}")]
    Load(#[from] LoadError),

    #[error("invalid geometry #{index} ({kind}): {source}")]
    Geometry {
        index: usize,
        kind: &'static str,
        #[source]
        source: GeometryError,
    },
}

/// Errors raised while writing an image file.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
}
