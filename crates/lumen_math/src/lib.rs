//! Lumen math types.
//!
//! Points, non-zero vectors, rays, intervals and axis-aligned bounding boxes,
//! all in double precision on top of `glam::DVec3`.

// Re-export glam for convenience
pub use glam::{self, DVec3};

mod bbox;
mod interval;
mod point;
mod ray;
pub mod util;
mod vector;

pub use bbox::BoundingBox;
pub use interval::Interval;
pub use point::Point;
pub use ray::Ray;
pub use util::{align_zero, is_zero};
pub use vector::{InvalidVector, Vector};
