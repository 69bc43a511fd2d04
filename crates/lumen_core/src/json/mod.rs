//! JSON scene file support.
//!
//! Scene files wrap everything in a top-level `"scene"` object. Points,
//! vectors and colors are written either as `"x y z"` strings or as
//! three-element arrays.

mod loader;
mod types;

pub use loader::{load_scene_from_str, load_scene_json, LoadError, LoadResult};
pub use types::Triple;
