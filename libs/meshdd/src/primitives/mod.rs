//! # Primitive Shapes
//!
//! Closed test and demo surfaces carrying normals and texture coordinates,
//! ready for texture driven displacement.

mod sphere;
mod torus;

pub use sphere::{create_default_sphere, create_uv_sphere};
pub use torus::create_torus;
