//! # meshdd
//!
//! Texture driven displacement and exact volume difference of triangle
//! meshes, for splitting a surface into parts printed in different
//! materials.
//!
//! ## Architecture
//!
//! ```text
//! texture + UV → mask → displaced vertices → difference mesh
//! ```
//!
//! ## Components
//!
//! - **Texture Sampler** ([`texture`]): nearest or bilinear lookups with
//!   clamping, channel mean, thresholding and Gaussian blur.
//! - **Displacement Engine** ([`displace`]): moves masked vertices along
//!   per-vertex directions.
//! - **Classifier** ([`classify`]): face classes, boundary edges and boundary
//!   loops of a mask.
//! - **Difference Builder** ([`difference`]): closed surface of the volume
//!   swept by the displacement, built from existing triangles only.
//! - **Pipeline** ([`pipeline`]): single, layered and file to file splits
//!   over any [`MeshSource`].
//!
//! All core operations are pure and deterministic.
//!
//! ## Usage
//!
//! ```rust
//! use config::settings::SplitConfig;
//! use meshdd::{primitives::create_uv_sphere, split_by_texture, TextureField};
//!
//! let sphere = create_uv_sphere(50.0, 64, 31).unwrap();
//! let texture = TextureField::from_scalars(1, 2, vec![255.0, 0.0]).unwrap();
//!
//! // Carve the northern hemisphere
//! let parts = split_by_texture(&sphere, &texture, &SplitConfig::default()).unwrap();
//! assert_eq!(parts.report.loops, 1);
//! ```

pub mod clean;
pub mod classify;
pub mod difference;
pub mod displace;
pub mod error;
pub mod mesh;
pub mod pipeline;
pub mod primitives;
pub mod source;
pub mod texture;

pub use classify::{classify, BoundaryEdge, BoundaryLoop, Classification, FaceClass};
pub use difference::{difference, DifferenceMesh, DifferenceReport};
pub use displace::displace;
pub use error::MeshError;
pub use mesh::Mesh;
pub use pipeline::{split_by_texture, split_file, split_layers, LayeredSplit, SplitParts};
pub use source::MeshSource;
pub use texture::TextureField;
