//! # meshdd-io
//!
//! File adapters implementing [`meshdd::MeshSource`]:
//!
//! - **PLY** ([`PlyMeshSource`]) - ASCII and binary, with normals and
//!   texture coordinates
//! - **STL** ([`StlMeshSource`]) - ASCII and binary, positions only
//! - **Extension dispatch** ([`FileMeshSource`])
//! - **In-memory** ([`MemoryMeshSource`])
//!
//! ## Example
//!
//! ```no_run
//! use config::settings::FileSplitConfig;
//! use meshdd::{split_file, TextureField};
//! use meshdd_io::FileMeshSource;
//! use std::path::Path;
//!
//! let texture = TextureField::from_scalars(1, 2, vec![255.0, 0.0]).unwrap();
//! let outputs = split_file(
//!     &mut FileMeshSource::default(),
//!     Path::new("sphere.ply"),
//!     &texture,
//!     &FileSplitConfig::default(),
//!     Path::new("out"),
//! )
//! .unwrap();
//! println!("{}", outputs.difference.display());
//! ```

mod error;
mod file;
mod memory;
mod ply;
mod stl;

pub use error::{IoError, IoResult};
pub use file::{FileMeshSource, MeshFormat};
pub use memory::MemoryMeshSource;
pub use ply::{load_ply, read_ply, save_ply, PlyMeshSource};
pub use stl::{load_stl, read_stl, save_stl, StlMeshSource};
