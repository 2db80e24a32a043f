//! # Mesh Sources
//!
//! Capability interface for reading, writing and cleaning meshes. The
//! pipeline only talks to this trait; file formats live in `meshdd-io`.

use crate::clean::clean;
use crate::error::MeshError;
use crate::mesh::Mesh;
use config::constants::CLEAN_MERGE_TOLERANCE;
use std::path::Path;

/// Reads meshes from and writes meshes to some storage.
pub trait MeshSource {
    /// Adapter error, able to carry core errors raised during a split.
    type Error: From<MeshError>;

    /// Reads the mesh stored at `path`.
    fn read(&self, path: &Path) -> Result<Mesh, Self::Error>;

    /// Stores `mesh` at `path`.
    fn write(&mut self, path: &Path, mesh: &Mesh) -> Result<(), Self::Error>;

    /// Welds coincident vertices and drops degenerate faces.
    fn clean(&self, mesh: &Mesh) -> Mesh {
        clean(mesh, CLEAN_MERGE_TOLERANCE)
    }
}
