//! In-memory mesh store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use meshdd::{Mesh, MeshSource};

use crate::error::{IoError, IoResult};

/// Mesh source keeping meshes in a map keyed by path.
///
/// ```rust
/// use meshdd::{Mesh, MeshSource};
/// use meshdd_io::MemoryMeshSource;
/// use std::path::Path;
///
/// let mut store = MemoryMeshSource::new();
/// store.write(Path::new("a.ply"), &Mesh::new()).unwrap();
/// assert!(store.contains(Path::new("a.ply")));
/// assert!(store.read(Path::new("b.ply")).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryMeshSource {
    meshes: HashMap<PathBuf, Mesh>,
}

impl MemoryMeshSource {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `mesh` at `path`, replacing any previous mesh.
    pub fn insert(&mut self, path: impl Into<PathBuf>, mesh: Mesh) {
        self.meshes.insert(path.into(), mesh);
    }

    /// Returns the mesh stored at `path`.
    pub fn get(&self, path: &Path) -> Option<&Mesh> {
        self.meshes.get(path)
    }

    /// Returns true if a mesh is stored at `path`.
    pub fn contains(&self, path: &Path) -> bool {
        self.meshes.contains_key(path)
    }

    /// Number of stored meshes.
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

impl MeshSource for MemoryMeshSource {
    type Error = IoError;

    fn read(&self, path: &Path) -> IoResult<Mesh> {
        self.meshes
            .get(path)
            .cloned()
            .ok_or_else(|| IoError::FileNotFound {
                path: path.to_path_buf(),
            })
    }

    fn write(&mut self, path: &Path, mesh: &Mesh) -> IoResult<()> {
        self.insert(path, mesh.clone());
        Ok(())
    }
}
