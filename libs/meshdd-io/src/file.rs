//! Extension based dispatch between the file formats.

use std::path::Path;

use meshdd::{Mesh, MeshSource};

use crate::error::{IoError, IoResult};
use crate::ply::{load_ply, save_ply};
use crate::stl::{load_stl, save_stl};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshFormat {
    /// Polygon File Format, keeps normals and texture coordinates.
    Ply,
    /// Stereolithography, positions only.
    Stl,
}

impl MeshFormat {
    /// Detects the format from the file extension, ignoring case.
    ///
    /// ```rust
    /// use meshdd_io::MeshFormat;
    ///
    /// assert_eq!(MeshFormat::from_path("earth.PLY"), Some(MeshFormat::Ply));
    /// assert_eq!(MeshFormat::from_path("earth.obj"), None);
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "ply" => Some(Self::Ply),
            "stl" => Some(Self::Stl),
            _ => None,
        }
    }

    /// Like [`MeshFormat::from_path`], failing with `UnknownFormat`.
    pub fn require<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let path = path.as_ref();
        Self::from_path(path).ok_or_else(|| IoError::UnknownFormat {
            extension: path
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default(),
        })
    }
}

/// Mesh source picking the format from each path's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMeshSource {
    /// Write binary files.
    pub binary: bool,
}

impl Default for FileMeshSource {
    fn default() -> Self {
        Self { binary: true }
    }
}

impl MeshSource for FileMeshSource {
    type Error = IoError;

    fn read(&self, path: &Path) -> IoResult<Mesh> {
        match MeshFormat::require(path)? {
            MeshFormat::Ply => load_ply(path),
            MeshFormat::Stl => load_stl(path),
        }
    }

    fn write(&mut self, path: &Path, mesh: &Mesh) -> IoResult<()> {
        match MeshFormat::require(path)? {
            MeshFormat::Ply => save_ply(mesh, path, self.binary),
            MeshFormat::Stl => save_stl(mesh, path, self.binary),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshdd::primitives::create_torus;

    #[test]
    fn dispatches_on_extension() {
        let torus = create_torus(3.0, 1.0, 12, 6).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut source = FileMeshSource::default();

        let ply = dir.path().join("torus.ply");
        source.write(&ply, &torus).unwrap();
        assert_eq!(source.read(&ply).unwrap(), torus);

        let stl = dir.path().join("torus.STL");
        source.write(&stl, &torus).unwrap();
        let loaded = source.read(&stl).unwrap();
        assert_eq!(loaded.triangle_count(), torus.triangle_count());
        assert!(loaded.normals().is_none());
    }

    #[test]
    fn unknown_extension() {
        let source = FileMeshSource::default();
        let err = source.read(Path::new("mesh.obj")).unwrap_err();
        assert!(matches!(err, IoError::UnknownFormat { extension } if extension == "obj"));

        let err = source.read(Path::new("mesh")).unwrap_err();
        assert!(matches!(err, IoError::UnknownFormat { extension } if extension.is_empty()));
    }
}
