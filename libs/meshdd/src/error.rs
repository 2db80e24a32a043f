//! # Mesh Errors
//!
//! Error types for displacement, classification and difference operations.

use thiserror::Error;

/// Errors that can occur while processing meshes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    /// Two per-vertex arrays disagree in length.
    #[error("Shape mismatch: {what} has {actual} entries, expected {expected}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A face references a vertex that does not exist.
    #[error("Index out of range: face {face} references vertex {index} (vertex count: {vertex_count})")]
    IndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },

    /// A face cannot be classified or is not a proper triangle.
    #[error("Invalid topology: {message}")]
    InvalidTopology { message: String },

    /// Degenerate geometry parameters.
    #[error("Degenerate geometry: {message}")]
    DegenerateGeometry { message: String },

    /// A per-vertex attribute required by the operation is absent.
    #[error("Missing attribute: {name}")]
    MissingAttribute { name: &'static str },

    /// Texture field dimensions or samples are inconsistent.
    #[error("Invalid texture field: {message}")]
    InvalidField { message: String },

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl MeshError {
    /// Creates a shape mismatch error.
    pub fn shape_mismatch(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            what,
            expected,
            actual,
        }
    }

    /// Creates an invalid topology error.
    pub fn invalid_topology(message: impl Into<String>) -> Self {
        Self::InvalidTopology {
            message: message.into(),
        }
    }

    /// Creates a degenerate geometry error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            message: message.into(),
        }
    }

    /// Creates an invalid texture field error.
    pub fn invalid_field(message: impl Into<String>) -> Self {
        Self::InvalidField {
            message: message.into(),
        }
    }
}

/// Checks that a per-vertex array has one entry per vertex.
pub(crate) fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<(), MeshError> {
    if expected == actual {
        Ok(())
    } else {
        Err(MeshError::shape_mismatch(what, expected, actual))
    }
}

/// Checks that every face references existing, pairwise distinct vertices.
pub(crate) fn check_faces(faces: &[[u32; 3]], vertex_count: usize) -> Result<(), MeshError> {
    for (face, tri) in faces.iter().enumerate() {
        for &index in tri {
            if index as usize >= vertex_count {
                return Err(MeshError::IndexOutOfRange {
                    face,
                    index,
                    vertex_count,
                });
            }
        }
        if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
            return Err(MeshError::invalid_topology(format!(
                "face {face} is not a triangle: {tri:?}"
            )));
        }
    }
    Ok(())
}
