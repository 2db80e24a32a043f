//! Error types for mesh file adapters.

use meshdd::MeshError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for mesh file operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors raised while reading, writing or splitting mesh files.
#[derive(Debug, Error)]
pub enum IoError {
    /// File or stored mesh not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// Unrecognized file extension.
    #[error("unknown file format: .{extension}")]
    UnknownFormat {
        /// The unrecognized extension, empty when the path has none.
        extension: String,
    },

    /// Malformed file content.
    #[error("invalid file content: {message}")]
    InvalidContent {
        /// Description of what was invalid.
        message: String,
    },

    /// Binary STL shorter than its header.
    #[error("invalid STL header: expected {expected} bytes, got {got}")]
    InvalidHeader {
        /// Expected header size.
        expected: usize,
        /// Actual header size.
        got: usize,
    },

    /// Binary STL truncated before its declared face count.
    #[error("invalid face count: expected {expected}, got {got}")]
    InvalidFaceCount {
        /// Declared number of faces.
        expected: u32,
        /// Faces actually read.
        got: u32,
    },

    /// Mesh validation or split failure.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Float parsing error.
    #[error("float parsing error: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),
}

impl IoError {
    /// Creates an `InvalidContent` error with the given message.
    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::InvalidContent {
            message: message.into(),
        }
    }

    /// Maps an open failure to `FileNotFound` when the file is missing.
    pub(crate) fn from_open(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io(err)
        }
    }
}
