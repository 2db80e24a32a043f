//! # Split Pipeline
//!
//! Chains the core stages into multi-material splits:
//!
//! ```text
//! texture + UV → mask → displaced mesh → difference mesh
//! ```
//!
//! Displacement always carves inward, along the negated vertex normals, so
//! the displaced mesh and the difference part together fill the original
//! volume. The difference part is oriented outward before it is returned.


use crate::difference::{difference, DifferenceReport};
use crate::displace::displace;
use crate::error::MeshError;
use crate::mesh::Mesh;
use crate::source::MeshSource;
use crate::texture::{gaussian_blur, sample_mask, TextureField};
use config::settings::{FileSplitConfig, SplitConfig};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The two parts of a single split.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitParts {
    /// Input mesh with the masked vertices carved inward.
    pub displaced: Mesh,
    /// Closed, outward facing shell of the carved volume.
    pub difference: Mesh,
    /// Per-vertex mask that was carved.
    pub mask: Vec<bool>,
    /// Face counts of the difference part.
    pub report: DifferenceReport,
}

/// Result of carving several masks in sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct LayeredSplit {
    /// Mesh left after every layer was carved.
    pub core: Mesh,
    /// One difference part per mask, in carving order.
    pub parts: Vec<Mesh>,
}

/// Paths written by [`split_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOutputs {
    /// `<stem>_displaced.<ext>`
    pub displaced: PathBuf,
    /// `<stem>_difference.<ext>`
    pub difference: PathBuf,
}

/// Carves the vertices selected by `mask` inward by `depth`.
///
/// Requires vertex normals.
pub fn split_by_mask(mesh: &Mesh, mask: &[bool], depth: f64) -> Result<SplitParts, MeshError> {
    let normals = mesh
        .normals()
        .ok_or(MeshError::MissingAttribute { name: "normals" })?;

    let moved = displace(mesh.vertices(), normals, -depth, mask)?;
    let result = difference(mesh.vertices(), &moved, mesh.triangles(), mask)?;
    let report = result.report;

    let inward = result.signed_volume() < 0.0;
    let mut difference = result.into_mesh();
    if inward {
        difference.flip();
    }

    debug!(
        moved = mask.iter().filter(|&&m| m).count(),
        difference_faces = difference.triangle_count(),
        flipped = inward,
        "carved mask"
    );

    Ok(SplitParts {
        displaced: mesh.with_vertices(moved)?,
        difference,
        mask: mask.to_vec(),
        report,
    })
}

/// Splits a mesh into a carved body and the part filling the carving,
/// following a texture.
///
/// Requires vertex normals and texture coordinates. The texture is blurred
/// first when `config.blur_sigma` is set, sampled at every vertex, reduced
/// to the channel mean and thresholded.
///
/// # Example
///
/// ```rust
/// use config::settings::SplitConfig;
/// use meshdd::pipeline::split_by_texture;
/// use meshdd::primitives::create_uv_sphere;
/// use meshdd::texture::TextureField;
///
/// let sphere = create_uv_sphere(10.0, 32, 15).unwrap();
/// // Left half of the texture is bright
/// let texture = TextureField::from_scalars(2, 1, vec![255.0, 0.0]).unwrap();
///
/// let parts = split_by_texture(&sphere, &texture, &SplitConfig::default()).unwrap();
/// assert!(parts.difference.signed_volume() > 0.0);
/// assert!(parts.displaced.signed_volume() < sphere.signed_volume());
/// ```
pub fn split_by_texture(
    mesh: &Mesh,
    texture: &TextureField,
    config: &SplitConfig,
) -> Result<SplitParts, MeshError> {
    let uvs = mesh.uvs().ok_or(MeshError::MissingAttribute { name: "uvs" })?;
    if mesh.normals().is_none() {
        return Err(MeshError::MissingAttribute { name: "normals" });
    }

    let field = match config.blur_sigma {
        Some(sigma) if sigma > 0.0 => Cow::Owned(gaussian_blur(texture, sigma)?),
        _ => Cow::Borrowed(texture),
    };

    let mask = sample_mask(&field, uvs, &config.sampler, &config.mask);
    let parts = split_by_mask(mesh, &mask, config.depth)?;

    info!(
        vertices = mesh.vertex_count(),
        masked = parts.mask.iter().filter(|&&m| m).count(),
        loops = parts.report.loops,
        "split mesh by texture"
    );

    Ok(parts)
}

/// Carves several masks one after another.
///
/// Each mask carves the state left by the previous one, along the original
/// normals, and contributes one difference part. Masks typically select
/// disjoint regions (sea, then ice, leaving land as the core).
pub fn split_layers(mesh: &Mesh, masks: &[Vec<bool>], depth: f64) -> Result<LayeredSplit, MeshError> {
    let mut core = mesh.clone();
    let mut parts = Vec::with_capacity(masks.len());

    for (layer, mask) in masks.iter().enumerate() {
        let split = split_by_mask(&core, mask, depth)?;
        info!(
            layer,
            faces = split.difference.triangle_count(),
            "carved layer"
        );
        parts.push(split.difference);
        core = split.displaced;
    }

    Ok(LayeredSplit { core, parts })
}

/// Output paths for a split of `input` written into `output_dir`.
///
/// Keeps the extension of the input file.
pub fn output_paths(input: &Path, output_dir: &Path) -> SplitOutputs {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mesh".to_string());
    let name = |suffix: &str| match input.extension() {
        Some(ext) => format!("{stem}_{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{suffix}"),
    };

    SplitOutputs {
        displaced: output_dir.join(name("displaced")),
        difference: output_dir.join(name("difference")),
    }
}

/// Reads `input` through `source`, splits it by `texture` and writes both
/// parts into `output_dir`.
///
/// The mesh is optionally cleaned, then scaled by `config.scale`. Normals are
/// computed when the file carries none.
pub fn split_file<S: MeshSource>(
    source: &mut S,
    input: &Path,
    texture: &TextureField,
    config: &FileSplitConfig,
    output_dir: &Path,
) -> Result<SplitOutputs, S::Error> {
    info!(path = %input.display(), "reading mesh");
    let mut mesh = source.read(input)?;

    if config.clean {
        mesh = source.clean(&mesh);
    }
    mesh.scale(config.scale);
    if mesh.normals().is_none() {
        mesh.compute_normals();
    }

    let parts = split_by_texture(&mesh, texture, &config.split)?;

    let outputs = output_paths(input, output_dir);
    source.write(&outputs.displaced, &parts.displaced)?;
    source.write(&outputs.difference, &parts.difference)?;

    info!(
        displaced = %outputs.displaced.display(),
        difference = %outputs.difference.display(),
        "wrote split"
    );

    Ok(outputs)
}
