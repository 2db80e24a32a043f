//! # Displacement Engine
//!
//! Moves the masked vertices of a vertex buffer along per-vertex directions.
//! Unmasked vertices are copied bit-for-bit; the face buffer is never touched.
//!
//! ## Example
//!
//! ```rust
//! use glam::DVec3;
//! use meshdd::displace::displace;
//!
//! let vertices = [DVec3::ZERO, DVec3::X];
//! let normals = [DVec3::Z, DVec3::Z];
//! let moved = displace(&vertices, &normals, -0.5, &[false, true]).unwrap();
//! assert_eq!(moved, vec![DVec3::ZERO, DVec3::new(1.0, 0.0, -0.5)]);
//! ```

#[cfg(test)]
mod tests;

use crate::error::{check_len, MeshError};
use glam::DVec3;
use rayon::prelude::*;

/// Displaces masked vertices by `magnitude` along their direction.
///
/// `out[i] = vertices[i] + magnitude * directions[i]` where `mask[i]`, else
/// `vertices[i]`. A zero magnitude returns the input unchanged whatever the
/// directions hold.
pub fn displace(
    vertices: &[DVec3],
    directions: &[DVec3],
    magnitude: f64,
    mask: &[bool],
) -> Result<Vec<DVec3>, MeshError> {
    check_len("directions", vertices.len(), directions.len())?;
    check_len("mask", vertices.len(), mask.len())?;

    Ok(vertices
        .par_iter()
        .zip(directions.par_iter())
        .zip(mask.par_iter())
        .map(|((&v, &d), &m)| offset(v, d, magnitude, m))
        .collect())
}

/// Displaces masked vertices by a per-vertex magnitude.
///
/// Used for relief style carving where the depth follows a texture value.
pub fn displace_scaled(
    vertices: &[DVec3],
    directions: &[DVec3],
    magnitudes: &[f64],
    mask: &[bool],
) -> Result<Vec<DVec3>, MeshError> {
    check_len("directions", vertices.len(), directions.len())?;
    check_len("magnitudes", vertices.len(), magnitudes.len())?;
    check_len("mask", vertices.len(), mask.len())?;

    Ok(vertices
        .par_iter()
        .zip(directions.par_iter())
        .zip(magnitudes.par_iter())
        .zip(mask.par_iter())
        .map(|(((&v, &d), &k), &m)| offset(v, d, k, m))
        .collect())
}

#[inline]
fn offset(vertex: DVec3, direction: DVec3, magnitude: f64, selected: bool) -> DVec3 {
    if selected && magnitude != 0.0 {
        vertex + magnitude * direction
    } else {
        vertex
    }
}

/// Recovers the displacement mask from two vertex buffers.
///
/// A vertex is moved if any coordinate differs beyond
/// `atol + rtol * |moved|`.
pub fn mask_from_displacement(
    original: &[DVec3],
    moved: &[DVec3],
    rtol: f64,
    atol: f64,
) -> Result<Vec<bool>, MeshError> {
    check_len("moved vertices", original.len(), moved.len())?;

    Ok(original
        .par_iter()
        .zip(moved.par_iter())
        .map(|(&a, &b)| {
            let tolerance = DVec3::splat(atol) + rtol * b.abs();
            !(a - b).abs().cmple(tolerance).all()
        })
        .collect())
}
