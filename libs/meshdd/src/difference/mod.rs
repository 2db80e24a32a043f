//! # Volume-Difference Builder
//!
//! Builds the closed surface bounding the volume swept by a set of displaced
//! vertices. Both states share one face buffer and differ only in the
//! positions of masked vertices, so the surface is assembled from existing
//! triangles alone:
//!
//! - **Caps**: `AllMoved` faces at moved positions, winding preserved.
//! - **Bases**: `AllMoved` faces at original positions, winding reversed.
//! - **Walls**: each `Boundary` face along a boundary loop, once at original
//!   positions reversed and once at moved positions preserved. Static
//!   corners are shared, so the pair seals the wedge between both states.
//!
//! Static vertices always contribute their original position. No plane is
//! intersected and no face is re-triangulated.
//!
//! ## Orientation
//!
//! For a closed, outward facing input the result is closed and its signed
//! volume equals `volume(moved) - volume(original)`. Outward displacement
//! therefore yields an outward facing shell; inward displacement yields an
//! inward facing one, which callers flip with [`Mesh::flip`].
//!
//! ## Example
//!
//! ```rust
//! use glam::DVec3;
//! use meshdd::difference::difference;
//!
//! let original = [DVec3::ZERO, DVec3::X, DVec3::new(1.0, 1.0, 0.0), DVec3::Y];
//! let mut moved = original;
//! moved[2].z = -1.0;
//! let faces = [[0, 1, 2], [0, 2, 3]];
//!
//! let result = difference(&original, &moved, &faces, &[false, false, true, false]).unwrap();
//! assert_eq!(result.faces.len(), 4);
//! assert_eq!(result.report.wall_faces, 4);
//! assert_eq!(result.vertices.len(), 5);
//! ```


use crate::classify::{classify, FaceClass};
use crate::displace::mask_from_displacement;
use crate::error::{check_len, MeshError};
use crate::mesh::Mesh;
use config::constants::{DISPLACEMENT_ATOL, DISPLACEMENT_RTOL};
use glam::DVec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which state a vertex of the difference mesh is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Layer {
    Original,
    Moved,
}

/// A corner of an emitted triangle before vertex assembly.
type Corner = (u32, Layer);

/// Face counts of a difference mesh by origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifferenceReport {
    /// `AllMoved` faces emitted at moved positions.
    pub cap_faces: usize,
    /// `AllMoved` faces emitted at original positions.
    pub base_faces: usize,
    /// Wall triangles, two per loop step.
    pub wall_faces: usize,
    /// Boundary loops walked, open chains included.
    pub loops: usize,
}

/// Closed surface bounding the volume between two mesh states.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DifferenceMesh {
    /// Deduplicated vertex positions.
    pub vertices: Vec<DVec3>,
    /// Faces in emission order: caps, bases, then walls loop by loop.
    pub faces: Vec<[u32; 3]>,
    /// Face counts.
    pub report: DifferenceReport,
}

impl DifferenceMesh {
    /// Returns true if the difference is empty.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Signed enclosed volume.
    pub fn signed_volume(&self) -> f64 {
        self.faces
            .par_iter()
            .map(|tri| {
                let v0 = self.vertices[tri[0] as usize];
                let v1 = self.vertices[tri[1] as usize];
                let v2 = self.vertices[tri[2] as usize];
                v0.dot(v1.cross(v2))
            })
            .sum::<f64>()
            / 6.0
    }

    /// Converts into a [`Mesh`] without attributes.
    pub fn into_mesh(self) -> Mesh {
        let mut mesh = Mesh::with_capacity(self.vertices.len(), self.faces.len());
        for v in self.vertices {
            mesh.add_vertex(v);
        }
        for [a, b, c] in self.faces {
            mesh.add_triangle(a, b, c);
        }
        mesh
    }
}

/// Builds the difference surface between `original` and `moved`.
///
/// `faces` is shared by both states and `mask` marks the displaced vertices.
///
/// # Errors
///
/// - [`MeshError::ShapeMismatch`] if `moved` or `mask` differ in length from
///   `original`.
/// - [`MeshError::IndexOutOfRange`] if a face references a missing vertex.
/// - [`MeshError::InvalidTopology`] if a face repeats a vertex or a
///   `Boundary` face cannot be walked.
pub fn difference(
    original: &[DVec3],
    moved: &[DVec3],
    faces: &[[u32; 3]],
    mask: &[bool],
) -> Result<DifferenceMesh, MeshError> {
    check_len("moved vertices", original.len(), moved.len())?;
    check_len("mask", original.len(), mask.len())?;

    let classification = classify(faces, mask)?;

    let corner = |v: u32, layer: Layer| -> Corner {
        if mask[v as usize] {
            (v, layer)
        } else {
            (v, Layer::Original)
        }
    };

    let caps: Vec<[Corner; 3]> = faces
        .par_iter()
        .zip(classification.face_classes.par_iter())
        .filter(|(_, class)| **class == FaceClass::AllMoved)
        .map(|(&[a, b, c], _)| [(a, Layer::Moved), (b, Layer::Moved), (c, Layer::Moved)])
        .collect();

    let bases: Vec<[Corner; 3]> = caps
        .par_iter()
        .map(|&[(a, _), (b, _), (c, _)]| [(a, Layer::Original), (c, Layer::Original), (b, Layer::Original)])
        .collect();

    let mut walls: Vec<[Corner; 3]> = Vec::with_capacity(2 * classification.count(FaceClass::Boundary));
    for boundary_loop in &classification.loops {
        for &face in &boundary_loop.faces {
            let [a, b, c] = faces[face];
            walls.push([
                corner(a, Layer::Original),
                corner(c, Layer::Original),
                corner(b, Layer::Original),
            ]);
            walls.push([
                corner(a, Layer::Moved),
                corner(b, Layer::Moved),
                corner(c, Layer::Moved),
            ]);
        }
    }

    let report = DifferenceReport {
        cap_faces: caps.len(),
        base_faces: bases.len(),
        wall_faces: walls.len(),
        loops: classification.loops.len(),
    };

    let emitted: Vec<[Corner; 3]> = caps.into_iter().chain(bases).chain(walls).collect();
    let (vertices, faces) = assemble(original, moved, mask, &emitted);

    debug!(
        vertices = vertices.len(),
        faces = faces.len(),
        caps = report.cap_faces,
        walls = report.wall_faces,
        loops = report.loops,
        "built difference mesh"
    );

    Ok(DifferenceMesh {
        vertices,
        faces,
        report,
    })
}

/// Builds the difference between two meshes with identical connectivity.
///
/// The mask is recovered from the vertex positions with the default
/// displacement tolerances.
pub fn difference_between(original: &Mesh, displaced: &Mesh) -> Result<DifferenceMesh, MeshError> {
    if original.triangles() != displaced.triangles() {
        return Err(MeshError::invalid_topology(
            "meshes do not share the same face buffer",
        ));
    }
    let mask = mask_from_displacement(
        original.vertices(),
        displaced.vertices(),
        DISPLACEMENT_RTOL,
        DISPLACEMENT_ATOL,
    )?;
    difference(original.vertices(), displaced.vertices(), original.triangles(), &mask)
}

/// Deduplicates emitted corners into a vertex buffer.
///
/// Vertex order: static vertices, original copies of moved vertices, then
/// moved copies, each by ascending source index.
fn assemble(
    original: &[DVec3],
    moved: &[DVec3],
    mask: &[bool],
    emitted: &[[Corner; 3]],
) -> (Vec<DVec3>, Vec<[u32; 3]>) {
    let n = original.len();
    let mut used_original = vec![false; n];
    let mut used_moved = vec![false; n];
    for &(v, layer) in emitted.iter().flatten() {
        match layer {
            Layer::Original => used_original[v as usize] = true,
            Layer::Moved => used_moved[v as usize] = true,
        }
    }

    let mut vertices = Vec::new();
    let mut original_id: Vec<Option<u32>> = vec![None; n];
    let mut moved_id: Vec<Option<u32>> = vec![None; n];

    for pass_masked in [false, true] {
        for v in (0..n).filter(|&v| used_original[v] && mask[v] == pass_masked) {
            original_id[v] = Some(vertices.len() as u32);
            vertices.push(original[v]);
        }
    }
    for v in (0..n).filter(|&v| used_moved[v]) {
        moved_id[v] = Some(vertices.len() as u32);
        vertices.push(moved[v]);
    }

    let id = |(v, layer): Corner| -> u32 {
        let slot = match layer {
            Layer::Original => original_id[v as usize],
            Layer::Moved => moved_id[v as usize],
        };
        // Every emitted corner was marked as used above
        slot.unwrap_or_default()
    };

    let faces = emitted
        .iter()
        .map(|&[a, b, c]| [id(a), id(b), id(c)])
        .collect();

    (vertices, faces)
}
