//! # Mask/Topology Classifier
//!
//! Partitions faces and edges of a face buffer by the membership of their
//! vertices in a mask, and chains the faces straddling the mask border into
//! boundary loops.
//!
//! ## Classification
//!
//! - **Face classes**: `AllStatic` (no masked vertex), `AllMoved` (three),
//!   `Boundary` (one or two).
//! - **Boundary edges**: undirected edges whose endpoints differ in mask bit.
//! - **Boundary loops**: every `Boundary` face has exactly one half-edge
//!   entering the mask (static → moved) and one leaving it (moved → static).
//!   A loop leaves a face through its leaving edge `m → s` and continues into
//!   the face that enters through `s → m`.
//!
//! Everything here is combinatorial: coordinates are never read.
//!
//! ## Example
//!
//! ```rust
//! use meshdd::classify::{classify, FaceClass};
//!
//! let faces = [[0, 1, 2], [0, 2, 3]];
//! let mask = [false, false, true, false];
//! let classification = classify(&faces, &mask).unwrap();
//! assert_eq!(classification.face_classes, vec![FaceClass::Boundary; 2]);
//! assert_eq!(classification.boundary_edges.len(), 3);
//! assert_eq!(classification.loops.len(), 1);
//! ```

mod adjacency;


pub use adjacency::{EdgeAdjacency, EdgeUse};

use crate::error::{check_faces, MeshError};
use config::settings::MaskConfig;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Class of a face with respect to a vertex mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceClass {
    /// No vertex is masked.
    AllStatic,
    /// Every vertex is masked.
    AllMoved,
    /// One or two vertices are masked.
    Boundary,
}

impl FaceClass {
    /// Class from the number of masked vertices of a triangle.
    #[inline]
    pub fn from_masked_count(count: usize) -> Self {
        match count {
            0 => Self::AllStatic,
            3 => Self::AllMoved,
            _ => Self::Boundary,
        }
    }
}

/// An undirected edge joining a masked and an unmasked vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoundaryEdge {
    /// The masked endpoint.
    pub moved: u32,
    /// The unmasked endpoint.
    pub fixed: u32,
}

/// Faces straddling the mask border, chained through shared boundary edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryLoop {
    /// `Boundary` faces in traversal order.
    pub faces: Vec<usize>,
    /// Crossed boundary edges: `edges[i]` enters `faces[i]` and
    /// `edges[i + 1]` leaves it. Closed loops do not repeat the first edge,
    /// so `edges.len() == faces.len()`; open chains carry one extra edge.
    pub edges: Vec<BoundaryEdge>,
    /// False when the chain ran into a mesh hole or a non-manifold edge.
    pub closed: bool,
}

impl BoundaryLoop {
    /// Number of faces (steps) in the loop.
    #[inline]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Returns true if the loop has no faces.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

/// Result of [`classify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// One class per face, in face order.
    pub face_classes: Vec<FaceClass>,
    /// Boundary edges, sorted and unique.
    pub boundary_edges: Vec<BoundaryEdge>,
    /// Boundary loops: open chains first, then closed loops, each starting
    /// from its lowest unvisited face index.
    pub loops: Vec<BoundaryLoop>,
}

impl Classification {
    /// Number of faces of the given class.
    pub fn count(&self, class: FaceClass) -> usize {
        self.face_classes.iter().filter(|&&c| c == class).count()
    }
}

/// Crossing half-edges of a `Boundary` face, in its winding.
#[derive(Debug, Clone, Copy)]
struct Crossing {
    /// Half-edge `static -> moved`.
    enter: (u32, u32),
    /// Half-edge `moved -> static`.
    leave: (u32, u32),
}

/// Classifies the faces of `faces` against a per-vertex boolean mask.
///
/// Fails with an index error if a face references a vertex outside the mask,
/// and with a topology error if a face repeats a vertex.
pub fn classify(faces: &[[u32; 3]], mask: &[bool]) -> Result<Classification, MeshError> {
    check_faces(faces, mask.len())?;

    let face_classes: Vec<FaceClass> = faces
        .par_iter()
        .map(|tri| FaceClass::from_masked_count(tri.iter().filter(|&&v| mask[v as usize]).count()))
        .collect();

    let adjacency = EdgeAdjacency::build(faces);

    let mut boundary_edges: Vec<BoundaryEdge> = adjacency
        .edges()
        .filter_map(|(a, b)| match (mask[a as usize], mask[b as usize]) {
            (true, false) => Some(BoundaryEdge { moved: a, fixed: b }),
            (false, true) => Some(BoundaryEdge { moved: b, fixed: a }),
            _ => None,
        })
        .collect();
    boundary_edges.sort_unstable();

    let loops = boundary_loops(faces, mask, &face_classes, &adjacency)?;

    debug!(
        faces = faces.len(),
        boundary_faces = face_classes.iter().filter(|&&c| c == FaceClass::Boundary).count(),
        boundary_edges = boundary_edges.len(),
        loops = loops.len(),
        "classified mask"
    );

    Ok(Classification {
        face_classes,
        boundary_edges,
        loops,
    })
}

/// Classifies faces against scalar per-vertex values reduced by `config`.
pub fn classify_values(
    faces: &[[u32; 3]],
    values: &[f64],
    config: &MaskConfig,
) -> Result<Classification, MeshError> {
    let mask: Vec<bool> = values.par_iter().map(|&v| config.accepts(v)).collect();
    classify(faces, &mask)
}

/// Finds the entering and leaving half-edges of a `Boundary` face.
fn crossing(face: usize, tri: &[u32; 3], mask: &[bool]) -> Result<Crossing, MeshError> {
    let mut enter = None;
    let mut leave = None;
    for k in 0..3 {
        let (a, b) = (tri[k], tri[(k + 1) % 3]);
        match (mask[a as usize], mask[b as usize]) {
            (false, true) => enter = enter.or(Some((a, b))),
            (true, false) => leave = leave.or(Some((a, b))),
            _ => {}
        }
    }
    match (enter, leave) {
        (Some(enter), Some(leave)) => Ok(Crossing { enter, leave }),
        _ => Err(MeshError::invalid_topology(format!(
            "boundary face {face} {tri:?} does not split into moved and static parts"
        ))),
    }
}

/// Chains `Boundary` faces into loops with an explicit worklist walk.
fn boundary_loops(
    faces: &[[u32; 3]],
    mask: &[bool],
    classes: &[FaceClass],
    adjacency: &EdgeAdjacency,
) -> Result<Vec<BoundaryLoop>, MeshError> {
    let mut crossings: Vec<Option<Crossing>> = vec![None; faces.len()];
    for (face, tri) in faces.iter().enumerate() {
        if classes[face] == FaceClass::Boundary {
            crossings[face] = Some(crossing(face, tri, mask)?);
        }
    }

    // Successor of each boundary face: the boundary face entering through the
    // reverse of its leaving half-edge.
    let mut next: Vec<Option<usize>> = vec![None; faces.len()];
    let mut has_prev = vec![false; faces.len()];
    let mut ambiguous = 0usize;
    for (face, c) in crossings.iter().enumerate() {
        let Some(c) = c else { continue };
        let (m, s) = c.leave;
        let mut candidates = adjacency
            .faces_for_half_edge(s, m)
            .filter(|&g| crossings[g].is_some_and(|cg| cg.enter == (s, m)));
        if let Some(g) = candidates.next() {
            if candidates.next().is_some() {
                ambiguous += 1;
            }
            next[face] = Some(g);
            has_prev[g] = true;
        }
    }
    if ambiguous > 0 {
        warn!(ambiguous, "non-manifold boundary edges, continuing with the first face");
    }

    let edge_of = |(a, b): (u32, u32)| {
        if mask[a as usize] {
            BoundaryEdge { moved: a, fixed: b }
        } else {
            BoundaryEdge { moved: b, fixed: a }
        }
    };

    let mut visited = vec![false; faces.len()];
    let mut loops = Vec::new();

    // Open chains start at faces nobody leads into; the remaining faces lie
    // on closed cycles.
    let open_starts = (0..faces.len()).filter(|&f| crossings[f].is_some() && !has_prev[f]);
    let cycle_starts = (0..faces.len()).filter(|&f| crossings[f].is_some());
    for start in open_starts.chain(cycle_starts) {
        if visited[start] {
            continue;
        }
        let mut faces_in_loop = Vec::new();
        let mut edges = Vec::new();
        let mut current = start;
        let closed = loop {
            visited[current] = true;
            faces_in_loop.push(current);
            let Some(c) = crossings[current] else { break false };
            if edges.is_empty() {
                edges.push(edge_of(c.enter));
            }
            match next[current] {
                Some(g) if g == start => break true,
                Some(g) if !visited[g] => {
                    edges.push(edge_of(c.leave));
                    current = g;
                }
                _ => {
                    edges.push(edge_of(c.leave));
                    break false;
                }
            }
        };
        loops.push(BoundaryLoop {
            faces: faces_in_loop,
            edges,
            closed,
        });
    }

    let open = loops.iter().filter(|l| !l.closed).count();
    if open > 0 {
        warn!(open, "boundary chains are not closed, the mesh has holes along the mask border");
    }

    Ok(loops)
}
