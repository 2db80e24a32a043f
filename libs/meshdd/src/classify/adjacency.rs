//! Edge adjacency of a face buffer.
//!
//! Maps every undirected edge to the faces using it, remembering in which
//! direction each face traverses it. Built once per call and shared by the
//! boundary edge collection and the loop walk.

use std::collections::HashMap;

/// One use of an edge by a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeUse {
    /// Face index.
    pub face: usize,
    /// True if the face traverses the edge from its smaller to its larger
    /// vertex index.
    pub forward: bool,
}

/// Edge to face adjacency.
///
/// # Example
///
/// ```rust
/// use meshdd::classify::EdgeAdjacency;
///
/// let adjacency = EdgeAdjacency::build(&[[0, 1, 2], [0, 2, 3]]);
/// assert_eq!(adjacency.edge_count(), 5);
/// assert_eq!(adjacency.faces_for_edge(2, 0).len(), 2);
/// assert!(!adjacency.is_watertight());
/// ```
#[derive(Debug, Clone, Default)]
pub struct EdgeAdjacency {
    /// Maps edge (v0, v1) with v0 < v1 to its uses.
    edge_to_faces: HashMap<(u32, u32), Vec<EdgeUse>>,
}

impl EdgeAdjacency {
    /// Builds adjacency from triangle faces.
    pub fn build(faces: &[[u32; 3]]) -> Self {
        let mut edge_to_faces: HashMap<(u32, u32), Vec<EdgeUse>> =
            HashMap::with_capacity(faces.len() * 3 / 2);

        for (face, tri) in faces.iter().enumerate() {
            for k in 0..3 {
                let (a, b) = (tri[k], tri[(k + 1) % 3]);
                edge_to_faces
                    .entry(normalize_edge(a, b))
                    .or_default()
                    .push(EdgeUse { face, forward: a < b });
            }
        }

        Self { edge_to_faces }
    }

    /// Uses of the edge between `a` and `b`, in face order.
    pub fn faces_for_edge(&self, a: u32, b: u32) -> &[EdgeUse] {
        self.edge_to_faces
            .get(&normalize_edge(a, b))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Faces traversing the half-edge `from -> to`, in face order.
    pub fn faces_for_half_edge(&self, from: u32, to: u32) -> impl Iterator<Item = usize> + '_ {
        let forward = from < to;
        self.faces_for_edge(from, to)
            .iter()
            .filter(move |u| u.forward == forward)
            .map(|u| u.face)
    }

    /// Iterates over all undirected edges, in arbitrary order.
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.edge_to_faces.keys().copied()
    }

    /// Number of distinct undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edge_to_faces.len()
    }

    /// Number of edges used by exactly one face.
    pub fn open_edge_count(&self) -> usize {
        self.edge_to_faces.values().filter(|uses| uses.len() == 1).count()
    }

    /// True if every edge is used by at most two faces.
    pub fn is_manifold(&self) -> bool {
        self.edge_to_faces.values().all(|uses| uses.len() <= 2)
    }

    /// True if every edge is traversed equally often in both directions,
    /// i.e. the surface is closed and consistently oriented.
    pub fn is_watertight(&self) -> bool {
        self.edge_to_faces.values().all(|uses| {
            let forward = uses.iter().filter(|u| u.forward).count();
            forward * 2 == uses.len()
        })
    }
}

/// Normalize edge direction so v0 < v1.
#[inline]
pub(crate) fn normalize_edge(v0: u32, v1: u32) -> (u32, u32) {
    if v0 < v1 {
        (v0, v1)
    } else {
        (v1, v0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> Vec<[u32; 3]> {
        vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]]
    }

    #[test]
    fn test_closed_tetrahedron() {
        let adjacency = EdgeAdjacency::build(&tetrahedron());
        assert_eq!(adjacency.edge_count(), 6);
        assert_eq!(adjacency.open_edge_count(), 0);
        assert!(adjacency.is_manifold());
        assert!(adjacency.is_watertight());
    }

    #[test]
    fn test_inconsistent_orientation_is_not_watertight() {
        let mut faces = tetrahedron();
        faces[3] = [1, 3, 2];
        let adjacency = EdgeAdjacency::build(&faces);
        assert!(adjacency.is_manifold());
        assert!(!adjacency.is_watertight());
    }

    #[test]
    fn test_half_edge_lookup() {
        let adjacency = EdgeAdjacency::build(&[[0, 1, 2], [0, 2, 3]]);
        assert_eq!(adjacency.faces_for_half_edge(2, 0).collect::<Vec<_>>(), vec![0]);
        assert_eq!(adjacency.faces_for_half_edge(0, 2).collect::<Vec<_>>(), vec![1]);
        assert_eq!(adjacency.faces_for_half_edge(1, 0).count(), 0);
        assert!(adjacency.faces_for_edge(1, 3).is_empty());
    }

    #[test]
    fn test_non_manifold_edge() {
        let adjacency = EdgeAdjacency::build(&[[0, 1, 2], [1, 0, 3], [0, 1, 4]]);
        assert!(!adjacency.is_manifold());
        assert_eq!(adjacency.faces_for_edge(0, 1).len(), 3);
    }
}
