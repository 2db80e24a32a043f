//! # Mesh Cleaning
//!
//! Welds vertices that lie within a tolerance of each other and drops faces
//! that collapse or repeat. Run before displacement so that faces on either
//! side of a seam share their vertices and the classifier sees one surface.

use crate::mesh::Mesh;
use glam::{DVec2, DVec3};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Merges vertices closer than `tolerance` and removes degenerate and
/// duplicate faces.
///
/// Vertices are bucketed on a grid of cell size `tolerance` and compared
/// against neighbouring cells, so the first vertex seen in index order wins.
/// Normals and texture coordinates of the surviving vertex are kept. A face
/// is a duplicate if it uses the same three vertices as an earlier face,
/// whatever its winding.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use meshdd::{clean::clean, Mesh};
///
/// let mesh = Mesh::from_buffers(
///     vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::X, DVec3::new(1.0, 1.0, 0.0)],
///     vec![[0, 1, 2], [3, 4, 2]],
/// )
/// .unwrap();
///
/// let cleaned = clean(&mesh, 1e-9);
/// assert_eq!(cleaned.vertex_count(), 4);
/// assert_eq!(cleaned.triangles(), &[[0, 1, 2], [1, 3, 2]]);
/// ```
pub fn clean(mesh: &Mesh, tolerance: f64) -> Mesh {
    let (remap, kept) = weld(mesh.vertices(), tolerance);

    let mut result = Mesh::with_capacity(kept.len(), mesh.triangle_count());
    for &v in &kept {
        result.add_vertex(mesh.vertices()[v]);
    }

    let mut seen = HashSet::with_capacity(mesh.triangle_count());
    let mut dropped = 0usize;
    for tri in mesh.triangles() {
        let [a, b, c] = tri.map(|i| remap[i as usize]);
        if a == b || b == c || a == c {
            dropped += 1;
            continue;
        }
        let mut key = [a, b, c];
        key.sort_unstable();
        if !seen.insert(key) {
            dropped += 1;
            continue;
        }
        result.add_triangle(a, b, c);
    }

    // Attribute lengths follow `kept`, so these cannot fail
    if let Some(normals) = mesh.normals() {
        let normals: Vec<DVec3> = kept.iter().map(|&v| normals[v]).collect();
        let _ = result.set_normals(normals);
    }
    if let Some(uvs) = mesh.uvs() {
        let uvs: Vec<DVec2> = kept.iter().map(|&v| uvs[v]).collect();
        let _ = result.set_uvs(uvs);
    }

    debug!(
        merged = mesh.vertex_count() - kept.len(),
        dropped_faces = dropped,
        "cleaned mesh"
    );

    result
}

/// Returns the new index of every vertex and the source index of every
/// surviving vertex.
fn weld(vertices: &[DVec3], tolerance: f64) -> (Vec<u32>, Vec<usize>) {
    let mut remap = Vec::with_capacity(vertices.len());
    let mut kept: Vec<usize> = Vec::new();

    if !(tolerance > 0.0) {
        // Exact matching only
        let mut exact: HashMap<[u64; 3], u32> = HashMap::with_capacity(vertices.len());
        for (i, v) in vertices.iter().enumerate() {
            let key = [v.x.to_bits(), v.y.to_bits(), v.z.to_bits()];
            let id = *exact.entry(key).or_insert_with(|| {
                kept.push(i);
                (kept.len() - 1) as u32
            });
            remap.push(id);
        }
        return (remap, kept);
    }

    let cell = |v: DVec3| {
        let c = (v / tolerance).floor();
        (c.x as i64, c.y as i64, c.z as i64)
    };

    let mut grid: HashMap<(i64, i64, i64), Vec<u32>> = HashMap::new();
    for (i, &v) in vertices.iter().enumerate() {
        let (cx, cy, cz) = cell(v);
        let mut found = None;
        'search: for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(bucket) = grid.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &id in bucket {
                        if vertices[kept[id as usize]].distance(v) <= tolerance {
                            found = Some(id);
                            break 'search;
                        }
                    }
                }
            }
        }

        let id = match found {
            Some(id) => id,
            None => {
                let id = kept.len() as u32;
                kept.push(i);
                grid.entry((cx, cy, cz)).or_default().push(id);
                id
            }
        };
        remap.push(id);
    }

    (remap, kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::EdgeAdjacency;
    use crate::primitives::create_uv_sphere;

    /// Splits every face onto its own three vertices.
    fn unshared(mesh: &Mesh) -> Mesh {
        let mut soup = Mesh::new();
        let mut normals = Vec::new();
        for tri in mesh.triangles() {
            let base = soup.vertex_count() as u32;
            for &i in tri {
                soup.add_vertex(mesh.vertex(i));
                normals.push(mesh.normals().unwrap()[i as usize]);
            }
            soup.add_triangle(base, base + 1, base + 2);
        }
        soup.set_normals(normals).unwrap();
        soup
    }

    #[test]
    fn test_weld_triangle_soup() {
        let sphere = create_uv_sphere(1.0, 12, 5).unwrap();
        let soup = unshared(&sphere);
        assert!(!EdgeAdjacency::build(soup.triangles()).is_watertight());

        let cleaned = clean(&soup, 1e-9);
        assert_eq!(cleaned.vertex_count(), sphere.vertex_count());
        assert_eq!(cleaned.triangle_count(), sphere.triangle_count());
        assert!(EdgeAdjacency::build(cleaned.triangles()).is_watertight());
        assert_eq!(cleaned.normals().unwrap().len(), cleaned.vertex_count());
    }

    #[test]
    fn test_near_vertices_merge_within_tolerance() {
        let mesh = Mesh::from_buffers(
            vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::new(1e-13, 0.0, 0.0)],
            vec![[0, 1, 2], [3, 2, 1]],
        )
        .unwrap();
        let cleaned = clean(&mesh, 1e-12);
        assert_eq!(cleaned.vertex_count(), 3);
        // Second face welds onto the first one's vertices and is dropped
        assert_eq!(cleaned.triangle_count(), 1);
    }

    #[test]
    fn test_collapsed_face_is_dropped() {
        let mesh = Mesh::from_buffers(
            vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::ZERO],
            vec![[0, 1, 2], [0, 3, 1]],
        )
        .unwrap();
        let cleaned = clean(&mesh, 0.0);
        assert_eq!(cleaned.vertex_count(), 3);
        assert_eq!(cleaned.triangles(), &[[0, 1, 2]]);
    }

    #[test]
    fn test_distinct_vertices_survive() {
        let sphere = create_uv_sphere(1.0, 8, 3).unwrap();
        let cleaned = clean(&sphere, 1e-12);
        assert_eq!(cleaned, sphere);
    }
}
