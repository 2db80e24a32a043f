//! # Torus Primitive

use crate::error::MeshError;
use crate::mesh::Mesh;
use config::constants::MIN_SEGMENTS;
use glam::{DVec2, DVec3};
use std::f64::consts::TAU;

/// Creates a torus around the Z axis.
///
/// Vertex `i * minor_segments + j` sits at major angle `i` and minor angle
/// `j`; texture coordinates are `(i / major_segments, j / minor_segments)`.
/// Both seams are closed by index wrap-around, so the mesh has genus one and
/// no duplicated vertices.
///
/// # Example
///
/// ```rust
/// use meshdd::primitives::create_torus;
///
/// let mesh = create_torus(10.0, 2.0, 12, 6).unwrap();
/// assert_eq!(mesh.vertex_count(), 72);
/// assert_eq!(mesh.triangle_count(), 144);
/// ```
pub fn create_torus(
    major_radius: f64,
    minor_radius: f64,
    major_segments: u32,
    minor_segments: u32,
) -> Result<Mesh, MeshError> {
    if !(minor_radius > 0.0) || !(major_radius > minor_radius) || !major_radius.is_finite() {
        return Err(MeshError::degenerate(format!(
            "Torus radii must satisfy 0 < minor < major: major={}, minor={}",
            major_radius, minor_radius
        )));
    }

    if major_segments < MIN_SEGMENTS || minor_segments < MIN_SEGMENTS {
        return Err(MeshError::degenerate(format!(
            "Torus segments must be at least {}: {}x{}",
            MIN_SEGMENTS, major_segments, minor_segments
        )));
    }

    let vertex_count = (major_segments * minor_segments) as usize;
    let mut mesh = Mesh::with_capacity(vertex_count, 2 * vertex_count);
    let mut normals = Vec::with_capacity(vertex_count);
    let mut uvs = Vec::with_capacity(vertex_count);

    for i in 0..major_segments {
        let theta = TAU * i as f64 / major_segments as f64;
        let (sin_t, cos_t) = theta.sin_cos();
        for j in 0..minor_segments {
            let phi = TAU * j as f64 / minor_segments as f64;
            let (sin_p, cos_p) = phi.sin_cos();
            let ring = major_radius + minor_radius * cos_p;
            mesh.add_vertex(DVec3::new(ring * cos_t, ring * sin_t, minor_radius * sin_p));
            normals.push(DVec3::new(cos_p * cos_t, cos_p * sin_t, sin_p));
            uvs.push(DVec2::new(
                i as f64 / major_segments as f64,
                j as f64 / minor_segments as f64,
            ));
        }
    }

    let index = |i: u32, j: u32| (i % major_segments) * minor_segments + j % minor_segments;
    for i in 0..major_segments {
        for j in 0..minor_segments {
            let a = index(i, j);
            let b = index(i + 1, j);
            let c = index(i + 1, j + 1);
            let d = index(i, j + 1);
            mesh.add_triangle(a, b, c);
            mesh.add_triangle(a, c, d);
        }
    }

    mesh.set_normals(normals)?;
    mesh.set_uvs(uvs)?;
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::EdgeAdjacency;
    use std::f64::consts::PI;

    #[test]
    fn test_torus_is_closed_and_outward() {
        let mesh = create_torus(10.0, 3.0, 48, 24).unwrap();
        let adjacency = EdgeAdjacency::build(mesh.triangles());
        assert!(adjacency.is_watertight());
        assert!(adjacency.is_manifold());

        let exact = 2.0 * PI * PI * 10.0 * 9.0;
        let volume = mesh.signed_volume();
        assert!(volume > 0.9 * exact && volume < exact);
    }

    #[test]
    fn test_torus_invalid_parameters() {
        assert!(create_torus(1.0, 2.0, 8, 8).is_err());
        assert!(create_torus(2.0, 0.0, 8, 8).is_err());
        assert!(create_torus(2.0, 1.0, 2, 8).is_err());
        assert!(create_torus(2.0, 1.0, 8, 2).is_err());
    }
}
