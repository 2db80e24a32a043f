//! # Sphere Primitive
//!
//! Generates a UV sphere with poles, outward normals and equirectangular
//! texture coordinates.

use crate::error::MeshError;
use crate::mesh::Mesh;
use config::constants::{
    DEFAULT_SPHERE_LONGITUDES, DEFAULT_SPHERE_RADIUS, DEFAULT_SPHERE_RINGS, MIN_SEGMENTS,
};
use glam::{DVec2, DVec3};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Creates a UV sphere mesh.
///
/// # Arguments
///
/// * `radius` - The radius of the sphere
/// * `longitudes` - Number of vertices around each latitude ring
/// * `rings` - Number of latitude rings between the two poles
///
/// # Layout
///
/// - Vertex 0 is the south pole, the last vertex the north pole.
/// - Ring `j` (from the south) holds vertices `1 + j * longitudes ..`.
/// - Texture coordinates: `u = longitude / 2π`, `v = (latitude + π/2) / π`,
///   so `v = 0` is the south pole. The seam is not duplicated.
/// - Normals are the unit position vectors.
///
/// # Example
///
/// ```rust
/// use meshdd::primitives::create_uv_sphere;
///
/// let mesh = create_uv_sphere(1.0, 8, 3).unwrap();
/// assert_eq!(mesh.vertex_count(), 8 * 3 + 2);
/// assert_eq!(mesh.triangle_count(), 2 * 8 * 3);
/// ```
pub fn create_uv_sphere(radius: f64, longitudes: u32, rings: u32) -> Result<Mesh, MeshError> {
    if !(radius > 0.0) || !radius.is_finite() {
        return Err(MeshError::degenerate(format!(
            "Sphere radius must be positive: {}",
            radius
        )));
    }

    if longitudes < MIN_SEGMENTS {
        return Err(MeshError::degenerate(format!(
            "Sphere longitudes must be at least {}: {}",
            MIN_SEGMENTS, longitudes
        )));
    }

    if rings < 1 {
        return Err(MeshError::degenerate("Sphere needs at least one latitude ring"));
    }

    let vertex_count = (longitudes * rings + 2) as usize;
    let mut mesh = Mesh::with_capacity(vertex_count, (2 * longitudes * rings) as usize);
    let mut normals = Vec::with_capacity(vertex_count);
    let mut uvs = Vec::with_capacity(vertex_count);

    let mut push = |mesh: &mut Mesh, theta: f64, phi: f64| {
        let n = DVec3::new(phi.cos() * theta.cos(), phi.cos() * theta.sin(), phi.sin());
        mesh.add_vertex(n * radius);
        normals.push(n);
        uvs.push(DVec2::new(theta / TAU, (phi + FRAC_PI_2) / PI));
    };

    // South pole
    push(&mut mesh, 0.0, -FRAC_PI_2);

    for j in 0..rings {
        // Latitude, excluding both poles
        let phi = -FRAC_PI_2 + PI * (j + 1) as f64 / (rings + 1) as f64;
        for i in 0..longitudes {
            let theta = TAU * i as f64 / longitudes as f64;
            push(&mut mesh, theta, phi);
        }
    }

    // North pole
    push(&mut mesh, 0.0, FRAC_PI_2);

    let south = 0;
    let north = vertex_count as u32 - 1;
    let ring = |j: u32, i: u32| 1 + j * longitudes + i % longitudes;

    // South cap
    for i in 0..longitudes {
        mesh.add_triangle(south, ring(0, i + 1), ring(0, i));
    }

    // Bands between adjacent rings, longitude before latitude keeps the
    // winding outward
    for j in 0..rings - 1 {
        for i in 0..longitudes {
            let a0 = ring(j, i);
            let a1 = ring(j, i + 1);
            let b0 = ring(j + 1, i);
            let b1 = ring(j + 1, i + 1);

            mesh.add_triangle(a0, a1, b1);
            mesh.add_triangle(a0, b1, b0);
        }
    }

    // North cap
    for i in 0..longitudes {
        mesh.add_triangle(ring(rings - 1, i), ring(rings - 1, i + 1), north);
    }

    mesh.set_normals(normals)?;
    mesh.set_uvs(uvs)?;
    Ok(mesh)
}

/// Creates the print sized sphere used for globe splits: radius 50 with
/// sub-degree angular resolution.
pub fn create_default_sphere() -> Result<Mesh, MeshError> {
    create_uv_sphere(
        DEFAULT_SPHERE_RADIUS,
        DEFAULT_SPHERE_LONGITUDES,
        DEFAULT_SPHERE_RINGS,
    )
}
