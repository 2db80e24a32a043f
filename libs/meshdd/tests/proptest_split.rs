//! Property-based tests for displacement and the difference builder.
//!
//! Run with: cargo test -p meshdd -- proptest

use glam::DVec3;
use meshdd::classify::{classify, EdgeAdjacency, FaceClass};
use meshdd::difference::difference;
use meshdd::displace::displace;
use meshdd::primitives::{create_torus, create_uv_sphere};
use meshdd::Mesh;
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn arb_position() -> impl Strategy<Value = DVec3> {
    prop::array::uniform3(-100.0..100.0f64).prop_map(DVec3::from_array)
}

/// Vertices with matching directions and a mask.
fn arb_displacement(max_vertices: usize) -> impl Strategy<Value = (Vec<DVec3>, Vec<DVec3>, Vec<bool>)> {
    (1..=max_vertices).prop_flat_map(|n| {
        (
            prop::collection::vec(arb_position(), n),
            prop::collection::vec(arb_position(), n),
            prop::collection::vec(any::<bool>(), n),
        )
    })
}

/// Random face buffers over `vertex_count` vertices, possibly degenerate.
fn arb_faces(vertex_count: u32, max_faces: usize) -> impl Strategy<Value = Vec<[u32; 3]>> {
    prop::collection::vec(prop::array::uniform3(0..vertex_count), 0..=max_faces)
}

fn sphere() -> Mesh {
    create_uv_sphere(1.0, 10, 5).unwrap()
}

fn moved(mesh: &Mesh, depth: f64, mask: &[bool]) -> Vec<DVec3> {
    displace(mesh.vertices(), mesh.normals().unwrap(), depth, mask).unwrap()
}

fn volume(vertices: &[DVec3], faces: &[[u32; 3]]) -> f64 {
    faces
        .iter()
        .map(|t| vertices[t[0] as usize].dot(vertices[t[1] as usize].cross(vertices[t[2] as usize])))
        .sum::<f64>()
        / 6.0
}

// =============================================================================
// Property Tests: Displacement
// =============================================================================

proptest! {
    /// Unmasked vertices are copied bit-for-bit.
    #[test]
    fn displace_keeps_unmasked_vertices(
        (vertices, directions, mask) in arb_displacement(40),
        magnitude in -10.0..10.0f64,
    ) {
        let out = displace(&vertices, &directions, magnitude, &mask).unwrap();
        prop_assert_eq!(out.len(), vertices.len());
        for i in 0..vertices.len() {
            if !mask[i] {
                prop_assert_eq!(out[i], vertices[i]);
            } else {
                prop_assert_eq!(out[i], vertices[i] + magnitude * directions[i]);
            }
        }
    }

    /// Zero magnitude or an empty mask returns the input.
    #[test]
    fn displace_identity_cases((vertices, directions, mask) in arb_displacement(40)) {
        prop_assert_eq!(&displace(&vertices, &directions, 0.0, &mask).unwrap(), &vertices);
        let none = vec![false; vertices.len()];
        prop_assert_eq!(&displace(&vertices, &directions, 3.0, &none).unwrap(), &vertices);
    }
}

// =============================================================================
// Property Tests: Classification
// =============================================================================

proptest! {
    /// Classification never panics on arbitrary face buffers.
    #[test]
    fn classify_never_panics(
        faces in arb_faces(12, 40),
        mask in prop::collection::vec(any::<bool>(), 12),
    ) {
        let _ = classify(&faces, &mask);
    }

    /// Every boundary face of a closed mesh lies on exactly one closed loop.
    #[test]
    fn loops_cover_boundary_faces(mask in prop::collection::vec(any::<bool>(), 52)) {
        let mesh = sphere();
        let classification = classify(mesh.triangles(), &mask).unwrap();

        let mut seen = vec![0usize; mesh.triangle_count()];
        for boundary_loop in &classification.loops {
            prop_assert!(boundary_loop.closed);
            for &face in &boundary_loop.faces {
                seen[face] += 1;
            }
        }
        for (face, class) in classification.face_classes.iter().enumerate() {
            let expected = usize::from(*class == FaceClass::Boundary);
            prop_assert_eq!(seen[face], expected);
        }
    }
}

// =============================================================================
// Property Tests: Difference
// =============================================================================

proptest! {
    /// Any mask on a closed mesh yields a closed, consistently oriented result
    /// whose volume is the volume change of the displacement.
    #[test]
    fn difference_is_closed(
        mask in prop::collection::vec(any::<bool>(), 52),
        depth in -0.5..0.5f64,
    ) {
        let mesh = sphere();
        let moved = moved(&mesh, depth, &mask);
        let result = difference(mesh.vertices(), &moved, mesh.triangles(), &mask).unwrap();

        prop_assert!(EdgeAdjacency::build(&result.faces).is_watertight());

        let expected = volume(&moved, mesh.triangles()) - volume(mesh.vertices(), mesh.triangles());
        prop_assert!((result.signed_volume() - expected).abs() < 1e-9);
    }

    /// Two triangles per moved or boundary face.
    #[test]
    fn difference_face_counts(mask in prop::collection::vec(any::<bool>(), 52)) {
        let mesh = sphere();
        let moved = moved(&mesh, 0.25, &mask);
        let result = difference(mesh.vertices(), &moved, mesh.triangles(), &mask).unwrap();
        let classification = classify(mesh.triangles(), &mask).unwrap();

        let carved = classification.count(FaceClass::AllMoved) + classification.count(FaceClass::Boundary);
        prop_assert_eq!(result.faces.len(), 2 * carved);
        prop_assert_eq!(result.report.cap_faces, classification.count(FaceClass::AllMoved));
        prop_assert_eq!(result.report.loops, classification.loops.len());
    }

    /// Repeated runs give identical output.
    #[test]
    fn difference_is_deterministic(mask in prop::collection::vec(any::<bool>(), 52)) {
        let mesh = sphere();
        let moved = moved(&mesh, -0.3, &mask);
        let a = difference(mesh.vertices(), &moved, mesh.triangles(), &mask).unwrap();
        let b = difference(mesh.vertices(), &moved, mesh.triangles(), &mask).unwrap();
        prop_assert_eq!(a, b);
    }

    /// Works on genus one surfaces too.
    #[test]
    fn torus_difference_is_closed(mask in prop::collection::vec(any::<bool>(), 48)) {
        let torus = create_torus(3.0, 1.0, 8, 6).unwrap();
        let moved = moved(&torus, 0.2, &mask);
        let result = difference(torus.vertices(), &moved, torus.triangles(), &mask).unwrap();
        prop_assert!(EdgeAdjacency::build(&result.faces).is_watertight());
    }
}

// =============================================================================
// Fixed cases
// =============================================================================

#[test]
fn full_mask_gives_two_shells() {
    let mesh = sphere();
    let mask = vec![true; mesh.vertex_count()];
    let moved = moved(&mesh, -0.2, &mask);
    let result = difference(mesh.vertices(), &moved, mesh.triangles(), &mask).unwrap();

    assert_eq!(result.faces.len(), 2 * mesh.triangle_count());
    assert_eq!(result.report.wall_faces, 0);
    assert_eq!(result.vertices.len(), 2 * mesh.vertex_count());
}

#[test]
fn empty_mask_gives_nothing() {
    let mesh = sphere();
    let mask = vec![false; mesh.vertex_count()];
    let result = difference(mesh.vertices(), mesh.vertices(), mesh.triangles(), &mask).unwrap();
    assert!(result.is_empty());
}
