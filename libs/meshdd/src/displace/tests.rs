//! # Displacement Tests

use super::*;
use config::constants::{DISPLACEMENT_ATOL, DISPLACEMENT_RTOL};

fn square() -> Vec<DVec3> {
    vec![
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(1.0, 0.0, 0.0),
        DVec3::new(1.0, 1.0, 0.0),
        DVec3::new(0.0, 1.0, 0.0),
    ]
}

#[test]
fn test_displace_masked_vertex_only() {
    let vertices = square();
    let directions = vec![DVec3::Z; 4];
    let moved = displace(&vertices, &directions, -1.0, &[false, false, true, false]).unwrap();
    assert_eq!(moved[2], DVec3::new(1.0, 1.0, -1.0));
    assert_eq!(moved[0], vertices[0]);
    assert_eq!(moved[1], vertices[1]);
    assert_eq!(moved[3], vertices[3]);
}

#[test]
fn test_displace_all_false_is_identity() {
    let vertices = square();
    let directions = vec![DVec3::new(0.3, -2.0, 5.0); 4];
    let moved = displace(&vertices, &directions, 3.0, &[false; 4]).unwrap();
    assert_eq!(moved, vertices);
}

#[test]
fn test_zero_magnitude_ignores_directions() {
    let vertices = square();
    let directions = vec![DVec3::splat(f64::INFINITY); 4];
    let moved = displace(&vertices, &directions, 0.0, &[true; 4]).unwrap();
    assert_eq!(moved, vertices);
}

#[test]
fn test_directions_need_not_be_unit() {
    let moved = displace(&[DVec3::ZERO], &[DVec3::new(0.0, 2.0, 0.0)], 1.5, &[true]).unwrap();
    assert_eq!(moved[0], DVec3::new(0.0, 3.0, 0.0));
}

#[test]
fn test_shape_mismatch() {
    let vertices = square();
    let err = displace(&vertices, &[DVec3::Z; 3], 1.0, &[true; 4]).unwrap_err();
    assert_eq!(err, MeshError::shape_mismatch("directions", 4, 3));

    let err = displace(&vertices, &[DVec3::Z; 4], 1.0, &[true; 5]).unwrap_err();
    assert_eq!(err, MeshError::shape_mismatch("mask", 4, 5));
}

#[test]
fn test_displace_scaled_per_vertex() {
    let vertices = square();
    let directions = vec![DVec3::Z; 4];
    let magnitudes = [1.0, 2.0, 3.0, 4.0];
    let moved = displace_scaled(&vertices, &directions, &magnitudes, &[true, false, true, true]).unwrap();
    assert_eq!(moved[0].z, 1.0);
    assert_eq!(moved[1].z, 0.0);
    assert_eq!(moved[2].z, 3.0);
    assert_eq!(moved[3].z, 4.0);

    assert!(displace_scaled(&vertices, &directions, &[1.0], &[true; 4]).is_err());
}

#[test]
fn test_mask_recovered_from_displacement() {
    let vertices = square();
    let directions = vec![DVec3::Z; 4];
    let mask = vec![true, false, true, false];
    let moved = displace(&vertices, &directions, 0.25, &mask).unwrap();
    let recovered =
        mask_from_displacement(&vertices, &moved, DISPLACEMENT_RTOL, DISPLACEMENT_ATOL).unwrap();
    assert_eq!(recovered, mask);
}

#[test]
fn test_mask_ignores_noise_within_tolerance() {
    let a = [DVec3::new(1000.0, 0.0, 0.0)];
    let b = [DVec3::new(1000.0 + 1e-4, 1e-9, 0.0)];
    let mask = mask_from_displacement(&a, &b, DISPLACEMENT_RTOL, DISPLACEMENT_ATOL).unwrap();
    assert_eq!(mask, vec![false]);
}
