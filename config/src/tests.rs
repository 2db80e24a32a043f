//! # Tests for Config Constants
//!
//! Sanity checks on the relationships between constants.

use crate::constants::*;

#[test]
fn test_threshold_within_channel_range() {
    assert!(DEFAULT_THRESHOLD > 0.0);
    assert!(DEFAULT_THRESHOLD < CHANNEL_MAX);
}

#[test]
fn test_depth_is_positive() {
    assert!(DEFAULT_DEPTH > 0.0);
}

#[test]
fn test_sphere_defaults_are_tessellable() {
    assert!(DEFAULT_SPHERE_RADIUS > 0.0);
    assert!(DEFAULT_SPHERE_LONGITUDES >= MIN_SEGMENTS);
    assert!(DEFAULT_SPHERE_RINGS >= 1);
}

#[test]
fn test_tolerances_are_ordered() {
    assert!(DISPLACEMENT_ATOL > 0.0);
    assert!(DISPLACEMENT_RTOL > DISPLACEMENT_ATOL);
    assert!(CLEAN_MERGE_TOLERANCE < DISPLACEMENT_ATOL);
}

#[test]
fn test_gaussian_truncate_covers_kernel() {
    assert!(GAUSSIAN_TRUNCATE >= 3.0);
}
