//! # Configuration Constants
//!
//! Centralized constants for the meshdd pipeline.
//!
//! ## Categories
//!
//! - **Masking**: Default threshold applied to sampled texture values
//! - **Displacement**: Default carving depth and mesh scaling
//! - **Shapes**: Default resolution of generated primitives
//! - **Tolerances**: Comparison tolerances used to recover masks and clean meshes

// =============================================================================
// MASKING CONSTANTS
// =============================================================================

/// Default threshold applied to sampled texture values.
///
/// Sampled values are averaged over channels, so for 8-bit images this splits
/// the value range in two halves. Vertices whose value is greater than or
/// equal to the threshold are carved.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_THRESHOLD;
///
/// let white = 255.0;
/// assert!(white >= DEFAULT_THRESHOLD);
/// ```
pub const DEFAULT_THRESHOLD: f64 = 128.0;

/// Maximum value of an 8-bit texture channel.
///
/// Used when inverting textures (`max - value`) and when normalising relief
/// textures to a `[0, 1]` displacement factor.
pub const CHANNEL_MAX: f64 = 255.0;

// =============================================================================
// DISPLACEMENT CONSTANTS
// =============================================================================

/// Default carving depth, in mesh units after scaling.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_DEPTH;
///
/// assert!(DEFAULT_DEPTH > 0.0);
/// ```
pub const DEFAULT_DEPTH: f64 = 0.5;

/// Default uniform scale applied to meshes read from files.
pub const DEFAULT_MESH_SCALE: f64 = 50.0;

// =============================================================================
// SHAPE CONSTANTS
// =============================================================================

/// Default radius of generated spheres.
pub const DEFAULT_SPHERE_RADIUS: f64 = 50.0;

/// Default number of longitude samples of generated UV spheres.
pub const DEFAULT_SPHERE_LONGITUDES: u32 = 501;

/// Default number of latitude rings (poles excluded) of generated UV spheres.
pub const DEFAULT_SPHERE_RINGS: u32 = 499;

/// Minimum number of segments around any generated circle.
///
/// # Example
///
/// ```rust
/// use config::constants::MIN_SEGMENTS;
///
/// let requested = 2;
/// assert!(requested < MIN_SEGMENTS);
/// ```
pub const MIN_SEGMENTS: u32 = 3;

// =============================================================================
// TOLERANCE CONSTANTS
// =============================================================================

/// Relative tolerance used when recovering a mask from two vertex buffers.
///
/// A coordinate pair `(a, b)` is considered unchanged when
/// `|a - b| <= DISPLACEMENT_ATOL + DISPLACEMENT_RTOL * |b|`.
pub const DISPLACEMENT_RTOL: f64 = 1e-5;

/// Absolute tolerance used when recovering a mask from two vertex buffers.
pub const DISPLACEMENT_ATOL: f64 = 1e-8;

/// Distance under which two vertices are merged by mesh cleaning.
///
/// # Example
///
/// ```rust
/// use config::constants::CLEAN_MERGE_TOLERANCE;
///
/// let distance: f64 = 1e-13;
/// assert!(distance < CLEAN_MERGE_TOLERANCE);
/// ```
pub const CLEAN_MERGE_TOLERANCE: f64 = 1e-12;

/// Number of standard deviations covered by a Gaussian blur kernel.
pub const GAUSSIAN_TRUNCATE: f64 = 4.0;
