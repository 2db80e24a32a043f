//! Settings values handed explicitly to the sampler, the classifier and the
//! split pipeline.
//!
//! Each struct validates its fields on construction; `Default` yields the
//! values from [`crate::constants`].

use crate::constants::{DEFAULT_DEPTH, DEFAULT_MESH_SCALE, DEFAULT_THRESHOLD};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a texture field is read at a texture coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingPolicy {
    /// Value of the pixel containing the scaled coordinate.
    #[default]
    Nearest,
    /// Bilinear interpolation between the four surrounding pixel centers.
    Bilinear,
}

/// Texture sampler settings.
///
/// # Examples
/// ```
/// use config::settings::{SamplerConfig, SamplingPolicy};
/// let cfg = SamplerConfig::new(SamplingPolicy::Bilinear);
/// assert_eq!(cfg.policy, SamplingPolicy::Bilinear);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Lookup policy.
    pub policy: SamplingPolicy,
}

impl SamplerConfig {
    /// Creates a sampler configuration with the given policy.
    pub fn new(policy: SamplingPolicy) -> Self {
        Self { policy }
    }
}

/// Reduction of scalar values to a boolean mask.
///
/// # Examples
/// ```
/// use config::settings::MaskConfig;
/// let cfg = MaskConfig::new(0.5, true).unwrap();
/// assert!(cfg.accepts(0.2));
/// assert!(!cfg.accepts(0.5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaskConfig {
    /// Values greater than or equal to this threshold are selected.
    pub threshold: f64,
    /// Select values below the threshold instead.
    pub reverse: bool,
}

impl MaskConfig {
    /// Builds a mask configuration, rejecting non-finite thresholds.
    pub fn new(threshold: f64, reverse: bool) -> Result<Self, ConfigError> {
        if !threshold.is_finite() {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        Ok(Self { threshold, reverse })
    }

    /// Returns true if `value` belongs to the mask.
    #[inline]
    pub fn accepts(&self, value: f64) -> bool {
        (value >= self.threshold) != self.reverse
    }
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            reverse: false,
        }
    }
}

/// Settings of a texture driven split.
///
/// # Examples
/// ```
/// use config::settings::{MaskConfig, SamplerConfig, SplitConfig};
/// let cfg = SplitConfig::new(MaskConfig::default(), SamplerConfig::default(), 1.2, Some(1.0)).unwrap();
/// assert_eq!(cfg.depth, 1.2);
/// assert!(SplitConfig::new(MaskConfig::default(), SamplerConfig::default(), -1.0, None).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Mask threshold settings.
    pub mask: MaskConfig,
    /// Texture lookup settings.
    pub sampler: SamplerConfig,
    /// Carving depth along the vertex normals (inward).
    pub depth: f64,
    /// Standard deviation of an optional Gaussian blur applied to the texture
    /// before sampling, in pixels.
    pub blur_sigma: Option<f64>,
}

impl SplitConfig {
    /// Builds a split configuration, validating depth and blur.
    pub fn new(
        mask: MaskConfig,
        sampler: SamplerConfig,
        depth: f64,
        blur_sigma: Option<f64>,
    ) -> Result<Self, ConfigError> {
        if !depth.is_finite() || depth < 0.0 {
            return Err(ConfigError::InvalidDepth(depth));
        }
        if let Some(sigma) = blur_sigma {
            if !sigma.is_finite() || sigma < 0.0 {
                return Err(ConfigError::InvalidSigma(sigma));
            }
        }
        Ok(Self {
            mask,
            sampler,
            depth,
            blur_sigma,
        })
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            mask: MaskConfig::default(),
            sampler: SamplerConfig::default(),
            depth: DEFAULT_DEPTH,
            blur_sigma: None,
        }
    }
}

/// Settings of a file to file split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FileSplitConfig {
    /// Split settings.
    pub split: SplitConfig,
    /// Uniform scale applied to the mesh after reading.
    pub scale: f64,
    /// Run the source's cleaning pass before splitting.
    pub clean: bool,
}

impl FileSplitConfig {
    /// Builds a file split configuration, rejecting non-positive scales.
    pub fn new(split: SplitConfig, scale: f64, clean: bool) -> Result<Self, ConfigError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ConfigError::InvalidScale(scale));
        }
        Ok(Self { split, scale, clean })
    }
}

impl Default for FileSplitConfig {
    fn default() -> Self {
        Self {
            split: SplitConfig::default(),
            scale: DEFAULT_MESH_SCALE,
            clean: false,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    /// Threshold is NaN or infinite.
    #[error("threshold must be finite: {0}")]
    InvalidThreshold(f64),
    /// Depth is negative or not finite.
    #[error("depth must be finite and non-negative: {0}")]
    InvalidDepth(f64),
    /// Blur standard deviation is negative or not finite.
    #[error("blur sigma must be finite and non-negative: {0}")]
    InvalidSigma(f64),
    /// Scale is zero, negative or not finite.
    #[error("scale must be finite and positive: {0}")]
    InvalidScale(f64),
}
