//! # Texture Sampler
//!
//! Maps per-vertex texture coordinates to values read from a 2D field.
//!
//! ## Conventions
//!
//! - Fields are stored in image order: row-major, row 0 is the top row.
//! - Texture coordinate `v = 0` is the *bottom* of the field, so lookups read
//!   rows with a vertical flip.
//! - Coordinates outside `[0, 1]` are clamped to the field boundary.
//!
//! ## Example
//!
//! ```rust
//! use config::settings::{MaskConfig, SamplerConfig};
//! use glam::DVec2;
//! use meshdd::texture::{sample, threshold_mask, TextureField};
//!
//! // 1x2 image: top pixel white, bottom pixel black
//! let field = TextureField::from_scalars(1, 2, vec![255.0, 0.0]).unwrap();
//! let uvs = [DVec2::new(0.5, 0.9), DVec2::new(0.5, 0.1)];
//! let samples = sample(&field, &uvs, &SamplerConfig::default());
//! assert_eq!(samples.channel_mean(), vec![255.0, 0.0]);
//!
//! let mask = threshold_mask(&samples.channel_mean(), &MaskConfig::default());
//! assert_eq!(mask, vec![true, false]);
//! ```

mod blur;

#[cfg(test)]
mod tests;

use crate::error::MeshError;
use config::constants::CHANNEL_MAX;
use config::settings::{MaskConfig, SamplerConfig, SamplingPolicy};
use glam::DVec2;
use rayon::prelude::*;

pub use blur::gaussian_blur;

/// A rectangular field of samples with one or more channels.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureField {
    width: usize,
    height: usize,
    channels: usize,
    /// Row-major samples, image order (row 0 = top)
    samples: Vec<f64>,
}

impl TextureField {
    /// Creates a field from image-ordered, interleaved samples.
    pub fn new(
        width: usize,
        height: usize,
        channels: usize,
        samples: Vec<f64>,
    ) -> Result<Self, MeshError> {
        if width == 0 || height == 0 || channels == 0 {
            return Err(MeshError::invalid_field(format!(
                "dimensions must be non-zero: {width}x{height}x{channels}"
            )));
        }
        let expected = width * height * channels;
        if samples.len() != expected {
            return Err(MeshError::invalid_field(format!(
                "expected {expected} samples for {width}x{height}x{channels}, got {}",
                samples.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            samples,
        })
    }

    /// Creates a single channel field from image-ordered samples.
    pub fn from_scalars(width: usize, height: usize, samples: Vec<f64>) -> Result<Self, MeshError> {
        Self::new(width, height, 1, samples)
    }

    /// Creates a field from 8-bit image data (e.g. decoded RGB or RGBA rows).
    pub fn from_bytes(
        width: usize,
        height: usize,
        channels: usize,
        bytes: &[u8],
    ) -> Result<Self, MeshError> {
        Self::new(width, height, channels, bytes.iter().map(|&b| f64::from(b)).collect())
    }

    /// Creates a single channel field from a boolean image, selected pixels
    /// at full channel intensity.
    ///
    /// After a blur the default threshold keeps pixels whose neighbourhood is
    /// at least half selected.
    pub fn from_mask(width: usize, height: usize, mask: &[bool]) -> Result<Self, MeshError> {
        Self::new(
            width,
            height,
            1,
            mask.iter().map(|&m| if m { CHANNEL_MAX } else { 0.0 }).collect(),
        )
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of channels per pixel.
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Raw samples in image order.
    #[inline]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Channels of the pixel at column `x` and image row `row` (0 = top).
    #[inline]
    pub fn pixel(&self, x: usize, row: usize) -> &[f64] {
        let start = (row * self.width + x) * self.channels;
        &self.samples[start..start + self.channels]
    }

    /// Channels of the pixel at column `x` and row `y` counted from the
    /// bottom, matching texture coordinate orientation.
    #[inline]
    pub fn texel(&self, x: usize, y: usize) -> &[f64] {
        self.pixel(x, self.height - 1 - y)
    }

    /// Returns a field with `f` applied to every sample.
    pub fn map(&self, f: impl Fn(f64) -> f64 + Sync) -> Self {
        Self {
            width: self.width,
            height: self.height,
            channels: self.channels,
            samples: self.samples.par_iter().map(|&s| f(s)).collect(),
        }
    }

    /// Returns the field with every sample replaced by `max - value`.
    pub fn inverted(&self, max: f64) -> Self {
        self.map(|s| max - s)
    }

    /// Reduces channels to their mean, yielding a single channel field.
    pub fn channel_mean(&self) -> Self {
        if self.channels == 1 {
            return self.clone();
        }
        let n = self.channels as f64;
        Self {
            width: self.width,
            height: self.height,
            channels: 1,
            samples: self
                .samples
                .chunks_exact(self.channels)
                .map(|px| px.iter().sum::<f64>() / n)
                .collect(),
        }
    }

    /// Nearest pixel lookup, clamped to the field.
    fn nearest(&self, uv: DVec2, out: &mut [f64]) {
        let x = nearest_index(uv.x, self.width);
        let y = nearest_index(uv.y, self.height);
        out.copy_from_slice(self.texel(x, y));
    }

    /// Bilinear lookup between pixel centers, clamped to the field.
    fn bilinear(&self, uv: DVec2, out: &mut [f64]) {
        let (x0, x1, tx) = bilinear_span(uv.x, self.width);
        let (y0, y1, ty) = bilinear_span(uv.y, self.height);
        let p00 = self.texel(x0, y0);
        let p10 = self.texel(x1, y0);
        let p01 = self.texel(x0, y1);
        let p11 = self.texel(x1, y1);
        for (c, o) in out.iter_mut().enumerate() {
            let bottom = p00[c] + (p10[c] - p00[c]) * tx;
            let top = p01[c] + (p11[c] - p01[c]) * tx;
            *o = bottom + (top - bottom) * ty;
        }
    }
}

/// Index of the pixel containing `t * size`, clamped to `[0, size - 1]`.
#[inline]
fn nearest_index(t: f64, size: usize) -> usize {
    let scaled = (t * size as f64).floor();
    if scaled.is_nan() || scaled < 0.0 {
        0
    } else {
        (scaled as usize).min(size - 1)
    }
}

/// Neighbouring pixel indices and blend factor for a bilinear lookup.
#[inline]
fn bilinear_span(t: f64, size: usize) -> (usize, usize, f64) {
    let max = (size - 1) as f64;
    let pos = (t * size as f64 - 0.5).clamp(0.0, max);
    if pos.is_nan() {
        return (0, 0, 0.0);
    }
    let i0 = pos.floor() as usize;
    let i1 = (i0 + 1).min(size - 1);
    (i0, i1, pos - i0 as f64)
}

/// Values sampled at a sequence of coordinates.
///
/// One entry of `channels` values per coordinate, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct Samples {
    channels: usize,
    values: Vec<f64>,
}

impl Samples {
    /// Number of sampled coordinates.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len() / self.channels
    }

    /// Returns true if nothing was sampled.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of channels per sample.
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Channels of the i-th sample.
    #[inline]
    pub fn get(&self, index: usize) -> &[f64] {
        &self.values[index * self.channels..(index + 1) * self.channels]
    }

    /// Iterates over samples.
    pub fn iter(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.values.chunks_exact(self.channels)
    }

    /// Reduces every sample to the mean of its channels.
    pub fn channel_mean(&self) -> Vec<f64> {
        let n = self.channels as f64;
        self.iter().map(|s| s.iter().sum::<f64>() / n).collect()
    }
}

/// Samples `field` at each texture coordinate.
///
/// Pure: returns one sample per coordinate in the same order. Out of range
/// coordinates are clamped, never wrapped.
pub fn sample(field: &TextureField, uvs: &[DVec2], config: &SamplerConfig) -> Samples {
    let channels = field.channels();
    let mut values = vec![0.0; uvs.len() * channels];
    values
        .par_chunks_mut(channels)
        .zip(uvs.par_iter())
        .for_each(|(out, &uv)| match config.policy {
            SamplingPolicy::Nearest => field.nearest(uv, out),
            SamplingPolicy::Bilinear => field.bilinear(uv, out),
        });
    Samples { channels, values }
}

/// Reduces scalar values to a per-vertex boolean mask.
pub fn threshold_mask(values: &[f64], config: &MaskConfig) -> Vec<bool> {
    values.par_iter().map(|&v| config.accepts(v)).collect()
}

/// Samples a field, averages channels and thresholds the result.
pub fn sample_mask(
    field: &TextureField,
    uvs: &[DVec2],
    sampler: &SamplerConfig,
    mask: &MaskConfig,
) -> Vec<bool> {
    threshold_mask(&sample(field, uvs, sampler).channel_mean(), mask)
}
