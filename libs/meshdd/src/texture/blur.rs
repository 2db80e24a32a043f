//! Separable Gaussian blur of texture fields.
//!
//! Used to smooth thresholded masks before sampling so that carved regions
//! do not follow single-pixel noise. Borders use half-sample reflection
//! (`d c b a | a b c d | d c b a`).

use super::TextureField;
use crate::error::MeshError;
use config::constants::GAUSSIAN_TRUNCATE;
use rayon::prelude::*;

/// Blurs every channel of `field` with a Gaussian of standard deviation
/// `sigma` pixels. A zero sigma returns the field unchanged.
pub fn gaussian_blur(field: &TextureField, sigma: f64) -> Result<TextureField, MeshError> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(MeshError::invalid_field(format!(
            "blur sigma must be finite and non-negative: {sigma}"
        )));
    }
    if sigma == 0.0 {
        return Ok(field.clone());
    }

    let kernel = gaussian_kernel(sigma);
    let (width, height, channels) = (field.width, field.height, field.channels);
    let row_len = width * channels;

    // Horizontal pass, one image row per task
    let mut horizontal = vec![0.0; field.samples.len()];
    horizontal
        .par_chunks_mut(row_len)
        .zip(field.samples.par_chunks(row_len))
        .for_each(|(out, row)| {
            for x in 0..width {
                for c in 0..channels {
                    out[x * channels + c] = convolve(&kernel, |offset| {
                        row[reflect(x as isize + offset, width) * channels + c]
                    });
                }
            }
        });

    // Vertical pass
    let mut vertical = vec![0.0; field.samples.len()];
    vertical
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, out)| {
            for x in 0..width {
                for c in 0..channels {
                    out[x * channels + c] = convolve(&kernel, |offset| {
                        horizontal[reflect(y as isize + offset, height) * row_len + x * channels + c]
                    });
                }
            }
        });

    TextureField::new(width, height, channels, vertical)
}

/// Normalised kernel weights for offsets `-radius..=radius`.
fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (GAUSSIAN_TRUNCATE * sigma + 0.5) as isize;
    let weights: Vec<f64> = (-radius..=radius)
        .map(|i| (-0.5 * (i * i) as f64 / (sigma * sigma)).exp())
        .collect();
    let total: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / total).collect()
}

#[inline]
fn convolve(kernel: &[f64], sample_at: impl Fn(isize) -> f64) -> f64 {
    let radius = (kernel.len() / 2) as isize;
    kernel
        .iter()
        .enumerate()
        .map(|(k, w)| w * sample_at(k as isize - radius))
        .sum()
}

/// Maps any index onto `[0, n)` by half-sample reflection.
#[inline]
fn reflect(index: isize, n: usize) -> usize {
    let period = 2 * n as isize;
    let m = index.rem_euclid(period);
    if m < n as isize {
        m as usize
    } else {
        (period - 1 - m) as usize
    }
}
