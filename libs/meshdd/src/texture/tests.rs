//! # Texture Sampler Tests

use super::*;
use approx::assert_relative_eq;

/// 2x2 field, image order: top row [10, 20], bottom row [30, 40].
fn quad_field() -> TextureField {
    TextureField::from_scalars(2, 2, vec![10.0, 20.0, 30.0, 40.0]).unwrap()
}

#[test]
fn test_field_rejects_wrong_sample_count() {
    assert!(TextureField::from_scalars(2, 2, vec![0.0; 3]).is_err());
    assert!(TextureField::new(0, 2, 1, vec![]).is_err());
}

#[test]
fn test_texel_counts_rows_from_bottom() {
    let field = quad_field();
    assert_eq!(field.texel(0, 0), &[30.0]);
    assert_eq!(field.texel(1, 1), &[20.0]);
    assert_eq!(field.pixel(0, 0), &[10.0]);
}

#[test]
fn test_nearest_reads_with_vertical_flip() {
    let field = quad_field();
    let uvs = [
        DVec2::new(0.25, 0.25),
        DVec2::new(0.75, 0.25),
        DVec2::new(0.25, 0.75),
        DVec2::new(0.75, 0.75),
    ];
    let samples = sample(&field, &uvs, &SamplerConfig::default());
    assert_eq!(samples.len(), 4);
    assert_eq!(samples.channel_mean(), vec![30.0, 40.0, 10.0, 20.0]);
}

#[test]
fn test_nearest_clamps_out_of_range() {
    let field = quad_field();
    let uvs = [
        DVec2::new(-3.0, -1.0),
        DVec2::new(1.0, 1.0),
        DVec2::new(5.0, 0.1),
        DVec2::new(f64::NAN, 0.9),
    ];
    let samples = sample(&field, &uvs, &SamplerConfig::default());
    assert_eq!(samples.channel_mean(), vec![30.0, 20.0, 40.0, 10.0]);
}

#[test]
fn test_bilinear_interpolates_between_centers() {
    let field = quad_field();
    let config = SamplerConfig::new(SamplingPolicy::Bilinear);
    let samples = sample(&field, &[DVec2::new(0.5, 0.5)], &config);
    assert_relative_eq!(samples.get(0)[0], 25.0, epsilon = 1e-12);

    // Pixel centers reproduce the pixel value
    let samples = sample(&field, &[DVec2::new(0.25, 0.75)], &config);
    assert_relative_eq!(samples.get(0)[0], 10.0, epsilon = 1e-12);

    // Beyond the outer centers the value is clamped
    let samples = sample(&field, &[DVec2::new(-1.0, 2.0)], &config);
    assert_relative_eq!(samples.get(0)[0], 10.0, epsilon = 1e-12);
}

#[test]
fn test_multichannel_samples_and_mean() {
    // 1x1 RGB pixel
    let field = TextureField::from_bytes(1, 1, 3, &[255, 0, 30]).unwrap();
    let samples = sample(&field, &[DVec2::new(0.5, 0.5); 2], &SamplerConfig::default());
    assert_eq!(samples.channels(), 3);
    assert_eq!(samples.get(1), &[255.0, 0.0, 30.0]);
    assert_eq!(samples.channel_mean(), vec![95.0, 95.0]);
    assert_eq!(field.channel_mean().samples(), &[95.0]);
}

#[test]
fn test_empty_coordinates() {
    let samples = sample(&quad_field(), &[], &SamplerConfig::default());
    assert!(samples.is_empty());
    assert_eq!(samples.len(), 0);
}

#[test]
fn test_threshold_and_reverse() {
    let values = [0.0, 127.9, 128.0, 255.0];
    let mask = threshold_mask(&values, &MaskConfig::default());
    assert_eq!(mask, vec![false, false, true, true]);

    let reversed = MaskConfig::new(128.0, true).unwrap();
    assert_eq!(threshold_mask(&values, &reversed), vec![true, true, false, false]);
}

#[test]
fn test_inverted_field() {
    let field = quad_field().inverted(CHANNEL_MAX);
    assert_eq!(field.samples(), &[245.0, 235.0, 225.0, 215.0]);
}

#[test]
fn test_sample_mask_from_boolean_image() {
    // Top row selected
    let field = TextureField::from_mask(2, 2, &[true, true, false, false]).unwrap();
    let uvs = [DVec2::new(0.1, 0.9), DVec2::new(0.9, 0.1)];
    let mask = sample_mask(&field, &uvs, &SamplerConfig::default(), &MaskConfig::default());
    assert_eq!(mask, vec![true, false]);

    let inverted = field.inverted(CHANNEL_MAX);
    let mask = sample_mask(&inverted, &uvs, &SamplerConfig::default(), &MaskConfig::default());
    assert_eq!(mask, vec![false, true]);
}
