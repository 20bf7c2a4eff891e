//! Uniform intensity scaling.

use image::RgbImage;
use rayon::prelude::*;

/// Multiply every sample by `factor`, clipping to [0, 255] and truncating.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn adjust_intensity(image: &RgbImage, factor: f32) -> RgbImage {
    let mut out = image.clone();
    out.par_iter_mut().for_each(|v| {
        // Safe: clamped to [0, 255] before casting
        *v = (f32::from(*v) * factor).clamp(0.0, 255.0) as u8;
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_unit_factor_is_identity() {
        let image = RgbImage::from_fn(9, 5, |x, y| Rgb([x as u8 * 20, y as u8 * 40, 255]));
        assert_eq!(adjust_intensity(&image, 1.0), image);
    }

    #[test]
    fn test_clips_at_white() {
        let image = RgbImage::from_pixel(4, 4, Rgb([200, 200, 200]));
        let out = adjust_intensity(&image, 2.0);
        assert!(out.pixels().all(|px| px.0 == [255, 255, 255]));
    }

    #[test]
    fn test_truncates() {
        let image = RgbImage::from_pixel(1, 1, Rgb([3, 7, 100]));
        let out = adjust_intensity(&image, 0.5);
        assert_eq!(out.get_pixel(0, 0).0, [1, 3, 50]);
    }

    #[test]
    fn test_zero_factor_is_black() {
        let image = RgbImage::from_pixel(3, 2, Rgb([10, 150, 250]));
        let out = adjust_intensity(&image, 0.0);
        assert_eq!(out.dimensions(), (3, 2));
        assert!(out.as_raw().iter().all(|&v| v == 0));
    }
}
