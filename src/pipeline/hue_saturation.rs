//! Hue rotation and saturation scaling in 8-bit HSV.

use image::RgbImage;

use crate::color::{Hsv8Planes, HUE_BUCKETS};

/// Rotate hue by `shift` buckets (two degrees each, any integer) and scale
/// saturation by `scale`.
///
/// Hue wraps modulo 180; saturation is clipped to [0, 255] and truncated.
/// Value is untouched.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn adjust_hue_saturation(image: &RgbImage, shift: i32, scale: f32) -> RgbImage {
    let buckets = i32::from(HUE_BUCKETS);
    let shift = shift.rem_euclid(buckets);
    let mut hsv = Hsv8Planes::from_rgb(image);

    for h in &mut hsv.h {
        // Safe: rem_euclid keeps the result in [0, 179]
        *h = (i32::from(*h) + shift).rem_euclid(buckets) as u8;
    }
    for s in &mut hsv.s {
        // Safe: clamped to [0, 255] before casting
        *s = (f32::from(*s) * scale).clamp(0.0, 255.0) as u8;
    }

    hsv.to_rgb()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn swatches() -> RgbImage {
        RgbImage::from_fn(4, 1, |x, _| match x {
            0 => Rgb([255, 0, 0]),
            1 => Rgb([0, 255, 0]),
            2 => Rgb([0, 0, 255]),
            _ => Rgb([128, 128, 128]),
        })
    }

    #[test]
    fn test_neutral_settings_are_identity() {
        let image = swatches();
        assert_eq!(adjust_hue_saturation(&image, 0, 1.0), image);
    }

    #[test]
    fn test_full_turn_is_identity() {
        let image = swatches();
        assert_eq!(adjust_hue_saturation(&image, 180, 1.0), image);
        assert_eq!(adjust_hue_saturation(&image, -360, 1.0), image);
    }

    #[test]
    fn test_shift_wraps() {
        let image = swatches();

        let out = adjust_hue_saturation(&image, -60, 1.0);
        // blue (120) -> green (60), red (0) -> blue (120)
        assert_eq!(out.get_pixel(2, 0).0, [0, 255, 0]);
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 255]);
        // gray has no hue to rotate
        assert_eq!(out.get_pixel(3, 0).0, [128, 128, 128]);
    }

    #[test]
    fn test_extreme_shift_does_not_overflow() {
        let image = swatches();
        let out = adjust_hue_saturation(&image, i32::MAX, 1.0);
        assert_eq!(out.dimensions(), (4, 1));
    }

    #[test]
    fn test_zero_saturation_is_gray() {
        let out = adjust_hue_saturation(&swatches(), 0, 0.0);
        for px in out.pixels() {
            assert!(px[0] == px[1] && px[1] == px[2], "{px:?}");
        }
    }

    #[test]
    fn test_saturation_clips() {
        let image = RgbImage::from_pixel(2, 2, Rgb([200, 100, 100]));
        let out = adjust_hue_saturation(&image, 0, 10.0);
        let hsv = Hsv8Planes::from_rgb(&out);
        assert!(hsv.s.iter().all(|&s| s == 255));
    }
}
