//! HSV views with 8-bit half-degree hue buckets.

use image::RgbImage;
use palette::{FromColor, Hsv, Srgb};
use rayon::prelude::*;

use super::{quantize_unit, saturate_u8};

/// Number of hue buckets in the 8-bit encoding (two degrees each).
pub const HUE_BUCKETS: u8 = 180;

/// Convert one 8-bit sRGB pixel to floating HSV (hue in degrees).
#[inline]
#[must_use]
pub fn pixel_to_hsv(px: [u8; 3]) -> Hsv {
    let srgb: Srgb<f32> = Srgb::new(px[0], px[1], px[2]).into_format();
    Hsv::from_color(srgb)
}

/// Convert floating HSV back to an 8-bit sRGB pixel with rounding.
#[inline]
#[must_use]
pub fn hsv_to_pixel(hsv: Hsv) -> [u8; 3] {
    let srgb: Srgb<f32> = Srgb::from_color(hsv);
    [
        quantize_unit(srgb.red),
        quantize_unit(srgb.green),
        quantize_unit(srgb.blue),
    ]
}

#[inline]
fn encode(hsv: Hsv) -> [u8; 3] {
    let hue = saturate_u8(hsv.hue.into_positive_degrees() / 2.0) % HUE_BUCKETS;
    [hue, quantize_unit(hsv.saturation), quantize_unit(hsv.value)]
}

#[inline]
fn decode(h: u8, s: u8, v: u8) -> [u8; 3] {
    hsv_to_pixel(Hsv::new(
        f32::from(h) * 2.0,
        f32::from(s) / 255.0,
        f32::from(v) / 255.0,
    ))
}

/// HSV planes: hue in [0, 179], saturation and value in [0, 255].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hsv8Planes {
    pub width: u32,
    pub height: u32,
    pub h: Vec<u8>,
    pub s: Vec<u8>,
    pub v: Vec<u8>,
}

impl Hsv8Planes {
    /// Convert an RGB image to 8-bit HSV.
    #[must_use]
    pub fn from_rgb(image: &RgbImage) -> Self {
        let pixels: Vec<[u8; 3]> = image
            .as_raw()
            .par_chunks_exact(3)
            .map(|px| encode(pixel_to_hsv([px[0], px[1], px[2]])))
            .collect();

        Self {
            width: image.width(),
            height: image.height(),
            h: pixels.iter().map(|p| p[0]).collect(),
            s: pixels.iter().map(|p| p[1]).collect(),
            v: pixels.iter().map(|p| p[2]).collect(),
        }
    }

    /// Convert back to RGB.
    #[must_use]
    pub fn to_rgb(&self) -> RgbImage {
        let mut out = RgbImage::new(self.width, self.height);
        out.par_chunks_exact_mut(3)
            .enumerate()
            .for_each(|(i, px)| {
                px.copy_from_slice(&decode(self.h[i], self.s[i], self.v[i]));
            });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_primary_hues() {
        let image = RgbImage::from_fn(4, 1, |x, _| match x {
            0 => Rgb([255, 0, 0]),
            1 => Rgb([255, 255, 0]),
            2 => Rgb([0, 255, 0]),
            _ => Rgb([0, 0, 255]),
        });
        let hsv = Hsv8Planes::from_rgb(&image);

        assert_eq!(hsv.h, vec![0, 30, 60, 120]);
        assert!(hsv.s.iter().all(|&s| s == 255));
        assert!(hsv.v.iter().all(|&v| v == 255));
    }

    #[test]
    fn test_gray_is_unsaturated() {
        let image = RgbImage::from_pixel(3, 3, Rgb([90, 90, 90]));
        let hsv = Hsv8Planes::from_rgb(&image);

        assert!(hsv.s.iter().all(|&s| s == 0));
        assert!(hsv.v.iter().all(|&v| v == 90));
    }

    #[test]
    fn test_bucket_aligned_round_trip_is_exact() {
        let image = RgbImage::from_fn(6, 2, |x, y| match (x, y) {
            (0, 0) => Rgb([255, 0, 0]),
            (1, 0) => Rgb([0, 200, 0]),
            (2, 0) => Rgb([0, 0, 100]),
            (3, 0) => Rgb([0, 0, 0]),
            (4, 0) => Rgb([255, 255, 255]),
            _ => Rgb([128, 128, 128]),
        });
        let back = Hsv8Planes::from_rgb(&image).to_rgb();
        assert_eq!(back, image);
    }

    #[test]
    #[allow(clippy::cast_possible_truncation)]
    fn test_float_round_trip_within_one() {
        let image = RgbImage::from_fn(32, 32, |x, y| {
            Rgb([(x * 8) as u8, (y * 8) as u8, ((x * y) % 256) as u8])
        });

        for (px, original) in image.pixels().map(|p| (hsv_to_pixel(pixel_to_hsv(p.0)), p.0)) {
            for c in 0..3 {
                assert!(px[c].abs_diff(original[c]) <= 1);
            }
        }
    }
}
