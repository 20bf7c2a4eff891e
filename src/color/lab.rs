//! CIE L*a*b* views (D65 white, sRGB companding).

use image::RgbImage;
use palette::{FromColor, IntoColor, Lab, LinSrgb, Srgb};
use rayon::prelude::*;

use super::{quantize_unit, saturate_u8};

/// Convert one 8-bit sRGB pixel to floating Lab.
///
/// L is in [0, 100]; a and b are roughly within [-128, 127].
#[inline]
#[must_use]
pub fn pixel_to_lab(px: [u8; 3]) -> Lab {
    let srgb: Srgb<f32> = Srgb::new(px[0], px[1], px[2]).into_format();
    let linear: LinSrgb = srgb.into_linear();
    Lab::from_color(linear)
}

/// Convert floating Lab back to unit-range sRGB, clipped to [0, 1].
#[inline]
#[must_use]
pub fn lab_to_pixel(lab: Lab) -> Srgb<f32> {
    let linear: LinSrgb = lab.into_color();
    let srgb: Srgb<f32> = Srgb::from_linear(linear);
    Srgb::new(
        srgb.red.clamp(0.0, 1.0),
        srgb.green.clamp(0.0, 1.0),
        srgb.blue.clamp(0.0, 1.0),
    )
}

/// Floating-point Lab planes of an RGB image.
#[derive(Debug, Clone, PartialEq)]
pub struct LabPlanes {
    pub width: u32,
    pub height: u32,
    pub l: Vec<f32>,
    pub a: Vec<f32>,
    pub b: Vec<f32>,
}

impl LabPlanes {
    /// Normalize an RGB image to [0, 1] and convert it to Lab.
    #[must_use]
    pub fn from_rgb(image: &RgbImage) -> Self {
        let pixels: Vec<Lab> = image
            .as_raw()
            .par_chunks_exact(3)
            .map(|px| pixel_to_lab([px[0], px[1], px[2]]))
            .collect();

        Self {
            width: image.width(),
            height: image.height(),
            l: pixels.iter().map(|p| p.l).collect(),
            a: pixels.iter().map(|p| p.a).collect(),
            b: pixels.iter().map(|p| p.b).collect(),
        }
    }

    /// Convert back to RGB: clip to [0, 1], scale by 255 and truncate.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_rgb(&self) -> RgbImage {
        let mut out = RgbImage::new(self.width, self.height);
        out.par_chunks_exact_mut(3)
            .enumerate()
            .for_each(|(i, px)| {
                let rgb = lab_to_pixel(Lab::new(self.l[i], self.a[i], self.b[i]));
                // Safe: lab_to_pixel clips to [0, 1]
                px[0] = (rgb.red * 255.0) as u8;
                px[1] = (rgb.green * 255.0) as u8;
                px[2] = (rgb.blue * 255.0) as u8;
            });
        out
    }

    /// Number of pixels per plane.
    #[must_use]
    pub fn len(&self) -> usize {
        self.l.len()
    }

    /// Whether the planes hold no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.l.is_empty()
    }
}

/// Lab planes in the conventional 8-bit encoding:
/// `L * 255 / 100`, `a + 128`, `b + 128`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lab8Planes {
    pub width: u32,
    pub height: u32,
    pub l: Vec<u8>,
    pub a: Vec<u8>,
    pub b: Vec<u8>,
}

impl Lab8Planes {
    /// Convert an RGB image to 8-bit Lab.
    #[must_use]
    pub fn from_rgb(image: &RgbImage) -> Self {
        let pixels: Vec<[u8; 3]> = image
            .as_raw()
            .par_chunks_exact(3)
            .map(|px| {
                let lab = pixel_to_lab([px[0], px[1], px[2]]);
                [
                    saturate_u8(lab.l * 255.0 / 100.0),
                    saturate_u8(lab.a + 128.0),
                    saturate_u8(lab.b + 128.0),
                ]
            })
            .collect();

        Self {
            width: image.width(),
            height: image.height(),
            l: pixels.iter().map(|p| p[0]).collect(),
            a: pixels.iter().map(|p| p[1]).collect(),
            b: pixels.iter().map(|p| p[2]).collect(),
        }
    }

    /// Decode back to RGB with rounding.
    #[must_use]
    pub fn to_rgb(&self) -> RgbImage {
        let mut out = RgbImage::new(self.width, self.height);
        out.par_chunks_exact_mut(3)
            .enumerate()
            .for_each(|(i, px)| {
                let lab = Lab::new(
                    f32::from(self.l[i]) * 100.0 / 255.0,
                    f32::from(self.a[i]) - 128.0,
                    f32::from(self.b[i]) - 128.0,
                );
                let rgb = lab_to_pixel(lab);
                px[0] = quantize_unit(rgb.red);
                px[1] = quantize_unit(rgb.green);
                px[2] = quantize_unit(rgb.blue);
            });
        out
    }
}
