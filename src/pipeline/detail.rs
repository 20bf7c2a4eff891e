//! Unsharp-mask detail enhancement on the lightness channel.

use image::{GrayImage, RgbImage};
use imageproc::filter::gaussian_blur_f32;

use crate::color::{saturate_u8, Lab8Planes};

/// Blur radius at amount zero.
const BASE_SIGMA: f32 = 2.0;

/// Additional blur radius per unit of amount.
const SIGMA_PER_AMOUNT: f32 = 3.0;

/// Sharpen lightness with an unsharp mask.
///
/// `amount` is clamped to [0, 1]; NaN is treated as 0. The blur radius grows
/// with the amount, so strong settings sharpen coarser structure as well as
/// fine edges. Chroma is carried over unchanged.
#[must_use]
pub fn enhance_details(image: &RgbImage, amount: f32) -> RgbImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let amount = if amount.is_nan() {
        0.0
    } else {
        amount.clamp(0.0, 1.0)
    };

    let mut lab = Lab8Planes::from_rgb(image);
    let Some(sharpened) = sharpen_lightness(&lab.l, width, height, amount) else {
        tracing::warn!("Lightness plane does not match {width}x{height}, skipping detail");
        return image.clone();
    };
    lab.l = sharpened;

    lab.to_rgb()
}

/// Unsharp-mask one lightness plane. Returns `None` if the plane length does
/// not match the dimensions.
fn sharpen_lightness(lightness: &[u8], width: u32, height: u32, amount: f32) -> Option<Vec<u8>> {
    let sigma = SIGMA_PER_AMOUNT.mul_add(amount, BASE_SIGMA);
    let weight = 0.5 * amount;

    let plane = GrayImage::from_raw(width, height, lightness.to_vec())?;
    let blurred = gaussian_blur_f32(&plane, sigma);

    tracing::debug!("Detail enhancement amount={amount:.2} sigma={sigma:.2}");

    Some(
        plane
            .as_raw()
            .iter()
            .zip(blurred.as_raw())
            .map(|(&l, &blur)| {
                saturate_u8(f32::from(l).mul_add(1.0 + weight, -f32::from(blur) * weight))
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[allow(clippy::cast_possible_truncation)]
    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            let v = (40 + (x * 175) / width.max(1)) as u8;
            Rgb([v, v.saturating_sub((y % 7) as u8), v])
        })
    }

    fn step_edge() -> RgbImage {
        RgbImage::from_fn(40, 10, |x, _| {
            if x < 20 {
                Rgb([60, 60, 60])
            } else {
                Rgb([200, 200, 200])
            }
        })
    }

    #[test]
    fn test_zero_amount_keeps_lightness() {
        let image = gradient(32, 16);
        let out = enhance_details(&image, 0.0);

        let before = Lab8Planes::from_rgb(&image);
        let after = Lab8Planes::from_rgb(&out);
        for (a, b) in before.l.iter().zip(&after.l) {
            assert!(a.abs_diff(*b) <= 2);
        }
    }

    #[test]
    fn test_full_amount_deepens_edge() {
        let image = step_edge();
        let out = enhance_details(&image, 1.0);

        let before = Lab8Planes::from_rgb(&image);
        let after = Lab8Planes::from_rgb(&out);
        let dark = 5 * 40 + 19;
        let bright = 5 * 40 + 20;

        assert!(after.l[dark] < before.l[dark]);
        assert!(after.l[bright] > before.l[bright]);
    }

    #[test]
    fn test_amount_is_clamped() {
        let image = step_edge();
        assert_eq!(enhance_details(&image, 7.5), enhance_details(&image, 1.0));
        assert_eq!(enhance_details(&image, f32::NAN), enhance_details(&image, 0.0));
    }

    #[test]
    fn test_mismatched_plane_is_refused() {
        assert!(sharpen_lightness(&[10; 11], 4, 3, 0.5).is_none());
        assert_eq!(sharpen_lightness(&[10; 12], 4, 3, 0.5).map(|l| l.len()), Some(12));
    }

    #[test]
    fn test_preserves_dimensions() {
        let image = gradient(17, 9);
        assert_eq!(enhance_details(&image, 0.6).dimensions(), (17, 9));
        assert_eq!(enhance_details(&RgbImage::new(0, 0), 0.5).dimensions(), (0, 0));
    }
}
