//! Color correction: statistical transfer from a reference image, or a fixed
//! yellow-green desaturation heuristic.

use std::ops::RangeInclusive;

use image::{imageops::FilterType, RgbImage};

use crate::color::{Hsv8Planes, Lab8Planes, HUE_BUCKETS};
use crate::error::{Error, Result};

/// Hue buckets treated as the yellow-green cast the network tends to produce.
pub const CAST_HUE_RANGE: RangeInclusive<u8> = 20..=75;

/// Hue buckets subtracted from cast pixels.
pub const CAST_HUE_SHIFT: u8 = 5;

/// Saturation multiplier applied to cast pixels.
pub const CAST_SATURATION_SCALE: f32 = 0.9;

/// Which correction was actually applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionPath {
    /// a/b statistics were matched to the reference image.
    Reference,
    /// The yellow-green heuristic ran, either by request or as a fallback.
    Heuristic,
}

/// A corrected image tagged with the path that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corrected {
    pub image: RgbImage,
    pub path: CorrectionPath,
}

/// Correct colors, preferring statistical transfer when a reference is given.
///
/// A reference that cannot be used is not an error: the heuristic runs
/// instead and the result is tagged [`CorrectionPath::Heuristic`].
#[must_use]
pub fn correct_colors(image: &RgbImage, reference: Option<&RgbImage>) -> Corrected {
    if let Some(reference) = reference {
        match transfer_statistics(image, reference) {
            Ok(image) => {
                return Corrected {
                    image,
                    path: CorrectionPath::Reference,
                }
            }
            Err(err) => {
                tracing::warn!(
                    "Color correction with reference failed: {err}. Using auto-correction"
                );
            }
        }
    }

    Corrected {
        image: auto_correct(image),
        path: CorrectionPath::Heuristic,
    }
}

/// Population mean and standard deviation of one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ChannelStats {
    mean: f64,
    std: f64,
}

impl ChannelStats {
    #[allow(clippy::cast_precision_loss)]
    fn of(values: &[u8]) -> Self {
        let n = values.len() as f64;
        let mean = values.iter().map(|&v| f64::from(v)).sum::<f64>() / n;
        let variance = values
            .iter()
            .map(|&v| (f64::from(v) - mean).powi(2))
            .sum::<f64>()
            / n;
        Self {
            mean,
            std: variance.sqrt(),
        }
    }

    /// The standard deviation, with zero replaced by 1.0 so it can divide.
    fn divisor(&self) -> f64 {
        if self.std.abs() < f64::EPSILON {
            tracing::debug!("Zero standard deviation in target chroma, substituting 1.0");
            1.0
        } else {
            self.std
        }
    }

    fn is_finite(&self) -> bool {
        self.mean.is_finite() && self.std.is_finite()
    }
}

/// Match the a/b mean and spread of `image` to those of `reference`.
///
/// The reference is resized to the target's dimensions first. Lightness is
/// left untouched.
///
/// # Errors
///
/// Returns an error if either image is empty or the statistics are not finite.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn transfer_statistics(image: &RgbImage, reference: &RgbImage) -> Result<RgbImage> {
    let (width, height) = image.dimensions();
    for (name, (w, h)) in [("image", (width, height)), ("reference", reference.dimensions())] {
        if w == 0 || h == 0 {
            return Err(Error::ShapeMismatch {
                expected: format!("non-empty {name}"),
                actual: format!("{w}x{h}"),
            });
        }
    }

    let resized;
    let reference = if reference.dimensions() == (width, height) {
        reference
    } else {
        resized = image::imageops::resize(reference, width, height, FilterType::Triangle);
        &resized
    };

    let source = Lab8Planes::from_rgb(reference);
    let mut target = Lab8Planes::from_rgb(image);

    for (target_plane, source_plane, name) in [
        (&mut target.a, &source.a, "a"),
        (&mut target.b, &source.b, "b"),
    ] {
        let from = ChannelStats::of(target_plane.as_slice());
        let to = ChannelStats::of(source_plane);
        if !(from.is_finite() && to.is_finite()) {
            return Err(Error::InvalidParameter {
                name: format!("{name} statistics"),
                reason: "not finite".to_string(),
            });
        }

        let scale = to.std / from.divisor();
        for v in target_plane.iter_mut() {
            let mapped = (f64::from(*v) - from.mean).mul_add(scale, to.mean);
            // Safe: clamped to [0, 255] before casting
            *v = mapped.clamp(0.0, 255.0) as u8;
        }
    }

    Ok(target.to_rgb())
}

/// Pull hue out of the yellow-green band and desaturate it slightly.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn auto_correct(image: &RgbImage) -> RgbImage {
    let mut hsv = Hsv8Planes::from_rgb(image);

    for (h, s) in hsv.h.iter_mut().zip(hsv.s.iter_mut()) {
        if CAST_HUE_RANGE.contains(&*h) {
            *h = (*h).saturating_sub(CAST_HUE_SHIFT).min(HUE_BUCKETS - 1);
            // Safe: clamped to [0, 255] before casting
            *s = (f32::from(*s) * CAST_SATURATION_SCALE).clamp(0.0, 255.0) as u8;
        }
    }

    hsv.to_rgb()
}
