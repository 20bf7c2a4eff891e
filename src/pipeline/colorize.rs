//! Network colorization of a single image.

use image::{imageops::FilterType, ImageBuffer, Luma, RgbImage};
use ndarray::{s, Array4};

use crate::color::LabPlanes;
use crate::error::{Error, Result};
use crate::model::{ColorizationEngine, LIGHTNESS_MEAN, NETWORK_INPUT_SIZE};

/// Offset and span that map ab chroma into [0, 1] for resampling.
const AB_OFFSET: f32 = 128.0;
const AB_SPAN: f32 = 255.0;

type FloatPlane = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Colorize an RGB image.
///
/// The full-resolution lightness is kept; only the chroma comes from the
/// network, which sees a 224x224 mean-centered lightness map. Its ab output
/// is upsampled with Catmull-Rom interpolation back to the input size.
///
/// # Errors
///
/// Returns an error if the image is empty or inference fails.
pub fn colorize(image: &RgbImage, engine: &ColorizationEngine) -> Result<RgbImage> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::ShapeMismatch {
            expected: "positive width and height".to_string(),
            actual: format!("{width}x{height}"),
        });
    }

    let lab = LabPlanes::from_rgb(image);
    let input = network_input(&lab)?;

    let ab = engine.predict_chroma(&input)?;
    let (_, channels, ab_height, ab_width) = ab.dim();
    if channels != 2 {
        return Err(Error::ShapeMismatch {
            expected: "2 chroma channels".to_string(),
            actual: format!("{channels} channels"),
        });
    }
    tracing::debug!("Upsampling {ab_width}x{ab_height} chroma to {width}x{height}");

    let upsample = |channel: usize| {
        let encoded: Vec<f32> = ab
            .slice(s![0, channel, .., ..])
            .iter()
            .map(|v| (v + AB_OFFSET) / AB_SPAN)
            .collect();
        let plane = resample(
            encoded,
            ab_width,
            ab_height,
            width,
            height,
            FilterType::CatmullRom,
        )?;
        Ok::<Vec<f32>, Error>(
            plane
                .into_iter()
                .map(|v| v.mul_add(AB_SPAN, -AB_OFFSET))
                .collect(),
        )
    };

    let colorized = LabPlanes {
        width,
        height,
        a: upsample(0)?,
        b: upsample(1)?,
        l: lab.l,
    };

    Ok(colorized.to_rgb())
}

/// Build the (1, 1, 224, 224) centered lightness tensor.
fn network_input(lab: &LabPlanes) -> Result<Array4<f32>> {
    let size = NETWORK_INPUT_SIZE as usize;
    let unit: Vec<f32> = lab.l.iter().map(|l| l / 100.0).collect();

    let resized = resample(
        unit,
        lab.width as usize,
        lab.height as usize,
        NETWORK_INPUT_SIZE,
        NETWORK_INPUT_SIZE,
        FilterType::Triangle,
    )?;

    let centered = resized
        .into_iter()
        .map(|v| v.mul_add(100.0, -LIGHTNESS_MEAN))
        .collect();

    Array4::from_shape_vec((1, 1, size, size), centered).map_err(|err| Error::ShapeMismatch {
        expected: format!("(1, 1, {size}, {size})"),
        actual: err.to_string(),
    })
}

/// Resample a unit-range float plane.
///
/// `image` clamps float samples to [0, 1] while filtering, so callers encode
/// their values into that range first.
#[allow(clippy::cast_possible_truncation)]
fn resample(
    plane: Vec<f32>,
    width: usize,
    height: usize,
    new_width: u32,
    new_height: u32,
    filter: FilterType,
) -> Result<Vec<f32>> {
    let len = plane.len();
    // Safe: plane dimensions come from u32 image sizes or tensor shapes
    let plane = FloatPlane::from_raw(width as u32, height as u32, plane).ok_or_else(|| {
        Error::ShapeMismatch {
            expected: format!("{width}x{height} plane"),
            actual: format!("{len} samples"),
        }
    })?;

    if plane.dimensions() == (new_width, new_height) {
        return Ok(plane.into_raw());
    }

    Ok(image::imageops::resize(&plane, new_width, new_height, filter).into_raw())
}
