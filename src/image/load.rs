//! Image loading and ingest utilities.

use std::path::Path;

use image::{imageops::FilterType, RgbImage};

use crate::error::{Error, Result};

use super::RGB_CHANNELS;

/// Load an image from disk as an 8-bit RGB pixel buffer.
///
/// Any format the `image` crate decodes is accepted; grayscale and alpha
/// images are converted to three channels.
///
/// # Errors
///
/// Returns an error if the image cannot be opened or decoded.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<RgbImage> {
    let path = path.as_ref();

    let img = image::open(path).map_err(|source| Error::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(
        "Loaded {} ({}x{}, {:?})",
        path.display(),
        img.width(),
        img.height(),
        img.color()
    );

    Ok(img.to_rgb8())
}

/// Wrap a raw interleaved buffer as an RGB pixel buffer.
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] if `channels` is not 3 or the data length
/// does not equal `width * height * channels`.
pub fn buffer_from_raw(width: u32, height: u32, channels: usize, data: Vec<u8>) -> Result<RgbImage> {
    if channels != RGB_CHANNELS {
        return Err(Error::ShapeMismatch {
            expected: format!("{RGB_CHANNELS} channels"),
            actual: format!("{channels} channels"),
        });
    }

    let expected = width as usize * height as usize * RGB_CHANNELS;
    if data.len() != expected {
        return Err(Error::ShapeMismatch {
            expected: format!("{expected} bytes ({width}x{height}x{RGB_CHANNELS})"),
            actual: format!("{} bytes", data.len()),
        });
    }

    RgbImage::from_raw(width, height, data).ok_or_else(|| Error::ShapeMismatch {
        expected: format!("{width}x{height}x{RGB_CHANNELS}"),
        actual: "buffer rejected".to_string(),
    })
}

/// Downscale an image so its longest side is at most `max_dim`.
///
/// Aspect ratio is preserved and images already within bounds are returned
/// as-is. A degenerate target size skips the resize.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn resize_to_max_dim(image: &RgbImage, max_dim: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    let longest = width.max(height);

    if longest <= max_dim {
        return image.clone();
    }

    let scale = max_dim as f32 / longest as f32;
    // Safe: scale < 1, so both results fit in u32
    let new_width = (width as f32 * scale) as u32;
    let new_height = (height as f32 * scale) as u32;

    if new_width == 0 || new_height == 0 {
        tracing::warn!(
            "Invalid resize dimensions ({new_width}, {new_height}) for {width}x{height} image, skipping resize"
        );
        return image.clone();
    }

    image::imageops::resize(image, new_width, new_height, FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_buffer_from_raw_accepts_rgb() {
        let buffer = buffer_from_raw(2, 3, 3, vec![7; 18]).unwrap();
        assert_eq!(buffer.dimensions(), (2, 3));
        assert_eq!(buffer.get_pixel(1, 2), &Rgb([7, 7, 7]));
    }

    #[test]
    fn test_buffer_from_raw_rejects_rgba() {
        let err = buffer_from_raw(2, 2, 4, vec![0; 16]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_buffer_from_raw_rejects_short_data() {
        let err = buffer_from_raw(4, 4, 3, vec![0; 10]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_resize_keeps_small_images() {
        let img = RgbImage::new(100, 40);
        assert_eq!(resize_to_max_dim(&img, 512).dimensions(), (100, 40));
    }

    #[test]
    fn test_resize_preserves_aspect() {
        let img = RgbImage::new(1024, 256);
        assert_eq!(resize_to_max_dim(&img, 512).dimensions(), (512, 128));
    }

    #[test]
    fn test_resize_skips_degenerate_target() {
        let img = RgbImage::new(2000, 1);
        assert_eq!(resize_to_max_dim(&img, 512).dimensions(), (2000, 1));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_image("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, Error::ImageLoad { .. }));
    }
}
