//! Image saving utilities.

use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};

use crate::error::{Error, Result};

/// Save an RGB pixel buffer to disk.
///
/// The format is inferred from the extension (PNG when there is none). JPEG
/// output honours `quality`. The image is written to a temporary sibling
/// first and renamed into place, so a failed save never leaves a partial file.
///
/// # Errors
///
/// Returns an error if the image cannot be encoded or written.
pub fn save_image<P: AsRef<Path>>(image: &RgbImage, path: P, quality: u8) -> Result<()> {
    let path = path.as_ref();

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("png")
        .to_lowercase();

    let temp_path = temp_sibling(path);
    let written = write_encoded(image, &temp_path, &extension, quality);

    if let Err(err) = written {
        // Best effort: the temporary file may not exist yet
        let _ = fs::remove_file(&temp_path);
        return Err(match err {
            Error::ImageSave { source, .. } => Error::ImageSave {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        });
    }

    fs::rename(&temp_path, path)?;

    tracing::debug!("Saved {}x{} image to {}", image.width(), image.height(), path.display());
    Ok(())
}

fn write_encoded(image: &RgbImage, path: &Path, extension: &str, quality: u8) -> Result<()> {
    let map_err = |source| Error::ImageSave {
        path: path.to_path_buf(),
        source,
    };

    match extension {
        "jpg" | "jpeg" => {
            let mut output = fs::File::create(path)?;
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut output, quality);
            image.write_with_encoder(encoder).map_err(map_err)
        }
        other => {
            let format = ImageFormat::from_extension(other).unwrap_or(ImageFormat::Png);
            image.save_with_format(path, format).map_err(map_err)
        }
    }
}

/// `out.png` -> `.out.png.tmp` in the same directory.
fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "output".to_string(), |n| n.to_string_lossy().into_owned());
    path.with_file_name(format!(".{name}.tmp"))
}
