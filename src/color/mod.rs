//! Color-space views over RGB pixel buffers.
//!
//! Every view is transient: stages convert an [`image::RgbImage`] into one of
//! these planar representations, operate on the planes, and convert back to
//! RGB before returning.

mod hsv;
mod lab;

pub use hsv::{hsv_to_pixel, pixel_to_hsv, Hsv8Planes, HUE_BUCKETS};
pub use lab::{lab_to_pixel, pixel_to_lab, Lab8Planes, LabPlanes};

/// Scale a unit-range sample to 8 bits with rounding and clamping.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn quantize_unit(value: f32) -> u8 {
    // Safe: clamped to [0, 255] before casting
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Round and clamp an arbitrary float into the 8-bit range.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn saturate_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
