//! Pixel buffer ingest, loading, resizing, and saving utilities.

mod load;
mod save;

pub use load::{buffer_from_raw, load_image, resize_to_max_dim};
pub use save::save_image;

/// Number of channels in RGB pixel buffers.
pub const RGB_CHANNELS: usize = 3;
