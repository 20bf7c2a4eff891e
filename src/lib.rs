//! # recolor
//!
//! Automatic colorization of photographs with a pre-trained classification
//! network, followed by optional color correction, detail sharpening,
//! intensity scaling and hue/saturation remapping.
//!
//! The network predicts a distribution over 313 quantized ab chroma bins for
//! each location of a downsampled lightness map. The expected chroma is
//! upsampled and merged with the full-resolution lightness of the input.
//!
//! ## Example
//!
//! ```no_run
//! use recolor::model::{EngineCache, ModelDirectory};
//! use recolor::{Config, Pipeline};
//!
//! # fn main() -> recolor::Result<()> {
//! let cache = EngineCache::new();
//! let models = ModelDirectory::default_location();
//! let pipeline = Pipeline::load(Config::default(), &models, &cache, None)?;
//!
//! pipeline.process("grayscale.jpg", "colorized.jpg", 95)?;
//! # Ok(())
//! # }
//! ```

pub mod color;
pub mod error;
pub mod image;
pub mod model;
pub mod pipeline;

pub use error::{Error, Result};
pub use pipeline::{Config, Pipeline, Stage};
