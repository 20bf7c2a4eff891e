//! The transform stages a pipeline is built from.

use std::sync::Arc;

use image::RgbImage;

use crate::error::Result;
use crate::model::ColorizationEngine;

use super::colorize::colorize;
use super::config::Config;
use super::correction::correct_colors;
use super::detail::enhance_details;
use super::hue_saturation::adjust_hue_saturation;
use super::intensity::adjust_intensity;

/// One buffer-to-buffer step of the pipeline.
///
/// Stages must return an image with the same dimensions they were given.
pub trait Stage: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Whether the stage should run under `config`.
    fn is_enabled(&self, config: &Config) -> bool;

    /// Transform the image.
    ///
    /// # Errors
    ///
    /// Returns an error if the stage cannot produce an output.
    fn transform(&self, image: RgbImage, config: &Config) -> Result<RgbImage>;
}

/// Predicts chroma with the network and merges it with the input lightness.
#[derive(Debug, Clone)]
pub struct ColorizeStage {
    engine: Arc<ColorizationEngine>,
}

impl ColorizeStage {
    #[must_use]
    pub fn new(engine: Arc<ColorizationEngine>) -> Self {
        Self { engine }
    }
}

impl Stage for ColorizeStage {
    fn name(&self) -> &'static str {
        "colorize"
    }

    fn is_enabled(&self, _config: &Config) -> bool {
        true
    }

    fn transform(&self, image: RgbImage, _config: &Config) -> Result<RgbImage> {
        colorize(&image, &self.engine)
    }
}

/// Reference-based color transfer, or the cast heuristic without a reference.
#[derive(Debug, Clone, Default)]
pub struct ColorCorrectionStage {
    reference: Option<RgbImage>,
}

impl ColorCorrectionStage {
    #[must_use]
    pub const fn new(reference: Option<RgbImage>) -> Self {
        Self { reference }
    }

    /// The reference image, if one was given.
    #[must_use]
    pub const fn reference(&self) -> Option<&RgbImage> {
        self.reference.as_ref()
    }
}

impl Stage for ColorCorrectionStage {
    fn name(&self) -> &'static str {
        "color-correction"
    }

    fn is_enabled(&self, config: &Config) -> bool {
        config.auto_color_correct || self.reference.is_some()
    }

    fn transform(&self, image: RgbImage, _config: &Config) -> Result<RgbImage> {
        let corrected = correct_colors(&image, self.reference.as_ref());
        tracing::debug!("Color correction path: {:?}", corrected.path);
        Ok(corrected.image)
    }
}

/// Unsharp masking on lightness.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetailStage;

impl Stage for DetailStage {
    fn name(&self) -> &'static str {
        "detail"
    }

    fn is_enabled(&self, config: &Config) -> bool {
        config.enhances_details()
    }

    fn transform(&self, image: RgbImage, config: &Config) -> Result<RgbImage> {
        Ok(enhance_details(&image, config.detail_enhancement))
    }
}

/// Uniform brightness scaling.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntensityStage;

impl Stage for IntensityStage {
    fn name(&self) -> &'static str {
        "intensity"
    }

    fn is_enabled(&self, config: &Config) -> bool {
        config.scales_intensity()
    }

    fn transform(&self, image: RgbImage, config: &Config) -> Result<RgbImage> {
        Ok(adjust_intensity(&image, config.intensity))
    }
}

/// Hue rotation and saturation scaling.
#[derive(Debug, Clone, Copy, Default)]
pub struct HueSaturationStage;

impl Stage for HueSaturationStage {
    fn name(&self) -> &'static str {
        "hue-saturation"
    }

    fn is_enabled(&self, config: &Config) -> bool {
        config.adjusts_hue_saturation()
    }

    fn transform(&self, image: RgbImage, config: &Config) -> Result<RgbImage> {
        Ok(adjust_hue_saturation(
            &image,
            config.hue_shift,
            config.saturation_scale,
        ))
    }
}

/// The standard stage order: colorize, correct, sharpen, scale, remap.
#[must_use]
pub fn default_stages(
    engine: Arc<ColorizationEngine>,
    reference: Option<RgbImage>,
) -> Vec<Box<dyn Stage>> {
    vec![
        Box::new(ColorizeStage::new(engine)),
        Box::new(ColorCorrectionStage::new(reference)),
        Box::new(DetailStage),
        Box::new(IntensityStage),
        Box::new(HueSaturationStage),
    ]
}
