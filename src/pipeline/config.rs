//! Per-invocation pipeline parameters.

use crate::error::{Error, Result};
use crate::model::ModelVariant;

/// Parameters for one run of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Which colorization network to use.
    pub model: ModelVariant,

    /// Unsharp-mask amount (0.0-1.0). Values above 1.0 are clamped by the stage.
    pub detail_enhancement: f32,

    /// Multiplier applied to every RGB sample.
    pub intensity: f32,

    /// Hue rotation in half-degree buckets. Applied modulo 180.
    pub hue_shift: i32,

    /// Multiplier applied to HSV saturation.
    pub saturation_scale: f32,

    /// Run the yellow-green correction heuristic after colorization.
    pub auto_color_correct: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelVariant::Standard,
            detail_enhancement: 0.25,
            intensity: 1.0,
            hue_shift: 0,
            saturation_scale: 1.0,
            auto_color_correct: false,
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a scalar parameter is negative or not finite.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("detail_enhancement", self.detail_enhancement),
            ("intensity", self.intensity),
            ("saturation_scale", self.saturation_scale),
        ] {
            if !value.is_finite() {
                return Err(Error::InvalidParameter {
                    name: name.to_string(),
                    reason: "must be finite".to_string(),
                });
            }
            if value < 0.0 {
                return Err(Error::InvalidParameter {
                    name: name.to_string(),
                    reason: "must not be negative".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Whether the detail stage has any effect.
    #[must_use]
    pub fn enhances_details(&self) -> bool {
        self.detail_enhancement > 0.0
    }

    /// Whether the intensity stage has any effect.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn scales_intensity(&self) -> bool {
        self.intensity != 1.0
    }

    /// Whether the hue/saturation stage has any effect.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn adjusts_hue_saturation(&self) -> bool {
        self.hue_shift != 0 || self.saturation_scale != 1.0
    }
}
