//! Colorization and post-processing pipeline.

mod chain;
mod colorize;
mod config;
mod correction;
mod detail;
mod hue_saturation;
mod intensity;
mod stage;

pub use chain::Pipeline;
pub use colorize::colorize;
pub use config::Config;
pub use correction::{
    auto_correct, correct_colors, transfer_statistics, Corrected, CorrectionPath,
    CAST_HUE_RANGE, CAST_HUE_SHIFT, CAST_SATURATION_SCALE,
};
pub use detail::enhance_details;
pub use hue_saturation::adjust_hue_saturation;
pub use intensity::adjust_intensity;
pub use stage::{
    default_stages, ColorCorrectionStage, ColorizeStage, DetailStage, HueSaturationStage,
    IntensityStage, Stage,
};
