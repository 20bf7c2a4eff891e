//! An ordered chain of stages run over one image.

use std::path::Path;
use std::sync::Arc;

use image::RgbImage;

use crate::error::{Error, Result};
use crate::image::{load_image, save_image};
use crate::model::{ColorizationEngine, EngineCache, ModelDirectory};

use super::config::Config;
use super::stage::{default_stages, Stage};

/// Colorization followed by the enabled post-processing stages.
pub struct Pipeline {
    config: Config,
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// Create a pipeline with the default stage order.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(engine: Arc<ColorizationEngine>, config: Config) -> Result<Self> {
        Self::from_stages(config, default_stages(engine, None))
    }

    /// Create a pipeline whose color correction matches `reference`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_reference(
        engine: Arc<ColorizationEngine>,
        config: Config,
        reference: RgbImage,
    ) -> Result<Self> {
        Self::from_stages(config, default_stages(engine, Some(reference)))
    }

    /// Create a pipeline from an explicit stage list, run in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn from_stages(config: Config, stages: Vec<Box<dyn Stage>>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, stages })
    }

    /// Resolve the configured model in `models`, load it through `cache` and
    /// build the default pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the engine cannot
    /// be loaded.
    pub fn load(
        mut config: Config,
        models: &ModelDirectory,
        cache: &EngineCache,
        reference: Option<RgbImage>,
    ) -> Result<Self> {
        config.validate()?;

        let (variant, artifacts) = models.artifacts(config.model);
        config.model = variant;
        tracing::info!("Using {} model from {}", variant.key(), models.root().display());

        let engine = cache.get_or_load(&artifacts)?;
        Self::from_stages(config, default_stages(engine, reference))
    }

    /// The parameters this pipeline runs with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Names of all stages, in order, enabled or not.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Names of the stages that will run under the current configuration.
    #[must_use]
    pub fn enabled_stage_names(&self) -> Vec<&'static str> {
        self.stages
            .iter()
            .filter(|stage| stage.is_enabled(&self.config))
            .map(|stage| stage.name())
            .collect()
    }

    /// Thread `image` through every enabled stage.
    ///
    /// # Errors
    ///
    /// Returns an error if a stage fails or changes the image dimensions.
    pub fn run(&self, image: RgbImage) -> Result<RgbImage> {
        let dimensions = image.dimensions();
        let mut image = image;

        for stage in &self.stages {
            if !stage.is_enabled(&self.config) {
                tracing::debug!("Skipping {}", stage.name());
                continue;
            }

            tracing::debug!("Running {}", stage.name());
            image = stage.transform(image, &self.config)?;

            if image.dimensions() != dimensions {
                return Err(Error::ShapeMismatch {
                    expected: format!("{}x{} from {}", dimensions.0, dimensions.1, stage.name()),
                    actual: format!("{}x{}", image.width(), image.height()),
                });
            }
        }

        tracing::info!("Applied stages: {}", self.enabled_stage_names().join(", "));
        Ok(image)
    }

    /// Load an image, run the pipeline and save the result.
    ///
    /// # Errors
    ///
    /// Returns an error if loading, processing or saving fails.
    pub fn process<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
        quality: u8,
    ) -> Result<()> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        tracing::info!("Processing image: {}", input_path.display());
        let input = load_image(input_path)?;

        let output = self.run(input)?;

        tracing::info!("Saving output to: {}", output_path.display());
        save_image(&output, output_path, quality)?;

        tracing::info!("Processing complete");
        Ok(())
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("stages", &self.stage_names())
            .finish()
    }
}
