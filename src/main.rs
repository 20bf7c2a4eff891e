//! `recolor` CLI - Colorize grayscale photographs.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recolor::image::{load_image, resize_to_max_dim, save_image};
use recolor::model::{EngineCache, ModelDirectory, ModelVariant};
use recolor::{Config, Pipeline};

/// Colorize a photograph and optionally post-process the result.
#[derive(Parser, Debug)]
#[command(name = "recolor")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input image path.
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output image path. The format follows the extension.
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Model variant: "standard" (vivid) or "artistic" (muted).
    #[arg(short, long, default_value = "standard", value_name = "NAME")]
    model: String,

    /// Directory holding the network artifacts. Defaults to the platform data directory.
    #[arg(long, value_name = "DIR")]
    model_dir: Option<PathBuf>,

    /// Detail enhancement amount (0.0-1.0).
    #[arg(short, long, default_value = "0.25", value_name = "FLOAT")]
    detail: f32,

    /// Intensity multiplier.
    #[arg(short, long, default_value = "1.0", value_name = "FLOAT")]
    intensity: f32,

    /// Hue shift in half-degree steps. Wraps modulo 180.
    #[arg(long, default_value = "0", value_name = "INT", allow_hyphen_values = true)]
    hue_shift: i32,

    /// Saturation multiplier.
    #[arg(short, long, default_value = "1.0", value_name = "FLOAT")]
    saturation: f32,

    /// Reduce the yellow-green cast the network tends to produce.
    #[arg(long)]
    auto_correct: bool,

    /// Match output colors to this reference image.
    #[arg(long, value_name = "PATH")]
    reference: Option<PathBuf>,

    /// Downscale so the longest side is at most this many pixels before colorizing.
    #[arg(long, value_name = "INT")]
    max_dim: Option<u32>,

    /// Output JPEG quality (1-100).
    #[arg(short, long, default_value = "95", value_name = "INT")]
    quality: u8,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("recolor={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(err) = run(&args) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(args: &Args) -> Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file does not exist: {}", args.input.display());
    }
    if !(1..=100).contains(&args.quality) {
        anyhow::bail!("Quality must be between 1 and 100, got {}", args.quality);
    }

    let config = Config {
        model: ModelVariant::from_key(&args.model),
        detail_enhancement: args.detail,
        intensity: args.intensity,
        hue_shift: args.hue_shift,
        saturation_scale: args.saturation,
        auto_color_correct: args.auto_correct,
    };

    let mut input = load_image(&args.input).context("Failed to load input image")?;
    if let Some(max_dim) = args.max_dim {
        input = resize_to_max_dim(&input, max_dim);
    }

    let reference = args
        .reference
        .as_ref()
        .map(|path| load_image(path).context("Failed to load reference image"))
        .transpose()?;

    let models = args
        .model_dir
        .clone()
        .map_or_else(ModelDirectory::default_location, ModelDirectory::new);
    let cache = EngineCache::new();

    let pipeline = Pipeline::load(config, &models, &cache, reference)
        .context("Failed to initialize pipeline")?;

    let output = pipeline.run(input).context("Failed to process image")?;
    save_image(&output, &args.output, args.quality).context("Failed to save output image")?;

    println!(
        "Successfully colorized {} -> {}",
        args.input.display(),
        args.output.display()
    );

    Ok(())
}
