//! End-to-end pipeline runs with a stub network trunk.

use std::fs;
use std::sync::Arc;

use image::{Rgb, RgbImage};
use ndarray::{Array2, Array4};

use recolor::color::Lab8Planes;
use recolor::image::{load_image, save_image};
use recolor::model::{
    ChromaHead, ColorizationEngine, EngineCache, LogitNetwork, ModelDirectory, ModelVariant,
    CLUSTER_TABLE_FILENAME, NUM_CLUSTERS,
};
use recolor::pipeline::{ColorizeStage, IntensityStage};
use recolor::{Config, Error, Pipeline, Result, Stage};

/// Uniform logits at the network's native 56x56 output resolution.
struct Uniform;

impl LogitNetwork for Uniform {
    fn forward(&self, lightness: &Array4<f32>) -> Result<Array4<f32>> {
        assert_eq!(lightness.shape(), &[1, 1, 224, 224]);
        Ok(Array4::zeros((1, NUM_CLUSTERS, 56, 56)))
    }
}

fn neutral_engine() -> Arc<ColorizationEngine> {
    let head = ChromaHead::from_cluster_table(&Array2::zeros((NUM_CLUSTERS, 2))).unwrap();
    Arc::new(ColorizationEngine::new(Box::new(Uniform), head))
}

#[test]
fn gray_image_end_to_end() {
    let config = Config {
        detail_enhancement: 0.0,
        ..Config::default()
    };
    let pipeline = Pipeline::new(neutral_engine(), config).unwrap();
    assert_eq!(pipeline.enabled_stage_names(), ["colorize"]);
    let input = RgbImage::from_pixel(100, 100, Rgb([128, 128, 128]));

    let output = pipeline.run(input.clone()).unwrap();

    assert_eq!(output.dimensions(), (100, 100));
    for px in output.pixels() {
        assert!(px.0.iter().all(|&v| v.abs_diff(128) <= 1), "{px:?}");
    }
    let before = Lab8Planes::from_rgb(&input);
    let after = Lab8Planes::from_rgb(&output);
    for (l_in, l_out) in before.l.iter().zip(&after.l) {
        assert!(l_in.abs_diff(*l_out) <= 1, "lightness {l_in} -> {l_out}");
    }
}

#[test]
fn intensity_clips_after_colorization() {
    let config = Config {
        intensity: 2.0,
        ..Config::default()
    };
    let pipeline = Pipeline::new(neutral_engine(), config).unwrap();

    let output = pipeline
        .run(RgbImage::from_pixel(20, 12, Rgb([200, 200, 200])))
        .unwrap();

    assert!(output.as_raw().iter().all(|&v| v == 255));
}

#[test]
fn every_stage_preserves_dimensions() {
    let config = Config {
        detail_enhancement: 1.0,
        intensity: 0.7,
        hue_shift: -45,
        saturation_scale: 1.8,
        auto_color_correct: true,
        ..Config::default()
    };
    let reference = RgbImage::from_fn(31, 17, |x, y| Rgb([x as u8 * 8, 90, y as u8 * 15]));
    let pipeline = Pipeline::with_reference(neutral_engine(), config, reference).unwrap();
    assert_eq!(pipeline.enabled_stage_names().len(), 5);

    let input = RgbImage::from_fn(63, 41, |x, y| Rgb([(x * 4) as u8, (y * 6) as u8, 100]));
    let output = pipeline.run(input).unwrap();

    assert_eq!(output.dimensions(), (63, 41));
}

#[test]
fn default_stage_order() {
    let pipeline = Pipeline::new(neutral_engine(), Config::default()).unwrap();

    assert_eq!(
        pipeline.stage_names(),
        ["colorize", "color-correction", "detail", "intensity", "hue-saturation"]
    );
    assert_eq!(pipeline.enabled_stage_names(), ["colorize", "detail"]);
}

#[test]
fn stages_can_be_reordered() {
    let config = Config {
        intensity: 0.5,
        detail_enhancement: 0.0,
        ..Config::default()
    };
    let stages: Vec<Box<dyn Stage>> = vec![
        Box::new(IntensityStage),
        Box::new(ColorizeStage::new(neutral_engine())),
    ];
    let pipeline = Pipeline::from_stages(config, stages).unwrap();

    let output = pipeline
        .run(RgbImage::from_pixel(8, 8, Rgb([200, 200, 200])))
        .unwrap();

    assert_eq!(pipeline.stage_names(), ["intensity", "colorize"]);
    assert!(output.pixels().all(|px| px.0.iter().all(|&v| v.abs_diff(100) <= 1)));
}

#[test]
fn engine_is_shared_between_pipelines() {
    let engine = neutral_engine();
    let first = Pipeline::new(Arc::clone(&engine), Config::default()).unwrap();
    let second = Pipeline::new(Arc::clone(&engine), Config::default()).unwrap();

    let image = RgbImage::from_pixel(16, 16, Rgb([90, 90, 90]));
    assert_eq!(first.run(image.clone()).unwrap(), second.run(image).unwrap());
    assert_eq!(Arc::strong_count(&engine), 3);
}

#[test]
fn missing_weights_reported_by_path() {
    let dir = tempfile::tempdir().unwrap();
    let variant = ModelVariant::Standard;
    fs::write(dir.path().join(variant.topology_filename()), b"stub").unwrap();
    fs::write(dir.path().join(CLUSTER_TABLE_FILENAME), b"stub").unwrap();

    let models = ModelDirectory::new(dir.path());
    let cache = EngineCache::new();
    let err = Pipeline::load(Config::default(), &models, &cache, None).unwrap_err();

    match err {
        Error::ArtifactNotFound { path } => {
            assert_eq!(path, dir.path().join(variant.weights_filename()));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(cache.is_empty());
}

#[test]
fn invalid_config_rejected_before_loading() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        saturation_scale: -1.0,
        ..Config::default()
    };

    let err = Pipeline::load(config, &ModelDirectory::new(dir.path()), &EngineCache::new(), None)
        .unwrap_err();

    assert!(matches!(err, Error::InvalidParameter { .. }));
}

#[test]
fn process_round_trips_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("gray.png");
    let output_path = dir.path().join("color.png");
    save_image(
        &RgbImage::from_pixel(48, 30, Rgb([100, 100, 100])),
        &input_path,
        95,
    )
    .unwrap();

    let pipeline = Pipeline::new(neutral_engine(), Config::default()).unwrap();
    pipeline.process(&input_path, &output_path, 95).unwrap();

    assert!(output_path.exists());
    let output = load_image(&output_path).unwrap();
    assert_eq!(output.dimensions(), (48, 30));
}

#[test]
fn process_reports_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("out.png");
    let pipeline = Pipeline::new(neutral_engine(), Config::default()).unwrap();

    let err = pipeline
        .process(dir.path().join("absent.png"), &output_path, 95)
        .unwrap_err();

    assert!(matches!(err, Error::ImageLoad { .. }));
    assert!(!output_path.exists());
}
