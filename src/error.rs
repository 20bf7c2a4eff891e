//! Custom error types for recolor.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the recolor library.
#[derive(Error, Debug)]
pub enum Error {
    /// One of the network artifacts does not exist.
    #[error("network artifact not found: {}", path.display())]
    ArtifactNotFound { path: PathBuf },

    /// Failed to build an ONNX session from the topology and weights.
    #[error("failed to load ONNX model {name}: {source}")]
    ModelLoad {
        name: String,
        #[source]
        source: ort::Error,
    },

    /// The weights file is not where the topology expects its external data.
    #[error(
        "weights {} must sit beside topology {}",
        weights.display(),
        topology.display()
    )]
    WeightsNotColocated { weights: PathBuf, topology: PathBuf },

    /// The topology reads its external data from a file other than the weights.
    #[error(
        "topology {} references external data {referenced:?}, expected {}",
        topology.display(),
        weights.display()
    )]
    WeightsMismatch {
        weights: PathBuf,
        topology: PathBuf,
        referenced: Vec<String>,
    },

    /// The cluster-center table could not be read or has the wrong shape.
    #[error("invalid cluster-center table {}: {reason}", path.display())]
    ClusterTable { path: PathBuf, reason: String },

    /// Model inference failed.
    #[error("model inference failed: {source}")]
    Inference {
        #[source]
        source: ort::Error,
    },

    /// A previous inference panicked while holding the session.
    #[error("inference session is poisoned")]
    EnginePoisoned,

    /// Failed to load an image file.
    #[error("failed to load image from {}: {source}", path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Failed to save an image file.
    #[error("failed to save image to {}: {source}", path.display())]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Shape mismatch in a pixel buffer or tensor.
    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },
}

/// Result type alias for recolor operations.
pub type Result<T> = std::result::Result<T, Error>;
