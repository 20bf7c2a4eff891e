//! Network trunk: centered lightness in, cluster logits out.

use std::path::Path;
use std::sync::Mutex;

use ndarray::Array4;
use ort::session::Session;
use ort::value::Tensor;

use crate::error::{Error, Result};

/// A feed-forward network mapping a (1, 1, H, W) centered lightness tensor to
/// (1, 313, h, w) cluster logits.
pub trait LogitNetwork: Send + Sync {
    /// Run one forward pass.
    ///
    /// # Errors
    ///
    /// Returns an error if inference fails or produces a malformed tensor.
    fn forward(&self, lightness: &Array4<f32>) -> Result<Array4<f32>>;
}

/// ONNX Runtime session over the colorization trunk.
pub struct OnnxNetwork {
    name: String,
    session: Mutex<Session>,
}

impl OnnxNetwork {
    /// Build a session from an ONNX graph; its external weights are resolved
    /// relative to the graph's directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelLoad`] if the graph or its weights cannot be parsed.
    pub fn from_file(topology: &Path) -> Result<Self> {
        let name = topology
            .file_name()
            .map_or_else(|| topology.display().to_string(), |n| n.to_string_lossy().into_owned());

        let session = Session::builder()
            .map_err(|source| Error::ModelLoad {
                name: name.clone(),
                source,
            })?
            .commit_from_file(topology)
            .map_err(|source| Error::ModelLoad {
                name: name.clone(),
                source,
            })?;

        Ok(Self {
            name,
            session: Mutex::new(session),
        })
    }

    /// The graph file name this session was built from.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl LogitNetwork for OnnxNetwork {
    fn forward(&self, lightness: &Array4<f32>) -> Result<Array4<f32>> {
        let input_value =
            Tensor::from_array(lightness.clone()).map_err(|source| Error::Inference { source })?;

        let mut session = self.session.lock().map_err(|_| Error::EnginePoisoned)?;

        let outputs = session
            .run(ort::inputs![input_value])
            .map_err(|source| Error::Inference { source })?;

        // Get first output
        let output = outputs
            .values()
            .next()
            .ok_or_else(|| Error::ShapeMismatch {
                expected: "cluster logits output".to_string(),
                actual: "no output".to_string(),
            })?;

        extract_array4(&output)
    }
}

/// Extract a 4D array from an ONNX value.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn extract_array4(value: &ort::value::ValueRef<'_>) -> Result<Array4<f32>> {
    let (shape_info, data) = value
        .try_extract_tensor::<f32>()
        .map_err(|source| Error::Inference { source })?;

    // Safe: tensor dimensions are always non-negative and within bounds
    let dims: Vec<usize> = shape_info.iter().map(|&x| x as usize).collect();

    if dims.len() != 4 {
        return Err(Error::ShapeMismatch {
            expected: "4D tensor".to_string(),
            actual: format!("{}D tensor", dims.len()),
        });
    }

    Array4::from_shape_vec((dims[0], dims[1], dims[2], dims[3]), data.to_vec()).map_err(|_| {
        Error::ShapeMismatch {
            expected: format!("{dims:?}"),
            actual: "reshape failed".to_string(),
        }
    })
}
