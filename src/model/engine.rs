//! A network trunk bound to its chroma head.

use ndarray::Array4;

use crate::error::Result;

use super::head::ChromaHead;
use super::network::LogitNetwork;

/// Spatial resolution the network was trained on.
pub const NETWORK_INPUT_SIZE: u32 = 224;

/// Mean lightness subtracted from the network input.
pub const LIGHTNESS_MEAN: f32 = 50.0;

/// A ready-to-run colorization engine.
///
/// Immutable after construction, so one instance can be shared behind an
/// `Arc` by any number of concurrent pipelines.
pub struct ColorizationEngine {
    network: Box<dyn LogitNetwork>,
    head: ChromaHead,
}

impl ColorizationEngine {
    /// Pair a trunk with a bound head.
    #[must_use]
    pub fn new(network: Box<dyn LogitNetwork>, head: ChromaHead) -> Self {
        Self { network, head }
    }

    /// The bound classification and rebalancing layers.
    #[must_use]
    pub const fn head(&self) -> &ChromaHead {
        &self.head
    }

    /// Predict (1, 2, h, w) ab chroma from a (1, 1, 224, 224) centered
    /// lightness tensor.
    ///
    /// # Errors
    ///
    /// Returns an error if inference fails or the logits are malformed.
    pub fn predict_chroma(&self, lightness: &Array4<f32>) -> Result<Array4<f32>> {
        let logits = self.network.forward(lightness)?;
        tracing::debug!("Network produced logits of shape {:?}", logits.shape());
        self.head.apply(&logits)
    }
}

impl std::fmt::Debug for ColorizationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorizationEngine")
            .field("clusters", &self.head.rebalance().len())
            .finish_non_exhaustive()
    }
}
