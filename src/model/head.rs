//! Classification head that turns cluster logits into ab chroma.

use ndarray::{s, Array2, Array4};

use crate::error::{Error, Result};

/// Number of quantized ab color clusters the network predicts over.
pub const NUM_CLUSTERS: usize = 313;

/// Annealing factor applied uniformly to every cluster logit (1 / 0.38).
pub const REBALANCE_BIAS: f32 = 2.606;

/// Layer whose weight is the cluster-center table.
pub const CLASSIFICATION_LAYER: &str = "class8_ab";

/// Layer whose weight is the rebalancing bias.
pub const REBALANCE_LAYER: &str = "conv8_313_rh";

/// The rebalancing and classification layers with their bound weights.
///
/// The network trunk ends at 313 raw cluster logits. This head scales them by
/// the rebalancing weight, takes a softmax across clusters, and projects the
/// resulting distribution onto the cluster centers (a 1x1 convolution), giving
/// the annealed-mean a and b planes.
#[derive(Debug, Clone, PartialEq)]
pub struct ChromaHead {
    /// `class8_ab` weight, shape (2, 313, 1, 1).
    cluster_centers: Array4<f32>,
    /// `conv8_313_rh` weight, shape (1, 313).
    rebalance: Array2<f32>,
}

impl ChromaHead {
    /// Bind a 313x2 cluster-center table and the constant rebalancing bias.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the table is not 313x2.
    pub fn from_cluster_table(table: &Array2<f32>) -> Result<Self> {
        if table.dim() != (NUM_CLUSTERS, 2) {
            return Err(Error::ShapeMismatch {
                expected: format!("({NUM_CLUSTERS}, 2) cluster table"),
                actual: format!("{:?}", table.dim()),
            });
        }

        // (313, 2) -> (2, 313, 1, 1)
        let cluster_centers =
            Array4::from_shape_fn((2, NUM_CLUSTERS, 1, 1), |(c, k, _, _)| table[[k, c]]);

        tracing::debug!("Bound {NUM_CLUSTERS} cluster centers to {CLASSIFICATION_LAYER}");
        tracing::debug!("Bound rebalancing bias {REBALANCE_BIAS} to {REBALANCE_LAYER}");

        Ok(Self {
            cluster_centers,
            rebalance: Array2::from_elem((1, NUM_CLUSTERS), REBALANCE_BIAS),
        })
    }

    /// The bound `class8_ab` weight.
    #[must_use]
    pub const fn cluster_centers(&self) -> &Array4<f32> {
        &self.cluster_centers
    }

    /// The bound `conv8_313_rh` weight.
    #[must_use]
    pub const fn rebalance(&self) -> &Array2<f32> {
        &self.rebalance
    }

    /// Map (N, 313, H, W) logits to (N, 2, H, W) ab chroma.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the channel axis is not 313 wide.
    pub fn apply(&self, logits: &Array4<f32>) -> Result<Array4<f32>> {
        let (batch, channels, height, width) = logits.dim();
        if channels != NUM_CLUSTERS {
            return Err(Error::ShapeMismatch {
                expected: format!("{NUM_CLUSTERS} logit channels"),
                actual: format!("{channels} channels"),
            });
        }

        let centers_a = self.cluster_centers.slice(s![0, .., 0, 0]);
        let centers_b = self.cluster_centers.slice(s![1, .., 0, 0]);
        let rebalance = self.rebalance.row(0);

        let mut ab = Array4::<f32>::zeros((batch, 2, height, width));
        let mut weights = vec![0.0_f32; NUM_CLUSTERS];

        for n in 0..batch {
            for y in 0..height {
                for x in 0..width {
                    let lane = logits.slice(s![n, .., y, x]);

                    let mut max = f32::NEG_INFINITY;
                    let scaled = lane.iter().zip(rebalance.iter());
                    for (w, (&logit, &scale)) in weights.iter_mut().zip(scaled) {
                        *w = logit * scale;
                        max = max.max(*w);
                    }

                    let mut total = 0.0;
                    for w in &mut weights {
                        *w = (*w - max).exp();
                        total += *w;
                    }

                    let (mut a, mut b) = (0.0, 0.0);
                    let centers = centers_a.iter().zip(centers_b.iter());
                    for (&w, (&ca, &cb)) in weights.iter().zip(centers) {
                        a += w * ca;
                        b += w * cb;
                    }

                    ab[[n, 0, y, x]] = a / total;
                    ab[[n, 1, y, x]] = b / total;
                }
            }
        }

        Ok(ab)
    }
}
