//! Network artifact verification and engine construction.

use std::path::Path;

use ndarray::Array2;
use ndarray_npy::read_npy;

use crate::error::{Error, Result};

use super::artifacts::ModelArtifacts;
use super::engine::ColorizationEngine;
use super::graph::verify_weights_reference;
use super::head::{ChromaHead, NUM_CLUSTERS};
use super::network::OnnxNetwork;

/// Check that every artifact exists and that the weights sit where the
/// topology will look for them.
///
/// # Errors
///
/// Returns [`Error::ArtifactNotFound`] naming the first missing path, or
/// [`Error::WeightsNotColocated`].
pub fn verify_artifacts(artifacts: &ModelArtifacts) -> Result<()> {
    if let Some(missing) = artifacts.paths().find(|path| !path.exists()) {
        return Err(Error::ArtifactNotFound {
            path: missing.to_path_buf(),
        });
    }

    if artifacts.weights.parent() != artifacts.topology.parent() {
        return Err(Error::WeightsNotColocated {
            weights: artifacts.weights.clone(),
            topology: artifacts.topology.clone(),
        });
    }

    Ok(())
}

/// Read a 313x2 cluster-center table from a `.npy` file.
///
/// `f32`, `f64` and `i64` tables are accepted and converted to `f32`.
///
/// # Errors
///
/// Returns [`Error::ClusterTable`] if the file cannot be parsed or has the
/// wrong shape.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn load_cluster_table(path: &Path) -> Result<Array2<f32>> {
    let table = read_npy::<_, Array2<f32>>(path)
        .or_else(|_| read_npy::<_, Array2<f64>>(path).map(|t| t.mapv(|v| v as f32)))
        .or_else(|_| read_npy::<_, Array2<i64>>(path).map(|t| t.mapv(|v| v as f32)))
        .map_err(|err| Error::ClusterTable {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

    if table.dim() != (NUM_CLUSTERS, 2) {
        return Err(Error::ClusterTable {
            path: path.to_path_buf(),
            reason: format!("expected shape ({NUM_CLUSTERS}, 2), got {:?}", table.dim()),
        });
    }

    Ok(table)
}

/// Load a colorization engine from its three artifacts.
///
/// The topology must read its external data from exactly the given weights
/// file. The cluster-center table is bound to the classification layer and the
/// constant rebalancing bias to the rebalancing layer. Nothing is returned
/// unless every step succeeds.
///
/// # Errors
///
/// Returns an error if an artifact is missing, the cluster table is invalid,
/// the topology references other weights, or the network cannot be loaded.
pub fn load_engine(artifacts: &ModelArtifacts) -> Result<ColorizationEngine> {
    verify_artifacts(artifacts)?;

    tracing::info!("Loading cluster centers from {}", artifacts.cluster_centers.display());
    let table = load_cluster_table(&artifacts.cluster_centers)?;
    let head = ChromaHead::from_cluster_table(&table)?;

    verify_weights_reference(artifacts)?;

    tracing::info!("Loading network from {}", artifacts.topology.display());
    let network = OnnxNetwork::from_file(&artifacts.topology)?;

    tracing::info!("Engine ready ({})", network.name());
    Ok(ColorizationEngine::new(Box::new(network), head))
}
