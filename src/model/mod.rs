//! Network loading: artifacts, the inference trunk, and the bound chroma head.

mod artifacts;
mod cache;
mod engine;
mod graph;
mod head;
mod loader;
mod network;

pub use artifacts::{ModelArtifacts, ModelDirectory, ModelVariant, CLUSTER_TABLE_FILENAME};
pub use cache::EngineCache;
pub use engine::{ColorizationEngine, LIGHTNESS_MEAN, NETWORK_INPUT_SIZE};
pub use graph::{external_data_locations, verify_weights_reference};
pub use head::{
    ChromaHead, CLASSIFICATION_LAYER, NUM_CLUSTERS, REBALANCE_BIAS, REBALANCE_LAYER,
};
pub use loader::{load_cluster_table, load_engine, verify_artifacts};
pub use network::{LogitNetwork, OnnxNetwork};
