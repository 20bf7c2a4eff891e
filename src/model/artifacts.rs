//! Network artifact locations and model variants.

use std::path::{Path, PathBuf};

/// File name of the 313-entry cluster-center table shared by all variants.
pub const CLUSTER_TABLE_FILENAME: &str = "pts_in_hull.npy";

/// Trained weight sets that can drive the colorizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModelVariant {
    /// Class-rebalanced weights: more saturated, vivid output.
    #[default]
    Standard,
    /// Weights trained without class rebalancing: muted, conservative output.
    Artistic,
}

impl ModelVariant {
    /// Parse a variant key. Unknown keys select [`ModelVariant::Standard`].
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "artistic" => Self::Artistic,
            "standard" | "" => Self::Standard,
            other => {
                tracing::warn!("Unknown model variant {other:?}, using standard");
                Self::Standard
            }
        }
    }

    /// The string key for this variant.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Artistic => "artistic",
        }
    }

    /// Get the topology (ONNX graph) filename for this variant.
    #[must_use]
    pub const fn topology_filename(&self) -> &'static str {
        match self {
            Self::Standard => "colorization_deploy_v2.onnx",
            Self::Artistic => "colorization_deploy_v2_norebal.onnx",
        }
    }

    /// Get the weights filename for this variant.
    /// Note: Must match the external-data reference inside the ONNX graph.
    #[must_use]
    pub const fn weights_filename(&self) -> &'static str {
        match self {
            Self::Standard => "colorization_release_v2.onnx_data",
            Self::Artistic => "colorization_release_v2_norebal.onnx_data",
        }
    }
}

/// Paths to the three files a colorization engine is built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelArtifacts {
    /// ONNX graph of the network trunk.
    pub topology: PathBuf,
    /// External tensor data referenced by the topology.
    pub weights: PathBuf,
    /// 313x2 `.npy` table of quantized ab cluster centers.
    pub cluster_centers: PathBuf,
}

impl ModelArtifacts {
    /// Group three artifact paths.
    pub fn new(
        topology: impl Into<PathBuf>,
        weights: impl Into<PathBuf>,
        cluster_centers: impl Into<PathBuf>,
    ) -> Self {
        Self {
            topology: topology.into(),
            weights: weights.into(),
            cluster_centers: cluster_centers.into(),
        }
    }

    /// Iterate over all artifact paths in load order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        [
            self.topology.as_path(),
            self.weights.as_path(),
            self.cluster_centers.as_path(),
        ]
        .into_iter()
    }
}

/// A directory holding the artifacts of every model variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDirectory {
    root: PathBuf,
}

impl ModelDirectory {
    /// Use an explicit directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The platform-appropriate default location:
    /// - Windows: `%APPDATA%\recolor\models`
    /// - Linux: `~/.local/share/recolor/models`
    /// - macOS: `~/Library/Application Support/recolor/models`
    #[must_use]
    pub fn default_location() -> Self {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join("recolor").join("models"))
    }

    /// The directory root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn variant_artifacts(&self, variant: ModelVariant) -> ModelArtifacts {
        ModelArtifacts::new(
            self.root.join(variant.topology_filename()),
            self.root.join(variant.weights_filename()),
            self.root.join(CLUSTER_TABLE_FILENAME),
        )
    }

    /// Resolve the artifacts for a variant.
    ///
    /// Falls back to [`ModelVariant::Standard`] when the requested variant's
    /// files are not present. The returned paths are not checked further;
    /// the loader reports anything that is still missing.
    #[must_use]
    pub fn artifacts(&self, variant: ModelVariant) -> (ModelVariant, ModelArtifacts) {
        let artifacts = self.variant_artifacts(variant);

        if variant != ModelVariant::Standard
            && !(artifacts.topology.exists() && artifacts.weights.exists())
        {
            tracing::warn!(
                "{} model not found in {}, using standard",
                variant.key(),
                self.root.display()
            );
            return (
                ModelVariant::Standard,
                self.variant_artifacts(ModelVariant::Standard),
            );
        }

        (variant, artifacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_variant_keys() {
        assert_eq!(ModelVariant::from_key("artistic"), ModelVariant::Artistic);
        assert_eq!(ModelVariant::from_key(" Artistic "), ModelVariant::Artistic);
        assert_eq!(ModelVariant::from_key("standard"), ModelVariant::Standard);
        assert_eq!(ModelVariant::from_key("vivid"), ModelVariant::Standard);
        assert_eq!(ModelVariant::Artistic.key(), "artistic");
    }

    #[test]
    fn test_standard_paths() {
        let dir = ModelDirectory::new("/models");
        let (variant, artifacts) = dir.artifacts(ModelVariant::Standard);

        assert_eq!(variant, ModelVariant::Standard);
        assert_eq!(
            artifacts.topology,
            PathBuf::from("/models/colorization_deploy_v2.onnx")
        );
        assert_eq!(
            artifacts.weights,
            PathBuf::from("/models/colorization_release_v2.onnx_data")
        );
        assert_eq!(artifacts.cluster_centers, PathBuf::from("/models/pts_in_hull.npy"));
    }

    #[test]
    fn test_artistic_falls_back_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let models = ModelDirectory::new(dir.path());

        let (variant, artifacts) = models.artifacts(ModelVariant::Artistic);

        assert_eq!(variant, ModelVariant::Standard);
        assert_eq!(
            artifacts.weights,
            dir.path().join("colorization_release_v2.onnx_data")
        );
    }

    #[test]
    fn test_artistic_selected_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let artistic = ModelVariant::Artistic;
        fs::write(dir.path().join(artistic.topology_filename()), b"graph").unwrap();
        fs::write(dir.path().join(artistic.weights_filename()), b"data").unwrap();
        let models = ModelDirectory::new(dir.path());

        let (variant, artifacts) = models.artifacts(ModelVariant::Artistic);

        assert_eq!(variant, ModelVariant::Artistic);
        assert_eq!(
            artifacts.weights,
            dir.path().join("colorization_release_v2_norebal.onnx_data")
        );
    }

    #[test]
    fn test_paths_order() {
        let artifacts = ModelArtifacts::new("t", "w", "c");
        let paths: Vec<_> = artifacts.paths().collect();
        assert_eq!(paths, vec![Path::new("t"), Path::new("w"), Path::new("c")]);
    }
}
