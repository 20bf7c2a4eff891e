//! Shared engine cache keyed by artifact paths.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};

use super::artifacts::ModelArtifacts;
use super::engine::ColorizationEngine;
use super::loader::load_engine;

/// One key's engine, filled on the first successful load.
type Slot = Arc<Mutex<Option<Arc<ColorizationEngine>>>>;

/// Builds each engine once and hands out shared references afterwards.
///
/// The key map is only locked long enough to find a key's slot. Loading runs
/// under that slot's own lock, so a slow load never delays other keys.
#[derive(Debug, Default)]
pub struct EngineCache {
    engines: Mutex<HashMap<ModelArtifacts, Slot>>,
}

impl EngineCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the engine for `artifacts`, loading it on first use.
    ///
    /// Failed loads are not cached; the next call retries.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot be loaded.
    pub fn get_or_load(&self, artifacts: &ModelArtifacts) -> Result<Arc<ColorizationEngine>> {
        self.get_or_insert_with(artifacts, || load_engine(artifacts))
    }

    /// Get the engine for `artifacts`, building it with `build` on first use.
    ///
    /// Concurrent callers for the same key wait for one build; callers for
    /// other keys are not blocked by it.
    ///
    /// # Errors
    ///
    /// Returns the error from `build`, or [`Error::EnginePoisoned`].
    pub fn get_or_insert_with<F>(
        &self,
        artifacts: &ModelArtifacts,
        build: F,
    ) -> Result<Arc<ColorizationEngine>>
    where
        F: FnOnce() -> Result<ColorizationEngine>,
    {
        let slot = {
            let mut engines = self.engines.lock().map_err(|_| Error::EnginePoisoned)?;
            Arc::clone(engines.entry(artifacts.clone()).or_default())
        };

        let mut cached = slot.lock().map_err(|_| Error::EnginePoisoned)?;
        if let Some(engine) = cached.as_ref() {
            tracing::debug!("Reusing engine for {}", artifacts.topology.display());
            return Ok(Arc::clone(engine));
        }

        let engine = Arc::new(build()?);
        *cached = Some(Arc::clone(&engine));
        Ok(engine)
    }

    /// Number of loaded engines. Keys still loading are not counted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.engines.lock().map_or(0, |engines| {
            engines
                .values()
                .filter(|slot| matches!(slot.try_lock().as_deref(), Ok(Some(_))))
                .count()
        })
    }

    /// Whether no engine has been loaded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
