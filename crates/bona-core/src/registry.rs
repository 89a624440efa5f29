//! Model registry to ensure models are loaded once and shared across the app.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{OnceCell, RwLock};
use tracing::{info, warn};

use crate::bridge::{LoadedModel, PredictorBridge};
use crate::catalog::Category;
use crate::config::EngineConfig;
use crate::error::{Error, Result};

/// Category-to-model cache; the only shared mutable state in the engine.
pub struct ModelRegistry {
    config: EngineConfig,
    bridge: PredictorBridge,
    models: RwLock<HashMap<Category, Arc<OnceCell<Arc<LoadedModel>>>>>,
}

impl ModelRegistry {
    pub fn new(config: EngineConfig, bridge: PredictorBridge) -> Self {
        Self {
            config,
            bridge,
            models: RwLock::new(HashMap::new()),
        }
    }

    /// Load the model for a category, or return the cached handle.
    ///
    /// Concurrent first requests for one category coalesce onto a single
    /// load. A failed load leaves the cell empty, so the next request
    /// retries instead of permanently disabling the category.
    pub async fn ensure_loaded(&self, category: Category) -> Result<Arc<LoadedModel>> {
        let cell = {
            let mut guard = self.models.write().await;
            guard
                .entry(category)
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        let weights = self.config.weights_dir.join(category.weights_file());

        let model = cell
            .get_or_try_init({
                let bridge = self.bridge.clone();
                move || async move {
                    info!("Loading {category} model from {weights:?}");
                    tokio::task::spawn_blocking(move || bridge.load(category, &weights))
                        .await
                        .map_err(|e| Error::ModelLoadError(e.to_string()))?
                        .map(Arc::new)
                }
            })
            .await;

        match model {
            Ok(model) => Ok(model.clone()),
            Err(err) => {
                warn!("Failed to load {category} model: {err}");
                Err(err)
            }
        }
    }

    /// Cached handle, if the category has been loaded.
    pub async fn get(&self, category: Category) -> Option<Arc<LoadedModel>> {
        let guard = self.models.read().await;
        guard.get(&category).and_then(|cell| cell.get().cloned())
    }
}
