//! High-level engine façade tying the registry, store, and runner together.

use std::path::PathBuf;
use tracing::info;

use crate::bridge::PredictorBridge;
use crate::catalog::Category;
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::registry::ModelRegistry;
use crate::runner::InferenceRunner;
use crate::store::ResultStore;

/// A completed annotation job
#[derive(Debug, Clone)]
pub struct AnnotationJob {
    pub job_id: String,
    /// Normalized on-disk location of the annotated image
    pub output_path: PathBuf,
    /// Client-facing fetch key; never an absolute filesystem path
    pub reference: String,
}

/// Main vision inference engine
pub struct VisionEngine {
    registry: ModelRegistry,
    runner: InferenceRunner,
    store: ResultStore,
}

impl VisionEngine {
    /// Create a new engine, preparing the storage roots.
    pub fn new(config: EngineConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.upload_dir)?;
        std::fs::create_dir_all(&config.results_dir)?;

        let bridge = PredictorBridge::new(&config.predict_cmd, &config.device);
        let runner = InferenceRunner::new(bridge.clone(), config.results_dir.clone());
        let store = ResultStore::new(config.upload_dir.clone(), config.results_dir.clone());
        let registry = ModelRegistry::new(config, bridge);

        Ok(Self {
            registry,
            runner,
            store,
        })
    }

    /// Get reference to the model registry
    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Run the full submit pipeline for one uploaded image.
    pub async fn annotate(&self, category: Category, bytes: &[u8]) -> Result<AnnotationJob> {
        if bytes.is_empty() {
            return Err(Error::MissingImage);
        }

        let model = self.registry.ensure_loaded(category).await?;
        let staged = self.store.stage_upload(bytes)?;
        info!("Running {category} inference for job {}", staged.job_id);

        // Inference blocks for the whole run; keep it off the async workers.
        let runner = self.runner.clone();
        let input = staged.input_path.clone();
        let namespace = staged.job_id.clone();
        let output_path =
            tokio::task::spawn_blocking(move || runner.run(&model, &input, &namespace))
                .await
                .map_err(|e| Error::InferenceError(e.to_string()))??;

        let reference = format!("/get/{}/{}.jpg", staged.job_id, staged.job_id);
        Ok(AnnotationJob {
            job_id: staged.job_id,
            output_path,
            reference,
        })
    }

    /// Resolve a previously produced output image for the fetch flow.
    pub fn resolve_output(&self, folder: &str, filename: &str) -> Result<PathBuf> {
        self.store.resolve_output(folder, filename)
    }
}
