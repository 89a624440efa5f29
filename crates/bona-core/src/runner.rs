//! Executes one inference job and verifies its output.

use std::path::{Path, PathBuf};
use tracing::info;

use crate::bridge::{LoadedModel, PredictorBridge};
use crate::error::{Error, Result};

/// Drives the predictor for a single job namespace
#[derive(Debug, Clone)]
pub struct InferenceRunner {
    bridge: PredictorBridge,
    results_dir: PathBuf,
}

impl InferenceRunner {
    pub fn new(bridge: PredictorBridge, results_dir: PathBuf) -> Self {
        Self {
            bridge,
            results_dir,
        }
    }

    /// Run the model on `input`, writing the annotated image under
    /// `{results_dir}/{namespace}/`, and return the verified output path.
    pub fn run(&self, model: &LoadedModel, input: &Path, namespace: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.results_dir)?;

        self.bridge
            .predict(model, input, &self.results_dir, namespace)?;

        let filename = input
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                Error::InvalidInput(format!("input path {} has no filename", input.display()))
            })?;

        let output = normalize_separators(&self.results_dir.join(namespace).join(filename));

        // The predictor can exit cleanly without saving anything; never
        // hand out a path that is not actually on disk.
        if !output.is_file() {
            return Err(Error::OutputMissing(output));
        }

        info!("Annotated image at {}", output.display());
        Ok(output)
    }
}

/// The predictor may emit platform-specific separators; settle on one
/// convention before the path reaches a client-facing reference.
fn normalize_separators(path: &Path) -> PathBuf {
    PathBuf::from(path.to_string_lossy().replace('\\', "/"))
}
