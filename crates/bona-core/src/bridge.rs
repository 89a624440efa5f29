//! Subprocess bridge to the external predictor.
//!
//! The annotation capability is an opaque external tool (the Ultralytics
//! `yolo` CLI by default); this bridge is the only place that knows how
//! to invoke it.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

use crate::catalog::Category;
use crate::error::{Error, Result};

/// Opaque handle to a loaded model artifact
#[derive(Debug)]
pub struct LoadedModel {
    category: Category,
    weights: PathBuf,
}

impl LoadedModel {
    pub fn category(&self) -> Category {
        self.category
    }

    pub fn weights(&self) -> &Path {
        &self.weights
    }
}

/// Invokes the predictor executable for load checks and prediction runs
#[derive(Debug, Clone)]
pub struct PredictorBridge {
    predict_cmd: String,
    device: String,
}

impl PredictorBridge {
    pub fn new(predict_cmd: impl Into<String>, device: impl Into<String>) -> Self {
        Self {
            predict_cmd: predict_cmd.into(),
            device: device.into(),
        }
    }

    /// Validate a weights artifact and produce a model handle.
    pub fn load(&self, category: Category, weights: &Path) -> Result<LoadedModel> {
        let metadata = std::fs::metadata(weights).map_err(|e| {
            Error::ModelLoadError(format!("cannot read weights {}: {e}", weights.display()))
        })?;

        if !metadata.is_file() {
            return Err(Error::ModelLoadError(format!(
                "weights path {} is not a file",
                weights.display()
            )));
        }
        if metadata.len() == 0 {
            return Err(Error::ModelLoadError(format!(
                "weights file {} is empty",
                weights.display()
            )));
        }

        Ok(LoadedModel {
            category,
            weights: weights.to_path_buf(),
        })
    }

    /// Run prediction on `source`, saving the annotated image under
    /// `{project}/{name}/`.
    pub fn predict(
        &self,
        model: &LoadedModel,
        source: &Path,
        project: &Path,
        name: &str,
    ) -> Result<()> {
        debug!(
            "Invoking predictor: {} task={} source={}",
            self.predict_cmd,
            model.category().task(),
            source.display()
        );

        let output = Command::new(&self.predict_cmd)
            .arg("predict")
            .arg(format!("task={}", model.category().task()))
            .arg(format!("model={}", model.weights().display()))
            .arg(format!("source={}", source.display()))
            .arg(format!("project={}", project.display()))
            .arg(format!("name={name}"))
            .arg(format!("device={}", self.device))
            .arg("save=True")
            .arg("exist_ok=True")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::InferenceError(format!("failed to start predictor: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::InferenceError(format!(
                "predictor exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn load_rejects_missing_weights() {
        let bridge = PredictorBridge::new("yolo", "cpu");
        let err = bridge
            .load(Category::Detect, Path::new("/nonexistent/best.pt"))
            .unwrap_err();
        assert!(matches!(err, Error::ModelLoadError(_)));
    }

    #[test]
    fn load_rejects_empty_weights() {
        let dir = tempfile::tempdir().unwrap();
        let weights = dir.path().join("best.pt");
        fs::write(&weights, b"").unwrap();

        let bridge = PredictorBridge::new("yolo", "cpu");
        let err = bridge.load(Category::Detect, &weights).unwrap_err();
        assert!(matches!(err, Error::ModelLoadError(_)));
    }

    #[test]
    fn load_accepts_readable_weights() {
        let dir = tempfile::tempdir().unwrap();
        let weights = dir.path().join("best.pt");
        fs::write(&weights, b"weights").unwrap();

        let bridge = PredictorBridge::new("yolo", "cpu");
        let model = bridge.load(Category::Track, &weights).unwrap();
        assert_eq!(model.category(), Category::Track);
        assert_eq!(model.weights(), weights.as_path());
    }

    #[cfg(unix)]
    #[test]
    fn predict_surfaces_nonzero_exit() {
        let dir = tempfile::tempdir().unwrap();
        let weights = dir.path().join("best.pt");
        fs::write(&weights, b"weights").unwrap();

        let bridge = PredictorBridge::new("false", "cpu");
        let model = bridge.load(Category::Detect, &weights).unwrap();
        let err = bridge
            .predict(&model, Path::new("in.jpg"), dir.path(), "job")
            .unwrap_err();
        assert!(matches!(err, Error::InferenceError(_)));
    }
}
