//! Configuration types for the bona vision engine

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Root directory holding model weight files
    #[serde(default = "default_weights_dir")]
    pub weights_dir: PathBuf,

    /// Directory where uploaded images are staged
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Directory where annotated results are written
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    /// Inference device handed to the predictor
    #[serde(default = "default_device")]
    pub device: String,

    /// Predictor executable invoked for load checks and prediction runs
    #[serde(default = "default_predict_cmd")]
    pub predict_cmd: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights_dir: default_weights_dir(),
            upload_dir: default_upload_dir(),
            results_dir: default_results_dir(),
            device: default_device(),
            predict_cmd: default_predict_cmd(),
        }
    }
}

fn env_or(var: &str, fallback: &str) -> String {
    if let Ok(from_env) = std::env::var(var) {
        let trimmed = from_env.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    fallback.to_string()
}

fn default_weights_dir() -> PathBuf {
    PathBuf::from(env_or("BONA_WEIGHTS_DIR", "."))
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from(env_or("BONA_UPLOAD_DIR", "img"))
}

fn default_results_dir() -> PathBuf {
    PathBuf::from(env_or("BONA_RESULTS_DIR", "runs/detect"))
}

fn default_device() -> String {
    env_or("BONA_DEVICE", "cpu")
}

fn default_predict_cmd() -> String {
    env_or("BONA_PREDICT_CMD", "yolo")
}
