//! Result image retrieval endpoint.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::Response;
use tracing::{debug, error};

use crate::error::ApiError;
use crate::state::AppState;

/// Serve a previously produced annotated image
pub async fn fetch(
    State(state): State<AppState>,
    Path((folder, filename)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let path = state.engine.resolve_output(&folder, &filename)?;
    debug!("Serving image from {}", path.display());

    let bytes = tokio::fs::read(&path).await.map_err(|err| {
        error!("Failed reading result image {}: {err}", path.display());
        ApiError::internal("Failed to read result image")
    })?;

    Response::builder()
        .header(header::CONTENT_TYPE, "image/jpeg")
        .body(Body::from(bytes))
        .map_err(|e| ApiError::internal(format!("Failed to build response: {e}")))
}
