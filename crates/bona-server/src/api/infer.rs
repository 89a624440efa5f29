//! Image submission endpoint.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::{error, info};

use crate::error::ApiError;
use crate::state::AppState;
use bona_core::{parse_category, Category};

/// Submit response carrying the fetchable result reference
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: String,
    pub img_path: String,
}

/// Run inference on an uploaded image
pub async fn submit(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SubmitResponse>, ApiError> {
    let (category, image) = parse_submit_request(multipart).await?;
    info!("Annotation request: {} ({} bytes)", category, image.len());

    // Bound concurrently executing inference runs
    let _permit = state.acquire_permit().await;

    let job = state
        .engine
        .annotate(category, &image)
        .await
        .map_err(|err| {
            error!("Annotation request failed: {err}");
            ApiError::from(err)
        })?;

    Ok(Json(SubmitResponse {
        message: "Prediction succeeded".to_string(),
        img_path: job.reference,
    }))
}

async fn parse_submit_request(mut multipart: Multipart) -> Result<(Category, Vec<u8>), ApiError> {
    let mut category: Option<Category> = None;
    let mut image: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed reading multipart field: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "model" => {
                let text = field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed reading multipart 'model' field: {e}"))
                })?;
                category = Some(parse_category(&text).map_err(bona_core::Error::from)?);
            }
            "img" => {
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed reading multipart 'img' field: {e}"))
                })?;
                if !bytes.is_empty() {
                    image = Some(bytes.to_vec());
                }
            }
            _ => {}
        }
    }

    let category = category
        .ok_or_else(|| ApiError::bad_request("Missing 'model' field in multipart request"))?;
    let image =
        image.ok_or_else(|| ApiError::bad_request("No image provided (expected 'img' file field)"))?;

    Ok((category, image))
}
