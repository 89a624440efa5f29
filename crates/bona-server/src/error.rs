//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

impl From<bona_core::Error> for ApiError {
    fn from(err: bona_core::Error) -> Self {
        use bona_core::Error;

        // Client-caused failures echo their message; server-side failures
        // get a sanitized body, with the full detail left to the logs.
        match &err {
            Error::UnknownCategory(_) | Error::MissingImage | Error::InvalidInput(_) => {
                ApiError::bad_request(err.to_string())
            }
            Error::NotFound(_) => ApiError::not_found(err.to_string()),
            Error::ModelLoadError(_) => ApiError::internal("Model failed to load"),
            Error::InferenceError(_) => ApiError::internal("Inference failed"),
            Error::OutputMissing(_) => ApiError::internal("Predicted result was not produced"),
            Error::Io(_) => ApiError::internal("Internal error"),
        }
    }
}
