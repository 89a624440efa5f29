//! API routes and handlers

mod health;
mod infer;
mod models;
mod results;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/request", post(infer::submit))
        .route("/get/:folder/:filename", get(results::fetch))
        .route("/health", get(health::health_check))
        .route("/models", get(models::list_categories))
        .layer(DefaultBodyLimit::max(32 * 1024 * 1024))
        .layer(TraceLayer::new_for_http())
        // The front-end is hosted separately; allow everything.
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Plain greeting kept for reachability checks
async fn home() -> &'static str {
    "Welcome to the Bona vision inference service!"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use bona_core::{EngineConfig, VisionEngine};
    use http_body_util::BodyExt;
    use std::fs;
    use tower::ServiceExt;

    fn test_router(dir: &std::path::Path, predict_cmd: &str) -> Router {
        let config = EngineConfig {
            weights_dir: dir.to_path_buf(),
            upload_dir: dir.join("img"),
            results_dir: dir.join("runs/detect"),
            device: "cpu".to_string(),
            predict_cmd: predict_cmd.to_string(),
        };
        create_router(AppState::new(VisionEngine::new(config).unwrap()))
    }

    fn multipart_request(model: Option<&str>, img: Option<&[u8]>) -> Request<Body> {
        let boundary = "bona-test-boundary";
        let mut body = Vec::new();
        if let Some(model) = model {
            body.extend_from_slice(
                format!(
                    "--{boundary}\r\n\
                     Content-Disposition: form-data; name=\"model\"\r\n\r\n\
                     {model}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some(img) = img {
            body.extend_from_slice(
                format!(
                    "--{boundary}\r\n\
                     Content-Disposition: form-data; name=\"img\"; filename=\"input.jpg\"\r\n\
                     Content-Type: image/jpeg\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(img);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/request")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn home_greets() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_router(dir.path(), "yolo");

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_category_is_rejected_before_staging() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_router(dir.path(), "yolo");

        let response = app
            .oneshot(multipart_request(Some("translate"), Some(b"jpeg")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("translate"));

        // Nothing was staged.
        assert_eq!(fs::read_dir(dir.path().join("img")).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn missing_image_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_router(dir.path(), "yolo");

        let response = app
            .oneshot(multipart_request(Some("detect"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("No image"));
    }

    #[tokio::test]
    async fn fetch_unknown_result_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_router(dir.path(), "yolo");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/get/no-such-job/no-such-job.jpg")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn models_lists_all_categories() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_router(dir.path(), "yolo");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/models")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["categories"].as_array().unwrap().len(), 5);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn submit_and_fetch_round_trip() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();

        // Stand-in predictor: copies the source into the project/name dir.
        let script = dir.path().join("fake-yolo");
        fs::write(
            &script,
            concat!(
                "#!/bin/sh\n",
                "for arg in \"$@\"; do\n",
                "  case $arg in\n",
                "    source=*) src=${arg#source=};;\n",
                "    project=*) proj=${arg#project=};;\n",
                "    name=*) name=${arg#name=};;\n",
                "  esac\n",
                "done\n",
                "mkdir -p \"$proj/$name\"\n",
                "cp \"$src\" \"$proj/$name/\"\n",
            ),
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        fs::write(dir.path().join("best.pt"), b"weights").unwrap();

        let app = test_router(dir.path(), script.to_str().unwrap());

        let response = app
            .clone()
            .oneshot(multipart_request(Some("检测"), Some(b"jpeg bytes")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let img_path = body["img_path"].as_str().unwrap().to_string();
        assert!(img_path.starts_with("/get/"));
        assert!(img_path.ends_with(".jpg"));

        let response = app
            .oneshot(
                Request::builder()
                    .uri(img_path.as_str())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert_eq!(content_type, "image/jpeg");
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"jpeg bytes");
    }
}
