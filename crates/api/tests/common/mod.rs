#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use skinai_core::paths::ServicePaths;
use skinai_db::DbPool;
use skinai_model::{Classifier, ModelError, Prediction, SkinClassifier};
use tempfile::TempDir;
use tower::ServiceExt;

use skinai_api::config::ServerConfig;
use skinai_api::router::build_app_router;
use skinai_api::state::AppState;
use skinai_api::storage::UploadStore;

pub const BOUNDARY: &str = "skinai-test-boundary";

/// A router over a scratch database and upload directory.
///
/// The temp directory lives as long as this struct.
pub struct TestApp {
    pub router: Router,
    pub pool: DbPool,
    pub paths: ServicePaths,
    _dir: TempDir,
}

/// Build a test `ServerConfig` rooted at `base`.
pub fn test_config(base: &std::path::Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
        paths: ServicePaths::with_base(base.to_path_buf()),
        log_file: None,
    }
}

/// Build the full application with the fallback classifier.
pub async fn build_test_app() -> TestApp {
    build_test_app_with(Arc::new(SkinClassifier::fallback())).await
}

/// Build the full application with an injected classifier.
pub async fn build_test_app_with(classifier: Arc<dyn Classifier>) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let pool = skinai_db::create_pool(&config.paths.database_url)
        .await
        .unwrap();
    skinai_db::run_migrations(&pool).await.unwrap();

    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        classifier,
        uploads: Arc::new(UploadStore::new(config.paths.upload_dir.clone())),
    };

    TestApp {
        router: build_app_router(state, &config),
        pool,
        paths: config.paths,
        _dir: dir,
    }
}

/// Classifier that always reports the same label.
pub struct FixedClassifier {
    pub label: &'static str,
    pub confidence: f64,
}

impl Classifier for FixedClassifier {
    fn predict(&self, _image_bytes: &[u8]) -> Result<Prediction, ModelError> {
        Ok(Prediction {
            label: self.label.to_string(),
            confidence: self.confidence,
        })
    }

    fn model_loaded(&self) -> bool {
        true
    }
}

/// Classifier whose every prediction fails.
pub struct FailingClassifier;

impl Classifier for FailingClassifier {
    fn predict(&self, _image_bytes: &[u8]) -> Result<Prediction, ModelError> {
        Err(ModelError::Inference("backend exploded".into()))
    }

    fn model_loaded(&self) -> bool {
        true
    }
}

/// Classifier that panics inside the blocking task.
pub struct PanickingClassifier;

impl Classifier for PanickingClassifier {
    fn predict(&self, _image_bytes: &[u8]) -> Result<Prediction, ModelError> {
        panic!("model weights corrupted");
    }

    fn model_loaded(&self) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: &TestApp, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn post_form(app: &TestApp, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn post_multipart(app: &TestApp, uri: &str, body: Vec<u8>) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Multipart bodies
// ---------------------------------------------------------------------------

/// Incrementally builds a `multipart/form-data` body using [`BOUNDARY`].
#[derive(Default)]
pub struct MultipartBody {
    buf: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.buf
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.buf
    }
}

/// A solid-color JPEG of the given size.
pub fn solid_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([190, 140, 110]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Jpeg).unwrap();
    out.into_inner()
}

/// Upload a JPEG and return the parsed response body.
pub async fn analyze_jpeg(app: &TestApp) -> serde_json::Value {
    let body = MultipartBody::new()
        .file("file", "face.jpg", "image/jpeg", &solid_jpeg(256, 256))
        .finish();
    let response = post_multipart(app, "/analyze", body).await;
    assert_eq!(response.status(), 200);
    body_json(response).await
}
