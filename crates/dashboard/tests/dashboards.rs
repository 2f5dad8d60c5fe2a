//! Dashboards and API client against a live API server on a loopback port.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use skinai_api::config::ServerConfig;
use skinai_api::router::build_app_router;
use skinai_api::state::AppState;
use skinai_api::storage::UploadStore;
use skinai_core::feedback::Correctness;
use skinai_core::paths::ServicePaths;
use skinai_core::profile::SkinProfile;
use skinai_dashboard::client::{ApiClient, ApiClientError, FeedbackSubmission, ImageUpload};
use skinai_dashboard::config::DashboardConfig;
use skinai_dashboard::state::DashboardState;
use skinai_model::SkinClassifier;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "dashboard-test-boundary";

struct Backend {
    url: String,
    upload_dir: PathBuf,
    _dir: TempDir,
}

async fn spawn_backend() -> Backend {
    let dir = tempfile::tempdir().unwrap();
    let paths = ServicePaths::with_base(dir.path().to_path_buf());
    let pool = skinai_db::create_pool(&paths.database_url).await.unwrap();
    skinai_db::run_migrations(&pool).await.unwrap();

    let config = ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
        cors_origins: vec!["*".into()],
        request_timeout_secs: 30,
        paths: paths.clone(),
        log_file: None,
    };
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        classifier: Arc::new(SkinClassifier::fallback()),
        uploads: Arc::new(UploadStore::new(paths.upload_dir.clone())),
    };
    let app = build_app_router(state, &config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Backend {
        url: format!("http://{addr}"),
        upload_dir: paths.upload_dir,
        _dir: dir,
    }
}

fn dashboard_state(api_url: &str, upload_dir: PathBuf) -> DashboardState {
    DashboardState::new(DashboardConfig {
        host: "127.0.0.1".into(),
        port: 0,
        api_url: api_url.into(),
        upload_dir,
    })
}

fn fake_jpeg() -> ImageUpload {
    ImageUpload {
        file_name: "face.jpg".into(),
        content_type: "image/jpeg".into(),
        data: b"\xff\xd8\xff\xe0 not really a jpeg".to_vec(),
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

#[tokio::test]
async fn client_analyze_feedback_and_list() {
    let backend = spawn_backend().await;
    let client = ApiClient::new(backend.url.clone());

    let health = client.health().await.unwrap();
    assert_eq!(health["status"], "ok");

    let profile = SkinProfile::with_defaults(Some("dry".into()), None, None);
    let result = client.analyze(fake_jpeg(), &profile).await.unwrap();
    assert_eq!(result.condition, "normal");
    assert_eq!(result.profile.skin_type, "dry");

    client
        .submit_feedback(&FeedbackSubmission {
            inference_id: result.inference_id.clone(),
            is_correct: false,
            corrected_condition: "acne".into(),
            notes: None,
        })
        .await
        .unwrap();

    let rows = client.list_inferences(10, Some(true)).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, result.inference_id);
    assert_eq!(rows[0].is_correct, Correctness::Incorrect);
    assert_eq!(rows[0].corrected_condition.as_deref(), Some("acne"));

    let clean = client.list_inferences(10, Some(false)).await.unwrap();
    assert!(clean.is_empty());
}

#[tokio::test]
async fn client_surfaces_api_errors() {
    let backend = spawn_backend().await;
    let client = ApiClient::new(backend.url.clone());

    let upload = ImageUpload {
        content_type: "text/plain".into(),
        ..fake_jpeg()
    };
    let err = client
        .analyze(upload, &SkinProfile::default())
        .await
        .unwrap_err();
    match err {
        ApiClientError::ApiError { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("File must be an image"));
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn client_detects_unreachable_backend() {
    let client = ApiClient::new("http://127.0.0.1:1");
    let err = client.health().await.unwrap_err();
    assert!(err.is_unreachable());
}

// ---------------------------------------------------------------------------
// User page
// ---------------------------------------------------------------------------

#[tokio::test]
async fn user_index_renders_upload_form() {
    let backend = spawn_backend().await;
    let app = skinai_dashboard::user::router(dashboard_state(&backend.url, backend.upload_dir.clone()));

    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("name=\"file\""));
    assert!(body.contains("combination"));
    assert!(body.contains("west_african"));
    assert!(body.contains("<option value=\"VI\">"));
}

#[tokio::test]
async fn user_index_reports_unreachable_backend() {
    let app = skinai_dashboard::user::router(dashboard_state(
        "http://127.0.0.1:1",
        PathBuf::from("/nonexistent"),
    ));

    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains("Cannot connect to the backend"));
}

#[tokio::test]
async fn user_analyze_then_feedback() {
    let backend = spawn_backend().await;
    let app = skinai_dashboard::user::router(dashboard_state(&backend.url, backend.upload_dir.clone()));

    let upload = fake_jpeg();
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"skin_type\"\r\n\r\noily\r\n\
         --{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"face.jpg\"\r\n\
         Content-Type: image/jpeg\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(&upload.data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri("/analyze")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    let (status, html) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<strong>normal</strong>"));
    assert!(html.contains("Skin type: oily"));

    let client = ApiClient::new(backend.url.clone());
    let id = client.list_inferences(1, None).await.unwrap()[0].id.clone();
    assert!(html.contains(&id));

    let (status, html) = send(
        &app,
        post_form(
            "/feedback",
            &format!("inference_id={id}&is_correct=false&corrected_condition=rosacea"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("feedback was recorded"));

    let row = &client.list_inferences(1, None).await.unwrap()[0];
    assert_eq!(row.corrected_condition.as_deref(), Some("rosacea"));
    assert!(row.needs_review);
}

// ---------------------------------------------------------------------------
// Admin page
// ---------------------------------------------------------------------------

#[tokio::test]
async fn admin_lists_and_filters_records() {
    let backend = spawn_backend().await;
    let client = ApiClient::new(backend.url.clone());
    let flagged = client
        .analyze(fake_jpeg(), &SkinProfile::default())
        .await
        .unwrap();
    let clean = client
        .analyze(fake_jpeg(), &SkinProfile::default())
        .await
        .unwrap();
    client
        .submit_feedback(&FeedbackSubmission {
            inference_id: flagged.inference_id.clone(),
            is_correct: false,
            corrected_condition: "acne".into(),
            notes: None,
        })
        .await
        .unwrap();

    let app = skinai_dashboard::admin::router(dashboard_state(&backend.url, backend.upload_dir.clone()));

    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Found <strong>2</strong>"));
    assert!(body.contains(&format!("/images/{}.jpg", clean.inference_id)));

    let (_, body) = send(&app, get("/?needs_review=yes")).await;
    assert!(body.contains("Found <strong>1</strong>"));
    assert!(body.contains(&flagged.inference_id));
    assert!(!body.contains(&clean.inference_id));
}

#[tokio::test]
async fn admin_review_requires_a_verdict() {
    let backend = spawn_backend().await;
    let client = ApiClient::new(backend.url.clone());
    let result = client
        .analyze(fake_jpeg(), &SkinProfile::default())
        .await
        .unwrap();
    let app = skinai_dashboard::admin::router(dashboard_state(&backend.url, backend.upload_dir.clone()));

    let (status, body) = send(
        &app,
        post_form(
            "/review",
            &format!("inference_id={}&verdict=unknown", result.inference_id),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Mark as Correct or Incorrect"));

    let (status, _) = send(
        &app,
        post_form(
            "/review",
            &format!(
                "inference_id={}&verdict=correct&corrected_condition=",
                result.inference_id
            ),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let row = &client.list_inferences(1, None).await.unwrap()[0];
    assert_eq!(row.is_correct, Correctness::Correct);
    assert!(!row.needs_review);
}

#[tokio::test]
async fn admin_serves_uploaded_images() {
    let backend = spawn_backend().await;
    let client = ApiClient::new(backend.url.clone());
    let result = client
        .analyze(fake_jpeg(), &SkinProfile::default())
        .await
        .unwrap();
    let app = skinai_dashboard::admin::router(dashboard_state(&backend.url, backend.upload_dir.clone()));

    let (status, body) = send(&app, get(&format!("/images/{}.jpg", result.inference_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("not really a jpeg"));

    let (status, _) = send(&app, get("/images/missing.jpg")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
