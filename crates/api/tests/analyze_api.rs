//! Integration tests for `POST /analyze`.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    analyze_jpeg, body_json, post_multipart, solid_jpeg, FailingClassifier, FixedClassifier,
    MultipartBody, PanickingClassifier,
};
use skinai_db::repositories::InferenceRepo;

// ---------------------------------------------------------------------------
// Success path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn valid_image_returns_prediction_with_defaults() {
    let app = common::build_test_app().await;
    let json = analyze_jpeg(&app).await;

    assert!(!json["inference_id"].as_str().unwrap().is_empty());
    assert_eq!(json["condition"], "normal");
    let confidence = json["confidence"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&confidence));
    assert_eq!(json["skin_type"], "any");
    assert_eq!(json["fitzpatrick"], "unspecified");
    assert_eq!(json["ethnicity"], "unspecified");
}

#[tokio::test]
async fn profile_fields_are_echoed_and_stored() {
    let app = common::build_test_app().await;
    let body = MultipartBody::new()
        .text("skin_type", "oily")
        .text("fitzpatrick", "V")
        .text("ethnicity", "west_african")
        .file("file", "face.jpg", "image/jpeg", &solid_jpeg(64, 64))
        .finish();

    let response = post_multipart(&app, "/analyze", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["skin_type"], "oily");
    assert_eq!(json["fitzpatrick"], "V");
    assert_eq!(json["ethnicity"], "west_african");

    let id = json["inference_id"].as_str().unwrap();
    let record = InferenceRepo::find_by_id(&app.pool, id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.user_skin_type.as_deref(), Some("oily"));
    assert_eq!(record.user_fitzpatrick.as_deref(), Some("V"));
    assert_eq!(record.predicted_condition, "normal");
    assert!(!record.needs_review);
}

#[tokio::test]
async fn blank_profile_fields_fall_back_to_defaults() {
    let app = common::build_test_app().await;
    let body = MultipartBody::new()
        .text("skin_type", "  ")
        .file("file", "face.jpg", "image/jpeg", &solid_jpeg(32, 32))
        .finish();

    let json = body_json(post_multipart(&app, "/analyze", body).await).await;
    assert_eq!(json["skin_type"], "any");
}

#[tokio::test]
async fn upload_is_stored_under_inference_id() {
    let app = common::build_test_app().await;
    let json = analyze_jpeg(&app).await;
    let id = json["inference_id"].as_str().unwrap();

    let expected = app.paths.upload_dir.join(format!("{id}.jpg"));
    assert!(expected.exists(), "upload should be written to {expected:?}");

    let record = InferenceRepo::find_by_id(&app.pool, id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.image_path, expected.display().to_string());
}

#[tokio::test]
async fn same_file_name_does_not_collide() {
    let app = common::build_test_app().await;
    let first = analyze_jpeg(&app).await;
    let second = analyze_jpeg(&app).await;
    assert_ne!(first["inference_id"], second["inference_id"]);

    let files = std::fs::read_dir(&app.paths.upload_dir).unwrap().count();
    assert_eq!(files, 2);
}

#[tokio::test]
async fn injected_classifier_result_is_returned() {
    let app = common::build_test_app_with(Arc::new(FixedClassifier {
        label: "rosacea",
        confidence: 0.87,
    }))
    .await;

    let json = analyze_jpeg(&app).await;
    assert_eq!(json["condition"], "rosacea");
    assert_eq!(json["confidence"], 0.87);
}

// ---------------------------------------------------------------------------
// Validation failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_image_content_type_returns_400() {
    let app = common::build_test_app().await;
    let body = MultipartBody::new()
        .file("file", "notes.txt", "text/plain", b"hello")
        .finish();

    let response = post_multipart(&app, "/analyze", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "File must be an image");
}

#[tokio::test]
async fn empty_file_returns_400() {
    let app = common::build_test_app().await;
    let body = MultipartBody::new()
        .file("file", "empty.jpg", "image/jpeg", b"")
        .finish();

    let response = post_multipart(&app, "/analyze", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Empty file");
}

#[tokio::test]
async fn oversized_file_returns_400() {
    let app = common::build_test_app().await;
    let big = vec![0u8; 10 * 1024 * 1024 + 1];
    let body = MultipartBody::new()
        .file("file", "big.jpg", "image/jpeg", &big)
        .finish();

    let response = post_multipart(&app, "/analyze", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "File too large (max 10MB)");
}

#[tokio::test]
async fn missing_file_field_returns_400() {
    let app = common::build_test_app().await;
    let body = MultipartBody::new().text("skin_type", "dry").finish();

    let response = post_multipart(&app, "/analyze", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rejected_upload_creates_no_record() {
    let app = common::build_test_app().await;
    let body = MultipartBody::new()
        .file("file", "notes.txt", "text/plain", b"hello")
        .finish();
    post_multipart(&app, "/analyze", body).await;

    let all = InferenceRepo::list(&app.pool, None, 100).await.unwrap();
    assert!(all.is_empty());
}

// ---------------------------------------------------------------------------
// Inference failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn prediction_failure_returns_500_with_detail() {
    let app = common::build_test_app_with(Arc::new(FailingClassifier)).await;
    let body = MultipartBody::new()
        .file("file", "face.jpg", "image/jpeg", &solid_jpeg(32, 32))
        .finish();

    let response = post_multipart(&app, "/analyze", body).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "PREDICTION_FAILED");
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Prediction failed:"));

    let all = InferenceRepo::list(&app.pool, None, 100).await.unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn classifier_panic_returns_500_json() {
    let app = common::build_test_app_with(Arc::new(PanickingClassifier)).await;
    let body = MultipartBody::new()
        .file("file", "face.jpg", "image/jpeg", &solid_jpeg(32, 32))
        .finish();

    let response = post_multipart(&app, "/analyze", body).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INTERNAL_ERROR");
}
