//! HTTP client for the SkinAI API.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use skinai_core::feedback::Correctness;
use skinai_core::profile::SkinProfile;

/// Response of `POST /analyze`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeResult {
    pub inference_id: String,
    pub condition: String,
    pub confidence: f64,
    #[serde(flatten)]
    pub profile: SkinProfile,
}

/// One row of `GET /admin/inferences`.
#[derive(Debug, Clone, Deserialize)]
pub struct InferenceRow {
    pub id: String,
    pub image_path: String,
    pub created_at: String,
    pub predicted_condition: String,
    pub predicted_confidence: Option<f64>,
    pub user_skin_type: Option<String>,
    pub user_fitzpatrick: Option<String>,
    pub user_ethnicity: Option<String>,
    pub is_correct: Correctness,
    pub corrected_condition: Option<String>,
    pub notes: Option<String>,
    pub needs_review: bool,
}

/// Body of `POST /feedback`.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackSubmission {
    pub inference_id: String,
    pub is_correct: bool,
    /// Sent as an empty string when absent.
    pub corrected_condition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// An image to forward to `POST /analyze`.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Errors from the API client.
#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    /// The HTTP request itself failed (connection refused, timeout, ...).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("API error ({status}): {body}")]
    ApiError { status: u16, body: String },
}

impl ApiClientError {
    /// `true` when the API could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Request(e) if e.is_connect() || e.is_timeout())
    }
}

/// Client for one API instance.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    api_url: String,
}

impl ApiClient {
    /// * `api_url` - Base URL, e.g. `http://127.0.0.1:8000`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// `GET /health`.
    pub async fn health(&self) -> Result<serde_json::Value, ApiClientError> {
        let response = self
            .client
            .get(format!("{}/health", self.api_url))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// `POST /analyze` with the image and profile as multipart.
    pub async fn analyze(
        &self,
        upload: ImageUpload,
        profile: &SkinProfile,
    ) -> Result<AnalyzeResult, ApiClientError> {
        let part = reqwest::multipart::Part::bytes(upload.data)
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("skin_type", profile.skin_type.clone())
            .text("fitzpatrick", profile.fitzpatrick.clone())
            .text("ethnicity", profile.ethnicity.clone());

        let response = self
            .client
            .post(format!("{}/analyze", self.api_url))
            .multipart(form)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// `POST /feedback` as a urlencoded form.
    pub async fn submit_feedback(
        &self,
        feedback: &FeedbackSubmission,
    ) -> Result<(), ApiClientError> {
        let response = self
            .client
            .post(format!("{}/feedback", self.api_url))
            .form(feedback)
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    /// `GET /admin/inferences`.
    pub async fn list_inferences(
        &self,
        limit: u32,
        needs_review: Option<bool>,
    ) -> Result<Vec<InferenceRow>, ApiClientError> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(flag) = needs_review {
            query.push(("needs_review", flag.to_string()));
        }

        let response = self
            .client
            .get(format!("{}/admin/inferences", self.api_url))
            .query(&query)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    // ---- private helpers ----

    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ApiClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiClientError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiClientError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
