//! REST client for the video generation backend.
//!
//! Wraps the backend HTTP API (style catalog, topic suggestions, script
//! preview, generation submission, status, download, health, history) using
//! [`reqwest`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use shortgen_core::catalog::StyleCatalog;
use shortgen_core::job::{GenerationJob, JobStatus};
use shortgen_core::script::ScriptDraft;
use shortgen_core::session::GenerationInputs;
use shortgen_core::topic::TopicCandidate;
use shortgen_core::types::VoiceId;
use tokio::io::AsyncWriteExt;

use crate::config::ClientConfig;

/// HTTP client for one generation backend.
pub struct GenerationApi {
    client: reqwest::Client,
    api_url: String,
    user_id: String,
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Body of `POST /api/topics/suggest`.
#[derive(Debug, Serialize)]
struct SuggestRequest<'a> {
    theme: &'a str,
}

/// Body of `POST /api/script/preview` and `POST /api/video/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub topic: String,
    pub style: String,
    pub speaker_id: VoiceId,
    pub enable_preview: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl GenerationRequest {
    /// A preview request; previews carry no user identity.
    pub fn preview(inputs: &GenerationInputs) -> Self {
        Self {
            topic: inputs.topic.clone(),
            style: inputs.style.clone(),
            speaker_id: inputs.voice_id,
            enable_preview: true,
            user_id: None,
        }
    }

    /// A full generation request on behalf of `user_id`.
    pub fn generate(inputs: &GenerationInputs, user_id: &str) -> Self {
        Self {
            topic: inputs.topic.clone(),
            style: inputs.style.clone(),
            speaker_id: inputs.voice_id,
            enable_preview: false,
            user_id: Some(user_id.to_string()),
        }
    }
}

/// Response returned by `POST /api/video/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    /// Server-assigned identifier for the generation job.
    pub generation_id: String,
    #[serde(default)]
    pub status: Option<JobStatus>,
    /// Rough completion estimate in seconds.
    #[serde(default)]
    pub estimated_time: Option<u64>,
}

/// Response returned by `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    /// Per-dependency details (voice engine, cache, ...), passed through as-is.
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// One row of `GET /api/user/{user_id}/history`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub topic: String,
    pub style: String,
    pub status: JobStatus,
    /// Naive UTC timestamp as written by the backend.
    pub created_at: chrono::NaiveDateTime,
    /// Relative download path, present once the job completed.
    #[serde(default)]
    pub video_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    generations: Vec<HistoryEntry>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from the backend REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, body decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Backend error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// Writing a downloaded file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

impl GenerationApi {
    /// Create an API client for a backend.
    ///
    /// * `api_url` - Base HTTP URL, e.g. `http://host:8000`.
    /// * `user_id` - Identity sent with generation requests.
    pub fn new(api_url: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url, user_id)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        api_url: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            api_url,
            user_id: user_id.into(),
        }
    }

    /// Build a client from [`ClientConfig`], applying the request timeout.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self::with_client(
            client,
            config.api_url.clone(),
            config.user_id.clone(),
        ))
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Fetch the style catalog (`GET /api/styles`).
    pub async fn get_styles(&self) -> Result<StyleCatalog, ApiError> {
        let response = self
            .client
            .get(format!("{}/api/styles", self.api_url))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Ask for topic ideas for a theme (`POST /api/topics/suggest`).
    pub async fn suggest_topics(&self, theme: &str) -> Result<Vec<TopicCandidate>, ApiError> {
        let response = self
            .client
            .post(format!("{}/api/topics/suggest", self.api_url))
            .json(&SuggestRequest { theme })
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Generate a script without rendering (`POST /api/script/preview`).
    pub async fn preview_script(
        &self,
        inputs: &GenerationInputs,
    ) -> Result<ScriptDraft, ApiError> {
        let response = self
            .client
            .post(format!("{}/api/script/preview", self.api_url))
            .json(&GenerationRequest::preview(inputs))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Queue a full video generation (`POST /api/video/generate`).
    pub async fn submit_generation(
        &self,
        inputs: &GenerationInputs,
    ) -> Result<SubmitResponse, ApiError> {
        let response = self
            .client
            .post(format!("{}/api/video/generate", self.api_url))
            .json(&GenerationRequest::generate(inputs, &self.user_id))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch the current snapshot of a job (`GET /api/video/status/{id}`).
    pub async fn get_status(&self, generation_id: &str) -> Result<GenerationJob, ApiError> {
        let response = self
            .client
            .get(format!("{}/api/video/status/{}", self.api_url, generation_id))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// URL of the rendered video for a completed job.
    pub fn download_url(&self, generation_id: &str) -> String {
        format!("{}/api/video/download/{}", self.api_url, generation_id)
    }

    /// Stream the rendered video into `dest`, returning the bytes written.
    pub async fn download_video(&self, generation_id: &str, dest: &Path) -> Result<u64, ApiError> {
        let response = self
            .client
            .get(self.download_url(generation_id))
            .send()
            .await?;
        let mut response = Self::ensure_success(response).await?;

        let mut file = tokio::fs::File::create(dest).await?;
        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        tracing::info!(
            generation_id,
            bytes = written,
            path = %dest.display(),
            "Video downloaded",
        );
        Ok(written)
    }

    /// Probe backend health (`GET /health`).
    ///
    /// An unhealthy backend answers 503, which surfaces as
    /// [`ApiError::ApiError`].
    pub async fn health(&self) -> Result<HealthReport, ApiError> {
        let response = self
            .client
            .get(format!("{}/health", self.api_url))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Recent generations for the configured user
    /// (`GET /api/user/{user_id}/history`).
    pub async fn history(&self) -> Result<Vec<HistoryEntry>, ApiError> {
        let response = self
            .client
            .get(format!("{}/api/user/{}/history", self.api_url, self.user_id))
            .send()
            .await?;

        let body: HistoryResponse = Self::parse_response(response).await?;
        Ok(body.generations)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`ApiError::ApiError`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
