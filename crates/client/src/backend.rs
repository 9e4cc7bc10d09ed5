//! The seam between the wizard controller and the generation backend.
//!
//! [`GenerationBackend`] lists every backend operation the controller and
//! the poller use. [`GenerationApi`] implements it over HTTP; tests swap in
//! scripted doubles.

use std::path::Path;

use async_trait::async_trait;
use shortgen_core::catalog::StyleCatalog;
use shortgen_core::job::GenerationJob;
use shortgen_core::script::ScriptDraft;
use shortgen_core::session::GenerationInputs;
use shortgen_core::topic::TopicCandidate;

use crate::api::{ApiError, GenerationApi, HealthReport, HistoryEntry, SubmitResponse};

/// Remote operations needed to drive one wizard session.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn load_styles(&self) -> Result<StyleCatalog, ApiError>;

    async fn suggest_topics(&self, theme: &str) -> Result<Vec<TopicCandidate>, ApiError>;

    async fn preview_script(&self, inputs: &GenerationInputs) -> Result<ScriptDraft, ApiError>;

    async fn submit_generation(
        &self,
        inputs: &GenerationInputs,
    ) -> Result<SubmitResponse, ApiError>;

    async fn fetch_status(&self, generation_id: &str) -> Result<GenerationJob, ApiError>;

    /// Where the finished video for `generation_id` can be fetched from.
    fn download_url(&self, generation_id: &str) -> String;

    async fn download_video(&self, generation_id: &str, dest: &Path) -> Result<u64, ApiError>;

    async fn health(&self) -> Result<HealthReport, ApiError>;

    async fn history(&self) -> Result<Vec<HistoryEntry>, ApiError>;
}

#[async_trait]
impl GenerationBackend for GenerationApi {
    async fn load_styles(&self) -> Result<StyleCatalog, ApiError> {
        self.get_styles().await
    }

    async fn suggest_topics(&self, theme: &str) -> Result<Vec<TopicCandidate>, ApiError> {
        GenerationApi::suggest_topics(self, theme).await
    }

    async fn preview_script(&self, inputs: &GenerationInputs) -> Result<ScriptDraft, ApiError> {
        GenerationApi::preview_script(self, inputs).await
    }

    async fn submit_generation(
        &self,
        inputs: &GenerationInputs,
    ) -> Result<SubmitResponse, ApiError> {
        GenerationApi::submit_generation(self, inputs).await
    }

    async fn fetch_status(&self, generation_id: &str) -> Result<GenerationJob, ApiError> {
        self.get_status(generation_id).await
    }

    fn download_url(&self, generation_id: &str) -> String {
        GenerationApi::download_url(self, generation_id)
    }

    async fn download_video(&self, generation_id: &str, dest: &Path) -> Result<u64, ApiError> {
        GenerationApi::download_video(self, generation_id, dest).await
    }

    async fn health(&self) -> Result<HealthReport, ApiError> {
        GenerationApi::health(self).await
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>, ApiError> {
        GenerationApi::history(self).await
    }
}
