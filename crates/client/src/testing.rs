//! Scripted in-memory backend for unit tests.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use shortgen_core::catalog::{StyleCatalog, StyleOption};
use shortgen_core::job::{GenerationJob, JobStatus};
use shortgen_core::script::{Scene, ScriptDraft};
use shortgen_core::session::GenerationInputs;
use shortgen_core::topic::TopicCandidate;

use crate::api::{ApiError, HealthReport, HistoryEntry, SubmitResponse};
use crate::backend::GenerationBackend;

/// A scripted result: `Err(status)` becomes [`ApiError::ApiError`].
pub type Scripted<T> = Result<T, u16>;

/// Build a job snapshot.
pub fn job(id: &str, status: JobStatus, progress: u8) -> GenerationJob {
    GenerationJob {
        status,
        progress,
        current_step: status.as_str().to_string(),
        ..GenerationJob::queued(id)
    }
}

pub fn anime_catalog() -> StyleCatalog {
    StyleCatalog {
        styles: vec![
            StyleOption {
                id: "anime".into(),
                name: "Anime".into(),
                description: "Vivid cel shading".into(),
                consistency_keywords: vec!["anime style".into()],
            },
            StyleOption {
                id: "ghibli".into(),
                name: "Ghibli".into(),
                description: "Soft watercolour".into(),
                consistency_keywords: vec![],
            },
        ],
    }
}

pub fn candidate(title: &str) -> TopicCandidate {
    TopicCandidate {
        title: title.into(),
        description: "...".into(),
        estimated_views: "50K".into(),
    }
}

pub fn draft(title: &str, scenes: usize) -> ScriptDraft {
    ScriptDraft {
        title: title.into(),
        style: "anime".into(),
        scenes: (1..=scenes)
            .map(|i| Scene {
                text: format!("scene {i}"),
                visual_concept: format!("concept {i}"),
                duration: 5.0,
            })
            .collect(),
    }
}

/// Replays canned responses and counts calls.
///
/// Each queue hands out its items in order and then keeps repeating the
/// last one.
#[derive(Default)]
pub struct ScriptedBackend {
    styles: Mutex<VecDeque<Scripted<StyleCatalog>>>,
    suggestions: Mutex<VecDeque<Scripted<Vec<TopicCandidate>>>>,
    drafts: Mutex<VecDeque<Scripted<ScriptDraft>>>,
    submissions: Mutex<VecDeque<Scripted<String>>>,
    statuses: Mutex<VecDeque<Scripted<GenerationJob>>>,
    submitted: Mutex<Vec<GenerationInputs>>,
    /// Stall the next `suggest_topics` call for this long.
    suggest_delay: Mutex<Option<Duration>>,
    styles_calls: AtomicUsize,
    suggest_calls: AtomicUsize,
    preview_calls: AtomicUsize,
    submit_calls: AtomicUsize,
    status_calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_styles(self, item: Scripted<StyleCatalog>) -> Self {
        self.styles.lock().unwrap().push_back(item);
        self
    }

    pub fn with_suggestions(self, item: Scripted<Vec<TopicCandidate>>) -> Self {
        self.suggestions.lock().unwrap().push_back(item);
        self
    }

    pub fn with_suggest_delay(self, delay: Duration) -> Self {
        *self.suggest_delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn with_draft(self, item: Scripted<ScriptDraft>) -> Self {
        self.drafts.lock().unwrap().push_back(item);
        self
    }

    pub fn with_submission(self, item: Scripted<&str>) -> Self {
        self.submissions
            .lock()
            .unwrap()
            .push_back(item.map(str::to_string));
        self
    }

    pub fn with_statuses(self, items: Vec<Scripted<GenerationJob>>) -> Self {
        self.statuses.lock().unwrap().extend(items);
        self
    }

    pub fn styles_calls(&self) -> usize {
        self.styles_calls.load(Ordering::SeqCst)
    }

    pub fn suggest_calls(&self) -> usize {
        self.suggest_calls.load(Ordering::SeqCst)
    }

    pub fn preview_calls(&self) -> usize {
        self.preview_calls.load(Ordering::SeqCst)
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> Vec<GenerationInputs> {
        self.submitted.lock().unwrap().clone()
    }
}

fn next<T: Clone>(queue: &Mutex<VecDeque<Scripted<T>>>, what: &str) -> Result<T, ApiError> {
    let mut queue = queue.lock().unwrap();
    let item = if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    };
    match item {
        Some(Ok(value)) => Ok(value),
        Some(Err(status)) => Err(ApiError::ApiError {
            status,
            body: format!("scripted {what} failure"),
        }),
        None => Err(ApiError::ApiError {
            status: 501,
            body: format!("no scripted {what}"),
        }),
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn load_styles(&self) -> Result<StyleCatalog, ApiError> {
        self.styles_calls.fetch_add(1, Ordering::SeqCst);
        next(&self.styles, "styles")
    }

    async fn suggest_topics(&self, _theme: &str) -> Result<Vec<TopicCandidate>, ApiError> {
        self.suggest_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.suggest_delay.lock().unwrap().take();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        next(&self.suggestions, "suggestions")
    }

    async fn preview_script(&self, _inputs: &GenerationInputs) -> Result<ScriptDraft, ApiError> {
        self.preview_calls.fetch_add(1, Ordering::SeqCst);
        next(&self.drafts, "draft")
    }

    async fn submit_generation(
        &self,
        inputs: &GenerationInputs,
    ) -> Result<SubmitResponse, ApiError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.submitted.lock().unwrap().push(inputs.clone());
        let generation_id = next(&self.submissions, "submission")?;
        Ok(SubmitResponse {
            generation_id,
            status: Some(JobStatus::Queued),
            estimated_time: Some(120),
        })
    }

    async fn fetch_status(&self, _generation_id: &str) -> Result<GenerationJob, ApiError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        next(&self.statuses, "status")
    }

    fn download_url(&self, generation_id: &str) -> String {
        format!("http://backend.test/api/video/download/{generation_id}")
    }

    async fn download_video(&self, _generation_id: &str, dest: &Path) -> Result<u64, ApiError> {
        let bytes = b"fake mp4";
        tokio::fs::write(dest, bytes).await?;
        Ok(bytes.len() as u64)
    }

    async fn health(&self) -> Result<HealthReport, ApiError> {
        Ok(HealthReport {
            status: "healthy".into(),
            details: Default::default(),
        })
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>, ApiError> {
        Ok(Vec::new())
    }
}
