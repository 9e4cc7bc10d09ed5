//! Wizard controller.
//!
//! [`WizardController`] owns one [`WizardSession`] and is the only thing
//! that mutates it. Every user action goes through a controller method,
//! which checks the session's guards, calls the backend when needed, and
//! converts every failure into the session's single error slot before
//! returning it. Job status arrives from a poll task (see
//! [`crate::poller`]) and is applied when the owner calls
//! [`WizardController::next_update`].

use std::path::Path;
use std::sync::Arc;

use shortgen_core::catalog::StyleCatalog;
use shortgen_core::error::CoreError;
use shortgen_core::job::GenerationJob;
use shortgen_core::script::ScriptDraft;
use shortgen_core::session::{SnapshotOutcome, WizardSession};
use shortgen_core::topic::{validate_theme, TopicCandidate};
use shortgen_core::types::{JobId, VoiceId};
use shortgen_core::wizard::{TopicMode, WizardStep};
use tokio::sync::broadcast;

use crate::api::{ApiError, HealthReport, HistoryEntry};
use crate::backend::GenerationBackend;
use crate::events::{WizardEvent, EVENT_CHANNEL_CAPACITY};
use crate::poller::{spawn_poller, PollConfig, PollHandle, PollUpdate};

/// What one applied poll update meant for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The job is still queued or processing.
    InProgress { progress: u8 },
    /// The job completed and the wizard reached [`WizardStep::Completed`].
    Completed,
    /// The job failed; the message is in the error slot.
    Failed(String),
    /// A status fetch failed and will be retried.
    Retrying { attempt: u32 },
    /// Polling gave up after repeated fetch failures.
    TrackingLost(String),
}

impl PollOutcome {
    /// Whether polling has stopped.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed(_) | Self::TrackingLost(_)
        )
    }
}

/// Drives one wizard session against a generation backend.
pub struct WizardController {
    backend: Arc<dyn GenerationBackend>,
    session: WizardSession,
    poll_config: PollConfig,
    /// The single active poll loop, if any.
    poll: Option<PollHandle>,
    event_tx: broadcast::Sender<WizardEvent>,
}

impl WizardController {
    pub fn new(backend: Arc<dyn GenerationBackend>, poll_config: PollConfig) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            backend,
            session: WizardSession::new(),
            poll_config,
            poll: None,
            event_tx,
        }
    }

    /// Read-only view of the session for rendering.
    pub fn session(&self) -> &WizardSession {
        &self.session
    }

    /// Subscribe to wizard events.
    pub fn subscribe(&self) -> broadcast::Receiver<WizardEvent> {
        self.event_tx.subscribe()
    }

    /// Whether a poll loop is currently attached.
    pub fn is_polling(&self) -> bool {
        self.poll.is_some()
    }

    // -----------------------------------------------------------------------
    // Catalog
    // -----------------------------------------------------------------------

    /// Fetch the style catalog. Called once at session start; later calls
    /// return the held catalog without a request.
    ///
    /// On failure the catalog stays empty, which style selection tolerates.
    pub async fn load_catalog(&mut self) -> Result<&StyleCatalog, CoreError> {
        if self.session.catalog_loaded() {
            return Ok(self.session.catalog());
        }
        self.ensure_idle()?;
        let result = {
            let _busy = BusyGuard::raise(&mut self.session);
            self.backend.load_styles().await
        };

        match result {
            Ok(catalog) => {
                let styles = catalog.styles.len();
                self.session.install_catalog(catalog);
                self.session.clear_error();
                tracing::info!(styles, "Style catalog loaded");
                self.emit(WizardEvent::CatalogLoaded { styles });
                Ok(self.session.catalog())
            }
            Err(e) => self.fail(remote("Failed to load styles", &e)),
        }
    }

    // -----------------------------------------------------------------------
    // Topic step
    // -----------------------------------------------------------------------

    pub fn set_topic_mode(&mut self, mode: TopicMode) -> Result<(), CoreError> {
        self.local(|s| s.set_topic_mode(mode))
    }

    pub fn set_direct_topic(&mut self, topic: &str) -> Result<(), CoreError> {
        self.local(|s| s.set_direct_topic(topic))
    }

    /// Ask the backend for topics matching `theme`.
    ///
    /// The suggestion list is replaced wholesale on success and kept as-is
    /// on failure.
    pub async fn suggest_topics(&mut self, theme: &str) -> Result<&[TopicCandidate], CoreError> {
        let theme = match validate_theme(theme) {
            Ok(theme) => theme.to_string(),
            Err(e) => return self.fail(e),
        };
        if let Err(e) = self.session.set_theme(theme.clone()) {
            return self.fail(e);
        }
        self.ensure_idle()?;
        let result = {
            let _busy = BusyGuard::raise(&mut self.session);
            self.backend.suggest_topics(&theme).await
        };

        match result {
            Ok(suggestions) => {
                let count = suggestions.len();
                self.session.replace_suggestions(suggestions);
                self.session.clear_error();
                tracing::info!(theme = %theme, count, "Topic suggestions received");
                self.emit(WizardEvent::SuggestionsUpdated { count });
                Ok(self.session.suggestions())
            }
            Err(e) => self.fail(remote("Failed to suggest topics", &e)),
        }
    }

    /// Pick a suggestion. Picking the same title again changes nothing.
    pub fn select_suggestion(&mut self, title: &str) -> Result<(), CoreError> {
        self.local(|s| s.select_suggestion(title))
    }

    // -----------------------------------------------------------------------
    // Style and voice steps
    // -----------------------------------------------------------------------

    pub fn select_style(&mut self, id: &str) -> Result<(), CoreError> {
        self.local(|s| s.select_style(id))
    }

    pub fn select_voice(&mut self, id: VoiceId) -> Result<(), CoreError> {
        self.local(|s| s.select_voice(id))
    }

    pub fn set_preview_enabled(&mut self, enabled: bool) -> Result<(), CoreError> {
        self.local(|s| s.set_preview_enabled(enabled))
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Take a local forward transition (topic → style → voice).
    pub fn advance(&mut self) -> Result<WizardStep, CoreError> {
        self.local(WizardSession::advance)
    }

    pub fn back(&mut self) -> Result<WizardStep, CoreError> {
        self.local(WizardSession::back)
    }

    /// Abandon everything and return to the first step.
    ///
    /// Cancels any running poll loop; no fetch for the old job is started
    /// afterwards.
    pub fn reset(&mut self) {
        self.stop_polling();
        let before = self.session.step();
        self.session.reset();
        tracing::info!("Wizard reset");
        self.emit(WizardEvent::Reset {
            at: chrono::Utc::now(),
        });
        self.note_step(before);
    }

    // -----------------------------------------------------------------------
    // Script preview
    // -----------------------------------------------------------------------

    /// Request a script preview and move to the preview step.
    ///
    /// On failure the step and any previous draft are kept.
    pub async fn preview_script(&mut self) -> Result<&ScriptDraft, CoreError> {
        let inputs = match self.session.preview_inputs() {
            Ok(inputs) => inputs,
            Err(e) => return self.fail(e),
        };
        self.ensure_idle()?;
        let result = {
            let _busy = BusyGuard::raise(&mut self.session);
            self.backend.preview_script(&inputs).await
        };

        let draft = match result {
            Ok(draft) => draft,
            Err(e) => return self.fail(remote("Failed to generate the script preview", &e)),
        };

        let before = self.session.step();
        let event = WizardEvent::DraftReady {
            title: draft.title.clone(),
            scenes: draft.scenes.len(),
        };
        tracing::info!(
            topic = %inputs.topic,
            scenes = draft.scenes.len(),
            "Script preview received",
        );
        self.session.accept_draft(draft);
        self.session.clear_error();
        self.emit(event);
        self.note_step(before);

        self.session
            .draft()
            .ok_or_else(|| CoreError::Internal("Script draft missing after preview".to_string()))
    }

    // -----------------------------------------------------------------------
    // Generation
    // -----------------------------------------------------------------------

    /// Submit the generation request and start polling the new job.
    ///
    /// Fails with [`CoreError::Conflict`] while another job is queued or
    /// processing. On any failure the step is unchanged and no job is
    /// created.
    pub async fn submit_generation(&mut self) -> Result<JobId, CoreError> {
        let inputs = match self.session.submission_inputs() {
            Ok(inputs) => inputs,
            Err(e) => return self.fail(e),
        };
        self.ensure_idle()?;
        let result = {
            let _busy = BusyGuard::raise(&mut self.session);
            self.backend.submit_generation(&inputs).await
        };

        let response = match result {
            Ok(response) => response,
            Err(e) => return self.fail(remote("Failed to start video generation", &e)),
        };
        let job_id = response.generation_id;
        if job_id.trim().is_empty() {
            return self.fail(CoreError::Remote(
                "Backend returned an empty generation id".to_string(),
            ));
        }

        self.stop_polling();
        let before = self.session.step();
        self.session.begin_job(job_id.clone());
        self.session.clear_error();
        tracing::info!(
            job_id = %job_id,
            topic = %inputs.topic,
            style = %inputs.style,
            voice_id = inputs.voice_id,
            estimated_time_secs = ?response.estimated_time,
            "Generation submitted",
        );
        self.emit(WizardEvent::JobSubmitted {
            job_id: job_id.clone(),
        });
        self.note_step(before);

        self.poll = Some(spawn_poller(
            Arc::clone(&self.backend),
            job_id.clone(),
            self.poll_config.clone(),
        ));
        Ok(job_id)
    }

    /// Wait for the next poll update and apply it to the session.
    ///
    /// Returns `None` when no poll loop is attached or the loop has ended.
    pub async fn next_update(&mut self) -> Option<PollOutcome> {
        loop {
            let handle = self.poll.as_mut()?;
            match handle.next().await {
                None => {
                    self.poll = None;
                    return None;
                }
                Some(update) => {
                    if let Some(outcome) = self.apply_update(update) {
                        return Some(outcome);
                    }
                }
            }
        }
    }

    /// Apply poll updates until the job completes, fails, or tracking is
    /// lost. Returns the completed job.
    pub async fn wait_for_completion(&mut self) -> Result<GenerationJob, CoreError> {
        while let Some(outcome) = self.next_update().await {
            match outcome {
                PollOutcome::Completed => break,
                PollOutcome::Failed(message) => return Err(CoreError::JobFailed(message)),
                PollOutcome::TrackingLost(message) => return Err(CoreError::Remote(message)),
                PollOutcome::InProgress { .. } | PollOutcome::Retrying { .. } => {}
            }
        }

        if let Some(job) = self.session.completed_job().cloned() {
            return Ok(job);
        }
        if let Some(job) = self.session.job().filter(|job| !job.is_in_flight()) {
            return Err(CoreError::JobFailed(job.failure_message()));
        }
        self.fail(CoreError::Validation(
            "No generation job is being tracked".to_string(),
        ))
    }

    // -----------------------------------------------------------------------
    // Result
    // -----------------------------------------------------------------------

    /// Where the finished video can be downloaded from.
    pub fn download_url(&mut self) -> Result<String, CoreError> {
        match self.session.completed_job() {
            Some(job) => Ok(self.backend.download_url(&job.id)),
            None => self.fail(CoreError::Validation(
                "The video is not ready yet".to_string(),
            )),
        }
    }

    /// Save the finished video to `dest`, returning the bytes written.
    pub async fn download_to(&mut self, dest: &Path) -> Result<u64, CoreError> {
        let job_id = match self.session.completed_job() {
            Some(job) => job.id.clone(),
            None => {
                return self.fail(CoreError::Validation(
                    "The video is not ready yet".to_string(),
                ))
            }
        };
        self.ensure_idle()?;
        let result = {
            let _busy = BusyGuard::raise(&mut self.session);
            self.backend.download_video(&job_id, dest).await
        };

        match result {
            Ok(bytes) => {
                self.session.clear_error();
                Ok(bytes)
            }
            Err(e) => self.fail(remote("Failed to download the video", &e)),
        }
    }

    // -----------------------------------------------------------------------
    // Backend utilities
    // -----------------------------------------------------------------------

    pub async fn health(&mut self) -> Result<HealthReport, CoreError> {
        match self.backend.health().await {
            Ok(report) => Ok(report),
            Err(e) => self.fail(remote("Backend health check failed", &e)),
        }
    }

    /// Recent generations for the configured user.
    pub async fn history(&mut self) -> Result<Vec<HistoryEntry>, CoreError> {
        match self.backend.history().await {
            Ok(entries) => Ok(entries),
            Err(e) => self.fail(remote("Failed to load generation history", &e)),
        }
    }

    // ---- private helpers ----

    /// Run a purely local session mutation, recording failures.
    fn local<T>(
        &mut self,
        op: impl FnOnce(&mut WizardSession) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        let before = self.session.step();
        match op(&mut self.session) {
            Ok(value) => {
                self.session.clear_error();
                self.note_step(before);
                Ok(value)
            }
            Err(e) => self.fail(e),
        }
    }

    /// Refuse a one-shot backend call while another is outstanding.
    fn ensure_idle(&mut self) -> Result<(), CoreError> {
        if self.session.is_busy() {
            return self.fail(CoreError::Conflict(
                "Another request is still in progress".to_string(),
            ));
        }
        Ok(())
    }

    fn apply_update(&mut self, update: PollUpdate) -> Option<PollOutcome> {
        match update {
            PollUpdate::Snapshot(job) => {
                let job_id = job.id.clone();
                let progress = job.progress;
                let status = job.status;
                let current_step = job.current_step.clone();
                let video_url = job.video_url.clone();
                let before = self.session.step();

                match self.session.apply_snapshot(job) {
                    SnapshotOutcome::Stale => {
                        tracing::warn!(job_id = %job_id, "Ignoring snapshot for an untracked job");
                        None
                    }
                    SnapshotOutcome::InProgress => {
                        self.session.clear_error();
                        self.emit(WizardEvent::JobProgress {
                            job_id,
                            status,
                            progress,
                            current_step,
                        });
                        Some(PollOutcome::InProgress { progress })
                    }
                    SnapshotOutcome::Completed => {
                        self.poll = None;
                        self.session.clear_error();
                        tracing::info!(job_id = %job_id, video_url = ?video_url, "Generation completed");
                        self.emit(WizardEvent::JobCompleted { job_id, video_url });
                        self.note_step(before);
                        Some(PollOutcome::Completed)
                    }
                    SnapshotOutcome::Failed(message) => {
                        self.poll = None;
                        tracing::error!(job_id = %job_id, error = %message, "Generation failed");
                        self.session.set_error(message.clone());
                        self.emit(WizardEvent::JobFailed {
                            job_id,
                            message: message.clone(),
                        });
                        self.emit(WizardEvent::ErrorRaised {
                            message: message.clone(),
                        });
                        Some(PollOutcome::Failed(message))
                    }
                }
            }
            PollUpdate::FetchFailed { attempt, error, .. } => {
                let job_id = self.tracked_in_flight_job()?;
                let message = format!("Could not check generation progress: {error}");
                self.session.set_error(message.clone());
                self.emit(WizardEvent::PollRetrying {
                    job_id,
                    attempt,
                    message: message.clone(),
                });
                self.emit(WizardEvent::ErrorRaised { message });
                Some(PollOutcome::Retrying { attempt })
            }
            PollUpdate::GaveUp { attempts, error } => {
                let job_id = self.tracked_in_flight_job()?;
                self.poll = None;
                let message = format!(
                    "Lost track of the generation job after {attempts} failed status checks: {error}"
                );
                self.session.set_error(message.clone());
                self.emit(WizardEvent::TrackingLost {
                    job_id,
                    message: message.clone(),
                });
                self.emit(WizardEvent::ErrorRaised {
                    message: message.clone(),
                });
                Some(PollOutcome::TrackingLost(message))
            }
        }
    }

    fn tracked_in_flight_job(&self) -> Option<JobId> {
        self.session
            .job()
            .filter(|job| job.is_in_flight())
            .map(|job| job.id.clone())
    }

    fn stop_polling(&mut self) {
        if let Some(handle) = self.poll.take() {
            handle.cancel();
            tracing::debug!(job_id = %handle.job_id(), "Stopped status polling");
        }
    }

    /// Record an error in the session's error slot and return it.
    fn fail<T>(&mut self, err: CoreError) -> Result<T, CoreError> {
        tracing::warn!(step = %self.session.step(), error = %err, "Wizard action failed");
        let message = err.message().to_string();
        self.session.set_error(message.clone());
        self.emit(WizardEvent::ErrorRaised { message });
        Err(err)
    }

    fn note_step(&self, before: WizardStep) {
        let after = self.session.step();
        if before != after {
            tracing::info!(from = %before, to = %after, "Wizard step changed");
            self.emit(WizardEvent::StepChanged {
                from: before,
                to: after,
            });
        }
    }

    fn emit(&self, event: WizardEvent) {
        // Ignore the SendError; it only means there are zero subscribers.
        let _ = self.event_tx.send(event);
    }
}

/// Holds the session's busy flag up for one backend call.
///
/// The flag drops back when the guard does, including when the calling
/// future is dropped before the call finishes.
struct BusyGuard<'a> {
    session: &'a mut WizardSession,
}

impl<'a> BusyGuard<'a> {
    fn raise(session: &'a mut WizardSession) -> Self {
        session.set_busy(true);
        Self { session }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.session.set_busy(false);
    }
}

fn remote(context: &str, err: &ApiError) -> CoreError {
    CoreError::Remote(format!("{context}: {err}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
