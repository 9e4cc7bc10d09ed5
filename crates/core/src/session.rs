//! Wizard session state and transition rules.
//!
//! [`WizardSession`] is the single state container for one run of the
//! wizard. It enforces the step guards and the one-job-at-a-time rule but
//! performs no IO: the controller in `shortgen-client` calls the backend and
//! feeds results in through [`WizardSession::accept_draft`],
//! [`WizardSession::begin_job`] and [`WizardSession::apply_snapshot`].
//!
//! Methods that fail leave the session untouched. The error slot is managed
//! by the caller so that every failure path records its message in one
//! place.

use serde::Serialize;

use crate::catalog::{validate_voice_id, StyleCatalog, DEFAULT_VOICE_ID};
use crate::error::CoreError;
use crate::job::{GenerationJob, JobStatus};
use crate::script::ScriptDraft;
use crate::topic::{validate_topic, TopicCandidate};
use crate::types::{JobId, VoiceId};
use crate::wizard::{TopicMode, WizardStep};

/// Everything the backend needs for a preview or a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationInputs {
    pub topic: String,
    pub style: String,
    pub voice_id: VoiceId,
}

/// What applying a job snapshot did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotOutcome {
    /// The snapshot belongs to a job that is no longer tracked (reset, a
    /// newer submission, or a job that already reached a terminal state).
    Stale,
    /// The job is still queued or processing.
    InProgress,
    /// The job completed; the wizard moved to [`WizardStep::Completed`].
    Completed,
    /// The job failed with the given user-facing message.
    Failed(String),
}

impl SnapshotOutcome {
    /// Whether polling should stop after this outcome.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// State of one wizard run.
#[derive(Debug, Clone, Serialize)]
pub struct WizardSession {
    step: WizardStep,
    topic_mode: TopicMode,
    theme: String,
    direct_topic: String,
    suggestions: Vec<TopicCandidate>,
    selected_suggestion: Option<String>,
    catalog: StyleCatalog,
    catalog_loaded: bool,
    selected_style: Option<String>,
    voice_id: VoiceId,
    preview_enabled: bool,
    draft: Option<ScriptDraft>,
    job: Option<GenerationJob>,
    busy: bool,
    error: Option<String>,
}

impl Default for WizardSession {
    fn default() -> Self {
        Self {
            step: WizardStep::TopicSelection,
            topic_mode: TopicMode::default(),
            theme: String::new(),
            direct_topic: String::new(),
            suggestions: Vec::new(),
            selected_suggestion: None,
            catalog: StyleCatalog::default(),
            catalog_loaded: false,
            selected_style: None,
            voice_id: DEFAULT_VOICE_ID,
            preview_enabled: false,
            draft: None,
            job: None,
            busy: false,
            error: None,
        }
    }
}

impl WizardSession {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- read access ----

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn topic_mode(&self) -> TopicMode {
        self.topic_mode
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn direct_topic(&self) -> &str {
        &self.direct_topic
    }

    pub fn suggestions(&self) -> &[TopicCandidate] {
        &self.suggestions
    }

    pub fn selected_suggestion(&self) -> Option<&str> {
        self.selected_suggestion.as_deref()
    }

    pub fn catalog(&self) -> &StyleCatalog {
        &self.catalog
    }

    /// Whether the style catalog has been fetched successfully.
    pub fn catalog_loaded(&self) -> bool {
        self.catalog_loaded
    }

    pub fn selected_style(&self) -> Option<&str> {
        self.selected_style.as_deref()
    }

    pub fn voice_id(&self) -> VoiceId {
        self.voice_id
    }

    pub fn preview_enabled(&self) -> bool {
        self.preview_enabled
    }

    pub fn draft(&self) -> Option<&ScriptDraft> {
        self.draft.as_ref()
    }

    pub fn job(&self) -> Option<&GenerationJob> {
        self.job.as_ref()
    }

    /// Whether a one-shot backend call is outstanding.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// The single user-visible error message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The topic that would be used right now, according to the topic mode.
    ///
    /// Theme mode uses the selected suggestion; direct mode uses the typed
    /// text verbatim, as long as it is not blank.
    pub fn active_topic(&self) -> Option<&str> {
        match self.topic_mode {
            TopicMode::Theme => self.selected_suggestion.as_deref(),
            TopicMode::Direct => {
                if self.direct_topic.trim().is_empty() {
                    None
                } else {
                    Some(self.direct_topic.as_str())
                }
            }
        }
    }

    /// Whether a job is queued or processing.
    pub fn job_in_flight(&self) -> bool {
        self.job.as_ref().is_some_and(GenerationJob::is_in_flight)
    }

    /// The finished job, once the wizard reached [`WizardStep::Completed`].
    pub fn completed_job(&self) -> Option<&GenerationJob> {
        match (&self.step, &self.job) {
            (WizardStep::Completed, Some(job)) if job.status == JobStatus::Completed => Some(job),
            _ => None,
        }
    }

    // ---- topic step ----

    pub fn set_topic_mode(&mut self, mode: TopicMode) -> Result<(), CoreError> {
        self.ensure_step(WizardStep::TopicSelection)?;
        self.topic_mode = mode;
        Ok(())
    }

    pub fn set_theme(&mut self, theme: impl Into<String>) -> Result<(), CoreError> {
        self.ensure_step(WizardStep::TopicSelection)?;
        self.theme = theme.into();
        Ok(())
    }

    pub fn set_direct_topic(&mut self, topic: impl Into<String>) -> Result<(), CoreError> {
        self.ensure_step(WizardStep::TopicSelection)?;
        self.direct_topic = topic.into();
        Ok(())
    }

    /// Replace the suggestion list wholesale.
    ///
    /// A previously selected title survives only if it is still offered.
    pub fn replace_suggestions(&mut self, suggestions: Vec<TopicCandidate>) {
        if let Some(selected) = &self.selected_suggestion {
            if !suggestions.iter().any(|s| &s.title == selected) {
                self.selected_suggestion = None;
            }
        }
        self.suggestions = suggestions;
    }

    /// Pick one of the current suggestions by title.
    ///
    /// Selecting the already-selected title is a no-op.
    pub fn select_suggestion(&mut self, title: &str) -> Result<(), CoreError> {
        self.ensure_step(WizardStep::TopicSelection)?;
        if self.selected_suggestion.as_deref() == Some(title) {
            return Ok(());
        }
        if !self.suggestions.iter().any(|s| s.title == title) {
            return Err(CoreError::Validation(format!(
                "'{title}' is not one of the current suggestions"
            )));
        }
        self.selected_suggestion = Some(title.to_string());
        Ok(())
    }

    // ---- style and voice steps ----

    /// Install the catalog fetched at session start.
    pub fn install_catalog(&mut self, catalog: StyleCatalog) {
        self.catalog = catalog;
        self.catalog_loaded = true;
    }

    pub fn select_style(&mut self, id: &str) -> Result<(), CoreError> {
        self.ensure_step(WizardStep::StyleSelection)?;
        self.catalog.validate_style_id(id)?;
        self.selected_style = Some(id.to_string());
        Ok(())
    }

    pub fn select_voice(&mut self, id: VoiceId) -> Result<(), CoreError> {
        self.ensure_step(WizardStep::AudioSettings)?;
        validate_voice_id(id)?;
        self.voice_id = id;
        Ok(())
    }

    pub fn set_preview_enabled(&mut self, enabled: bool) -> Result<(), CoreError> {
        self.ensure_step(WizardStep::AudioSettings)?;
        self.preview_enabled = enabled;
        Ok(())
    }

    // ---- navigation ----

    /// Advance one of the purely local transitions.
    ///
    /// `TopicSelection → StyleSelection` needs a topic and
    /// `StyleSelection → AudioSettings` needs a style. Every later step
    /// advances only through a successful preview, submission or poll.
    pub fn advance(&mut self) -> Result<WizardStep, CoreError> {
        let next = match self.step {
            WizardStep::TopicSelection => {
                if self.active_topic().is_none() {
                    return Err(CoreError::Validation(
                        "Select or enter a topic first".to_string(),
                    ));
                }
                WizardStep::StyleSelection
            }
            WizardStep::StyleSelection => {
                if self.selected_style.is_none() {
                    return Err(CoreError::Validation("Select a style first".to_string()));
                }
                WizardStep::AudioSettings
            }
            WizardStep::AudioSettings => {
                let action = if self.preview_enabled {
                    "preview the script"
                } else {
                    "start generation"
                };
                return Err(CoreError::Validation(format!(
                    "Voice settings advance by requesting to {action}"
                )));
            }
            WizardStep::ScriptPreview => {
                return Err(CoreError::Validation(
                    "The preview step advances by starting generation".to_string(),
                ));
            }
            WizardStep::GenerationInProgress => {
                return Err(CoreError::Validation(
                    "Generation finishes when the job completes".to_string(),
                ));
            }
            WizardStep::Completed => {
                return Err(CoreError::Validation(
                    "The wizard is already complete".to_string(),
                ));
            }
        };
        self.step = next;
        Ok(next)
    }

    /// Go back one step. Keeps every selection; only the focus moves.
    pub fn back(&mut self) -> Result<WizardStep, CoreError> {
        let previous = self.step.previous().ok_or_else(|| {
            CoreError::Validation(format!("Cannot go back from the {} step", self.step))
        })?;
        self.step = previous;
        Ok(previous)
    }

    /// Return to the first step and drop all session data.
    ///
    /// The style catalog is kept: it is fetched once per session start.
    pub fn reset(&mut self) {
        let catalog = std::mem::take(&mut self.catalog);
        let catalog_loaded = self.catalog_loaded;
        *self = Self {
            catalog,
            catalog_loaded,
            ..Self::default()
        };
    }

    // ---- remote-backed transitions ----

    /// Inputs for a script preview, checked against the preview guard.
    pub fn preview_inputs(&self) -> Result<GenerationInputs, CoreError> {
        match self.step {
            WizardStep::AudioSettings | WizardStep::ScriptPreview => {}
            other => {
                return Err(CoreError::Validation(format!(
                    "A script preview cannot be requested from the {other} step"
                )));
            }
        }
        if !self.preview_enabled {
            return Err(CoreError::Validation(
                "Script preview is disabled".to_string(),
            ));
        }
        let topic = self.active_topic().unwrap_or_default();
        self.checked_inputs(topic)
    }

    /// Inputs for a generation request, checked against the submission
    /// guard.
    ///
    /// From [`WizardStep::ScriptPreview`] the previewed title becomes the
    /// topic.
    pub fn submission_inputs(&self) -> Result<GenerationInputs, CoreError> {
        if self.job_in_flight() {
            return Err(CoreError::Conflict(
                "A generation job is already in progress".to_string(),
            ));
        }
        let topic = match self.step {
            WizardStep::AudioSettings if self.preview_enabled => {
                return Err(CoreError::Validation(
                    "Preview is enabled; preview the script before generating".to_string(),
                ));
            }
            WizardStep::AudioSettings => self.active_topic().unwrap_or_default(),
            WizardStep::ScriptPreview => match &self.draft {
                Some(draft) => draft.title.as_str(),
                None => self.active_topic().unwrap_or_default(),
            },
            other => {
                return Err(CoreError::Validation(format!(
                    "Generation cannot be started from the {other} step"
                )));
            }
        };
        self.checked_inputs(topic)
    }

    /// Store a fresh preview, replacing any previous draft, and move to the
    /// preview step.
    pub fn accept_draft(&mut self, draft: ScriptDraft) {
        self.draft = Some(draft);
        self.step = WizardStep::ScriptPreview;
    }

    /// Start tracking a newly submitted job, discarding any previous record.
    pub fn begin_job(&mut self, id: JobId) {
        self.job = Some(GenerationJob::queued(id));
        self.step = WizardStep::GenerationInProgress;
    }

    /// Replace the tracked job with a fresh snapshot.
    ///
    /// Snapshots for a different job, or arriving after the tracked job
    /// already reached a terminal state, are ignored.
    pub fn apply_snapshot(&mut self, snapshot: GenerationJob) -> SnapshotOutcome {
        let tracked = matches!(
            &self.job,
            Some(job) if job.id == snapshot.id && job.is_in_flight()
        );
        if !tracked || self.step != WizardStep::GenerationInProgress {
            return SnapshotOutcome::Stale;
        }

        let outcome = match snapshot.status {
            JobStatus::Queued | JobStatus::Processing => SnapshotOutcome::InProgress,
            JobStatus::Completed => {
                self.step = WizardStep::Completed;
                SnapshotOutcome::Completed
            }
            JobStatus::Failed => SnapshotOutcome::Failed(snapshot.failure_message()),
        };
        self.job = Some(snapshot);
        outcome
    }

    // ---- error slot and busy flag ----

    /// Record an error message, replacing any previous one.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    // ---- private helpers ----

    fn ensure_step(&self, expected: WizardStep) -> Result<(), CoreError> {
        if self.step != expected {
            return Err(CoreError::Validation(format!(
                "This can only be changed on the {expected} step (currently on {})",
                self.step
            )));
        }
        Ok(())
    }

    fn checked_inputs(&self, topic: &str) -> Result<GenerationInputs, CoreError> {
        validate_topic(topic)?;
        let style = self.selected_style.as_deref().unwrap_or_default();
        self.catalog.validate_style_id(style)?;
        validate_voice_id(self.voice_id)?;
        Ok(GenerationInputs {
            topic: topic.to_string(),
            style: style.to_string(),
            voice_id: self.voice_id,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StyleOption;
    use crate::script::Scene;
    use crate::wizard::ALL_STEPS;
    use assert_matches::assert_matches;

    fn candidate(title: &str) -> TopicCandidate {
        TopicCandidate {
            title: title.to_string(),
            description: "...".to_string(),
            estimated_views: "50K".to_string(),
        }
    }

    fn catalog() -> StyleCatalog {
        StyleCatalog {
            styles: vec![StyleOption {
                id: "anime".into(),
                name: "Anime".into(),
                description: "Vivid".into(),
                consistency_keywords: vec![],
            }],
        }
    }

    fn draft(title: &str, scenes: usize) -> ScriptDraft {
        ScriptDraft {
            title: title.to_string(),
            style: "anime".to_string(),
            scenes: (0..scenes)
                .map(|i| Scene {
                    text: format!("scene {i}"),
                    visual_concept: "concept".into(),
                    duration: 5.0,
                })
                .collect(),
        }
    }

    /// A session sitting on the voice settings step with everything chosen.
    fn at_audio_settings() -> WizardSession {
        let mut s = WizardSession::new();
        s.install_catalog(catalog());
        s.replace_suggestions(vec![candidate("3 Morning Habits")]);
        s.select_suggestion("3 Morning Habits").unwrap();
        s.advance().unwrap();
        s.select_style("anime").unwrap();
        s.advance().unwrap();
        s
    }

    fn snapshot(id: &str, status: JobStatus, progress: u8) -> GenerationJob {
        GenerationJob {
            status,
            progress,
            ..GenerationJob::queued(id)
        }
    }

    // -- topic step --

    #[test]
    fn new_session_starts_on_topic_selection() {
        let s = WizardSession::new();
        assert_eq!(s.step(), WizardStep::TopicSelection);
        assert_eq!(s.voice_id(), DEFAULT_VOICE_ID);
        assert!(s.error().is_none());
    }

    #[test]
    fn selecting_suggestion_twice_is_idempotent() {
        let mut s = WizardSession::new();
        s.replace_suggestions(vec![candidate("a"), candidate("b")]);
        s.select_suggestion("a").unwrap();
        let before = s.suggestions().to_vec();

        s.select_suggestion("a").unwrap();

        assert_eq!(s.suggestions(), before.as_slice());
        assert_eq!(s.selected_suggestion(), Some("a"));
    }

    #[test]
    fn selecting_unknown_suggestion_fails() {
        let mut s = WizardSession::new();
        s.replace_suggestions(vec![candidate("a")]);
        assert_matches!(s.select_suggestion("z"), Err(CoreError::Validation(_)));
        assert!(s.selected_suggestion().is_none());
    }

    #[test]
    fn replacing_suggestions_drops_stale_selection() {
        let mut s = WizardSession::new();
        s.replace_suggestions(vec![candidate("a")]);
        s.select_suggestion("a").unwrap();
        s.replace_suggestions(vec![candidate("b")]);
        assert!(s.selected_suggestion().is_none());
    }

    #[test]
    fn direct_mode_uses_typed_topic() {
        let mut s = WizardSession::new();
        s.set_topic_mode(TopicMode::Direct).unwrap();
        s.set_direct_topic("Traits of people who gain weight").unwrap();
        assert_eq!(s.active_topic(), Some("Traits of people who gain weight"));
        assert_eq!(s.advance().unwrap(), WizardStep::StyleSelection);
    }

    #[test]
    fn blank_direct_topic_does_not_count() {
        let mut s = WizardSession::new();
        s.set_topic_mode(TopicMode::Direct).unwrap();
        s.set_direct_topic("   ").unwrap();
        assert!(s.active_topic().is_none());
    }

    // -- guards --

    #[test]
    fn advancing_without_topic_keeps_step() {
        let mut s = WizardSession::new();
        assert_matches!(s.advance(), Err(CoreError::Validation(_)));
        assert_eq!(s.step(), WizardStep::TopicSelection);
    }

    #[test]
    fn advancing_without_style_keeps_step() {
        let mut s = WizardSession::new();
        s.set_topic_mode(TopicMode::Direct).unwrap();
        s.set_direct_topic("topic").unwrap();
        s.advance().unwrap();
        assert_matches!(s.advance(), Err(CoreError::Validation(_)));
        assert_eq!(s.step(), WizardStep::StyleSelection);
    }

    #[test]
    fn local_advance_never_skips_remote_steps() {
        let mut s = at_audio_settings();
        assert!(s.advance().is_err());
        assert_eq!(s.step(), WizardStep::AudioSettings);

        s.set_preview_enabled(true).unwrap();
        s.accept_draft(draft("t", 1));
        assert!(s.advance().is_err());
        assert_eq!(s.step(), WizardStep::ScriptPreview);

        s.begin_job("j".into());
        assert!(s.advance().is_err());
        assert_eq!(s.step(), WizardStep::GenerationInProgress);
    }

    #[test]
    fn selections_are_rejected_off_their_step() {
        let mut s = WizardSession::new();
        s.install_catalog(catalog());
        assert!(s.select_style("anime").is_err());
        assert!(s.select_voice(2).is_err());
        assert!(s.set_preview_enabled(true).is_err());
        assert!(s.selected_style().is_none());
    }

    #[test]
    fn unknown_voice_is_rejected() {
        let mut s = at_audio_settings();
        assert_matches!(s.select_voice(42), Err(CoreError::Validation(_)));
        assert_eq!(s.voice_id(), DEFAULT_VOICE_ID);
        s.select_voice(2).unwrap();
        assert_eq!(s.voice_id(), 2);
    }

    // -- back --

    #[test]
    fn back_keeps_selections() {
        let mut s = at_audio_settings();
        assert_eq!(s.back().unwrap(), WizardStep::StyleSelection);
        assert_eq!(s.back().unwrap(), WizardStep::TopicSelection);
        assert_eq!(s.selected_style(), Some("anime"));
        assert_eq!(s.active_topic(), Some("3 Morning Habits"));
    }

    #[test]
    fn no_back_out_of_generation() {
        let mut s = at_audio_settings();
        s.begin_job("j".into());
        assert!(s.back().is_err());
        assert_eq!(s.step(), WizardStep::GenerationInProgress);
    }

    // -- preview and submission inputs --

    #[test]
    fn preview_requires_flag() {
        let s = at_audio_settings();
        assert_matches!(s.preview_inputs(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn preview_inputs_carry_selections() {
        let mut s = at_audio_settings();
        s.select_voice(2).unwrap();
        s.set_preview_enabled(true).unwrap();
        let inputs = s.preview_inputs().unwrap();
        assert_eq!(inputs.topic, "3 Morning Habits");
        assert_eq!(inputs.style, "anime");
        assert_eq!(inputs.voice_id, 2);
    }

    #[test]
    fn submission_blocked_while_preview_enabled_on_audio_step() {
        let mut s = at_audio_settings();
        s.set_preview_enabled(true).unwrap();
        assert_matches!(s.submission_inputs(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn submission_from_preview_uses_draft_title() {
        let mut s = at_audio_settings();
        s.set_preview_enabled(true).unwrap();
        s.accept_draft(draft("Three Habits for Mornings", 3));
        let inputs = s.submission_inputs().unwrap();
        assert_eq!(inputs.topic, "Three Habits for Mornings");
    }

    #[test]
    fn submission_while_job_in_flight_conflicts() {
        let mut s = at_audio_settings();
        s.begin_job("j1".into());
        assert_matches!(s.submission_inputs(), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn new_draft_replaces_old_one() {
        let mut s = at_audio_settings();
        s.set_preview_enabled(true).unwrap();
        s.accept_draft(draft("first", 5));
        s.accept_draft(draft("second", 3));
        let d = s.draft().unwrap();
        assert_eq!(d.title, "second");
        assert_eq!(d.scenes.len(), 3);
    }

    // -- snapshots --

    #[test]
    fn begin_job_tracks_queued_record() {
        let mut s = at_audio_settings();
        s.begin_job("g-1".into());
        let job = s.job().unwrap();
        assert_eq!(job.id, "g-1");
        assert_eq!(job.status, JobStatus::Queued);
        assert!(s.job_in_flight());
    }

    #[test]
    fn completed_snapshot_finishes_wizard() {
        let mut s = at_audio_settings();
        s.begin_job("g-1".into());

        let progress = s.apply_snapshot(snapshot("g-1", JobStatus::Processing, 40));
        assert_eq!(progress, SnapshotOutcome::InProgress);
        assert_eq!(s.job().unwrap().progress, 40);

        let mut done = snapshot("g-1", JobStatus::Completed, 100);
        done.video_url = Some("https://cdn.example/v1.mp4".into());
        assert_eq!(s.apply_snapshot(done), SnapshotOutcome::Completed);
        assert_eq!(s.step(), WizardStep::Completed);
        assert_eq!(
            s.completed_job().unwrap().video_url.as_deref(),
            Some("https://cdn.example/v1.mp4")
        );
    }

    #[test]
    fn failed_snapshot_stays_on_generation_step() {
        let mut s = at_audio_settings();
        s.begin_job("g-1".into());
        let mut failed = snapshot("g-1", JobStatus::Failed, 10);
        failed.error_message = Some("out of credits".into());

        assert_eq!(
            s.apply_snapshot(failed),
            SnapshotOutcome::Failed("out of credits".into())
        );
        assert_eq!(s.step(), WizardStep::GenerationInProgress);
        assert!(!s.job_in_flight());
        assert!(s.completed_job().is_none());
    }

    #[test]
    fn snapshots_after_terminal_state_are_stale() {
        let mut s = at_audio_settings();
        s.begin_job("g-1".into());
        s.apply_snapshot(snapshot("g-1", JobStatus::Failed, 0));
        assert_eq!(
            s.apply_snapshot(snapshot("g-1", JobStatus::Processing, 50)),
            SnapshotOutcome::Stale
        );
        assert_eq!(s.job().unwrap().status, JobStatus::Failed);
    }

    #[test]
    fn snapshot_for_other_job_is_stale() {
        let mut s = at_audio_settings();
        s.begin_job("g-2".into());
        assert_eq!(
            s.apply_snapshot(snapshot("g-1", JobStatus::Completed, 100)),
            SnapshotOutcome::Stale
        );
        assert_eq!(s.step(), WizardStep::GenerationInProgress);
    }

    // -- reset --

    #[test]
    fn reset_from_every_step_clears_session() {
        for target in ALL_STEPS {
            let mut s = at_audio_settings();
            s.set_preview_enabled(true).unwrap();
            s.set_error("boom");
            match target {
                WizardStep::TopicSelection => {
                    s.back().unwrap();
                    s.back().unwrap();
                }
                WizardStep::StyleSelection => {
                    s.back().unwrap();
                }
                WizardStep::AudioSettings => {}
                WizardStep::ScriptPreview => s.accept_draft(draft("t", 2)),
                WizardStep::GenerationInProgress => s.begin_job("j".into()),
                WizardStep::Completed => {
                    s.begin_job("j".into());
                    s.apply_snapshot(snapshot("j", JobStatus::Completed, 100));
                }
            }
            assert_eq!(s.step(), target);

            s.reset();

            assert_eq!(s.step(), WizardStep::TopicSelection);
            assert!(s.active_topic().is_none());
            assert!(s.suggestions().is_empty());
            assert!(s.selected_style().is_none());
            assert!(s.draft().is_none());
            assert!(s.job().is_none());
            assert!(s.error().is_none());
            assert!(!s.preview_enabled());
            assert!(s.catalog_loaded(), "catalog survives reset");
        }
    }
}
