//! Events emitted by the wizard controller.
//!
//! A UI subscribes through
//! [`WizardController::subscribe`](crate::controller::WizardController::subscribe)
//! and redraws from these instead of diffing session state.

use serde::Serialize;
use shortgen_core::job::JobStatus;
use shortgen_core::types::{JobId, Timestamp};
use shortgen_core::wizard::WizardStep;

/// Broadcast channel capacity for wizard events.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// A state change in the wizard session.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WizardEvent {
    /// The active step changed.
    StepChanged { from: WizardStep, to: WizardStep },

    /// The style catalog was loaded.
    CatalogLoaded { styles: usize },

    /// A new suggestion list replaced the old one.
    SuggestionsUpdated { count: usize },

    /// A script preview arrived and replaced any previous draft.
    DraftReady { title: String, scenes: usize },

    /// A generation job was accepted by the backend.
    JobSubmitted { job_id: JobId },

    /// A non-terminal job snapshot arrived.
    JobProgress {
        job_id: JobId,
        status: JobStatus,
        /// Completion percentage (0-100).
        progress: u8,
        current_step: String,
    },

    /// The job completed successfully.
    JobCompleted {
        job_id: JobId,
        video_url: Option<String>,
    },

    /// The job reached the `failed` state.
    JobFailed { job_id: JobId, message: String },

    /// A status fetch failed; polling continues.
    PollRetrying {
        job_id: JobId,
        attempt: u32,
        message: String,
    },

    /// Polling stopped after too many consecutive fetch failures.
    TrackingLost { job_id: JobId, message: String },

    /// The session error slot was set.
    ErrorRaised { message: String },

    /// The session was reset to its first step.
    Reset { at: Timestamp },
}
