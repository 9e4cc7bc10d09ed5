//! Generation job snapshots.
//!
//! A [`GenerationJob`] is one fetched representation of a backend job. Each
//! new snapshot replaces the previous one wholesale; nothing is patched.

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::JobId;

/// Message shown when a job fails without a backend-provided reason.
pub const GENERIC_FAILURE_MESSAGE: &str = "Video generation failed";

/// `current_step` text for a freshly submitted job.
pub const QUEUED_STEP_TEXT: &str = "Waiting in queue";

// ---------------------------------------------------------------------------
// Job status
// ---------------------------------------------------------------------------

/// Lifecycle status of a generation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Accepted but not yet picked up. The backend also reports this as
    /// `pending`.
    #[serde(alias = "pending")]
    Queued,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// `completed` and `failed` end polling.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Job snapshot
// ---------------------------------------------------------------------------

/// One snapshot of a generation job, as returned by
/// `GET /api/video/status/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationJob {
    #[serde(rename = "generation_id")]
    pub id: JobId,
    pub status: JobStatus,
    /// Completion percentage, clamped to 0..=100.
    #[serde(deserialize_with = "clamped_progress", default)]
    pub progress: u8,
    /// Free-text description of what the backend is doing right now.
    #[serde(default)]
    pub current_step: String,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl GenerationJob {
    /// The record created locally right after a successful submission,
    /// before the first snapshot arrives.
    pub fn queued(id: impl Into<JobId>) -> Self {
        Self {
            id: id.into(),
            status: JobStatus::Queued,
            progress: 0,
            current_step: QUEUED_STEP_TEXT.to_string(),
            video_url: None,
            error_message: None,
        }
    }

    /// Whether the job is still queued or processing.
    pub fn is_in_flight(&self) -> bool {
        !self.status.is_terminal()
    }

    /// The message to show for a failed job.
    ///
    /// Falls back to [`GENERIC_FAILURE_MESSAGE`] when the backend gave no
    /// reason (or an empty one).
    pub fn failure_message(&self) -> String {
        self.error_message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(GENERIC_FAILURE_MESSAGE)
            .to_string()
    }
}

fn clamped_progress<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    Ok(raw.clamp(0.0, 100.0).round() as u8)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
