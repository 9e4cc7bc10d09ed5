//! Job-status polling engine.
//!
//! [`spawn_poller`] starts a task that fetches a job's status on a fixed
//! interval until the job reaches a terminal state, forwarding every
//! snapshot over a channel. The task never touches wizard state; the
//! controller applies what it receives.
//!
//! Fetch failures do not stop the loop. Consecutive failures back off
//! exponentially and are bounded by
//! [`PollConfig::max_consecutive_errors`]; a successful fetch resets both.
//! The loop is cancelled through a [`CancellationToken`], which
//! [`PollHandle`] triggers when it is dropped.

use std::sync::Arc;
use std::time::Duration;

use shortgen_core::job::GenerationJob;
use shortgen_core::types::JobId;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::backend::GenerationBackend;

/// Buffered updates between the poll task and its consumer. The task
/// waits when the buffer is full, so a slow consumer throttles fetching.
const UPDATE_CHANNEL_CAPACITY: usize = 16;

/// Tunable parameters for status polling.
#[derive(Debug, Clone, PartialEq)]
pub struct PollConfig {
    /// Delay between fetches while the job is queued or processing.
    pub interval: Duration,
    /// Consecutive fetch failures tolerated before giving up. `None`
    /// retries forever.
    pub max_consecutive_errors: Option<u32>,
    /// Upper bound on the delay after repeated failures.
    pub max_backoff: Duration,
    /// Factor by which the delay grows after each further failure.
    pub multiplier: f64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_consecutive_errors: Some(5),
            max_backoff: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

/// Calculate the next backoff delay from the current delay and config.
///
/// The result is clamped to [`PollConfig::max_backoff`].
pub fn next_delay(current: Duration, config: &PollConfig) -> Duration {
    let next_ms = (current.as_millis() as f64 * config.multiplier) as u64;
    Duration::from_millis(next_ms).min(config.max_backoff)
}

/// One message from a running poll loop.
#[derive(Debug, Clone, PartialEq)]
pub enum PollUpdate {
    /// A fresh, authoritative job snapshot.
    Snapshot(GenerationJob),
    /// A fetch failed; the loop will try again after `retry_in`.
    FetchFailed {
        attempt: u32,
        retry_in: Duration,
        error: String,
    },
    /// The retry budget ran out; the loop has stopped.
    GaveUp { attempts: u32, error: String },
}

/// Owner's handle to a running poll loop.
///
/// Dropping the handle cancels the loop.
pub struct PollHandle {
    job_id: JobId,
    cancel: CancellationToken,
    updates: mpsc::Receiver<PollUpdate>,
    task: tokio::task::JoinHandle<()>,
}

impl PollHandle {
    /// The job this loop is tracking.
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Wait for the next update.
    ///
    /// Returns `None` once the loop has stopped and every buffered update
    /// has been consumed.
    pub async fn next(&mut self) -> Option<PollUpdate> {
        self.updates.recv().await
    }

    /// Stop the loop. No fetch is started after this returns.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the loop task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Start polling `job_id` in a background task.
pub fn spawn_poller(
    backend: Arc<dyn GenerationBackend>,
    job_id: JobId,
    config: PollConfig,
) -> PollHandle {
    let (tx, rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);
    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    let task_job_id = job_id.clone();

    let task = tokio::spawn(async move {
        tracing::info!(job_id = %task_job_id, "Starting status polling");
        poll_until_terminal(backend.as_ref(), &task_job_id, &config, &tx, &cancel_clone).await;
        tracing::debug!(job_id = %task_job_id, "Status polling exited");
    });

    PollHandle {
        job_id,
        cancel,
        updates: rx,
        task,
    }
}

/// Fetch `job_id` until a terminal snapshot, budget exhaustion,
/// cancellation, or the receiver going away.
///
/// Fetches are strictly sequential: the next one is scheduled only after
/// the previous one resolved.
pub async fn poll_until_terminal(
    backend: &dyn GenerationBackend,
    job_id: &str,
    config: &PollConfig,
    tx: &mpsc::Sender<PollUpdate>,
    cancel: &CancellationToken,
) {
    let mut failures = 0u32;
    let mut delay = config.interval;

    loop {
        let result = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(job_id, "Status polling cancelled");
                return;
            }
            result = backend.fetch_status(job_id) => result,
        };

        // A snapshot naming another job cannot be applied; count it against
        // the error budget so the user hears about it.
        let result = match result {
            Ok(snapshot) if snapshot.id != job_id => {
                tracing::warn!(
                    job_id,
                    reported_id = %snapshot.id,
                    "Status response names a different job",
                );
                Err(format!(
                    "status response names job '{}' instead of '{job_id}'",
                    snapshot.id
                ))
            }
            other => other.map_err(|e| e.to_string()),
        };

        match result {
            Ok(snapshot) => {
                failures = 0;
                delay = config.interval;
                let terminal = snapshot.status.is_terminal();
                tracing::debug!(
                    job_id,
                    status = %snapshot.status,
                    progress = snapshot.progress,
                    "Job status snapshot",
                );
                if !send(tx, PollUpdate::Snapshot(snapshot), cancel).await || terminal {
                    return;
                }
            }
            Err(e) => {
                failures += 1;
                if config
                    .max_consecutive_errors
                    .is_some_and(|budget| failures >= budget)
                {
                    tracing::error!(
                        job_id,
                        attempts = failures,
                        error = %e,
                        "Giving up on status polling",
                    );
                    let update = PollUpdate::GaveUp {
                        attempts: failures,
                        error: e,
                    };
                    send(tx, update, cancel).await;
                    return;
                }

                delay = if failures == 1 {
                    config.interval
                } else {
                    next_delay(delay, config)
                };
                tracing::warn!(
                    job_id,
                    attempt = failures,
                    retry_in_ms = delay.as_millis() as u64,
                    error = %e,
                    "Status fetch failed",
                );
                let update = PollUpdate::FetchFailed {
                    attempt: failures,
                    retry_in: delay,
                    error: e,
                };
                if !send(tx, update, cancel).await {
                    return;
                }
            }
        }

        // Wait before the next fetch, respecting cancellation.
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

/// Deliver an update. Returns `false` if the loop should stop because it
/// was cancelled or nobody is listening any more.
async fn send(
    tx: &mpsc::Sender<PollUpdate>,
    update: PollUpdate,
    cancel: &CancellationToken,
) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        result = tx.send(update) => result.is_ok(),
    }
}
