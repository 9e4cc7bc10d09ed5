/// Errors surfaced by the generation workflow.
///
/// Every variant carries a human-readable message that is safe to show in
/// the session's error slot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A precondition was not met (missing topic, unknown style, ...).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A one-shot backend call failed (network, non-2xx, bad body).
    #[error("Remote error: {0}")]
    Remote(String),

    /// The backend reported the generation job as `failed`.
    #[error("Generation failed: {0}")]
    JobFailed(String),

    /// The operation collides with work already in flight.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The bare message without the variant prefix, for display in a UI.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(msg)
            | Self::Remote(msg)
            | Self::JobFailed(msg)
            | Self::Conflict(msg)
            | Self::Internal(msg) => msg,
        }
    }
}
