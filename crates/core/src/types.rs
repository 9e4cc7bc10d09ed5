/// Backend-assigned generation job identifier (opaque string).
pub type JobId = String;

/// Speaker identifier understood by the voice synthesiser.
pub type VoiceId = u32;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
