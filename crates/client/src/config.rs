use std::str::FromStr;
use std::time::Duration;

use crate::poller::PollConfig;

/// Client configuration loaded from environment variables.
///
/// All fields have defaults suitable for a backend running locally.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL without a trailing slash.
    pub api_url: String,
    /// Placeholder identity sent with generation requests. There is no
    /// login; every request uses this value.
    pub user_id: String,
    /// Per-request HTTP timeout in seconds.
    pub request_timeout_secs: u64,
    /// Status polling behaviour.
    pub poll: PollConfig,
}

/// A configuration value could not be parsed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a valid {expected}, got '{value}'")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            user_id: "demo_user".to_string(),
            request_timeout_secs: 30,
            poll: PollConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                 |
    /// |-------------------------------|-------------------------|
    /// | `SHORTGEN_API_URL`            | `http://localhost:8000` |
    /// | `SHORTGEN_USER_ID`            | `demo_user`             |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                    |
    /// | `POLL_INTERVAL_SECS`          | `3`                     |
    /// | `POLL_MAX_CONSECUTIVE_ERRORS` | `5` (`0` = unlimited)   |
    /// | `POLL_MAX_BACKOFF_SECS`       | `30`                    |
    ///
    /// The timeout and poll interval must be at least one second, and the
    /// maximum backoff may not be shorter than the poll interval.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup("SHORTGEN_API_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.api_url);

        let user_id = lookup("SHORTGEN_USER_ID")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.user_id);

        let request_timeout_secs = parse_or(
            &lookup,
            "REQUEST_TIMEOUT_SECS",
            "u64",
            defaults.request_timeout_secs,
        )?;

        let interval_secs: u64 = parse_or(
            &lookup,
            "POLL_INTERVAL_SECS",
            "u64",
            defaults.poll.interval.as_secs(),
        )?;
        let max_errors: u32 = parse_or(
            &lookup,
            "POLL_MAX_CONSECUTIVE_ERRORS",
            "u32",
            defaults.poll.max_consecutive_errors.unwrap_or(0),
        )?;
        let max_backoff_secs: u64 = parse_or(
            &lookup,
            "POLL_MAX_BACKOFF_SECS",
            "u64",
            defaults.poll.max_backoff.as_secs(),
        )?;

        if request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "REQUEST_TIMEOUT_SECS",
                expected: "number of seconds of at least 1",
                value: request_timeout_secs.to_string(),
            });
        }
        if interval_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "POLL_INTERVAL_SECS",
                expected: "number of seconds of at least 1",
                value: interval_secs.to_string(),
            });
        }
        if max_backoff_secs < interval_secs {
            return Err(ConfigError::Invalid {
                key: "POLL_MAX_BACKOFF_SECS",
                expected: "number of seconds no smaller than POLL_INTERVAL_SECS",
                value: max_backoff_secs.to_string(),
            });
        }

        Ok(Self {
            api_url,
            user_id,
            request_timeout_secs,
            poll: PollConfig {
                interval: Duration::from_secs(interval_secs),
                max_consecutive_errors: (max_errors > 0).then_some(max_errors),
                max_backoff: Duration::from_secs(max_backoff_secs),
                ..defaults.poll
            },
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_or<T, F>(
    lookup: &F,
    key: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            key,
            expected,
            value: raw,
        }),
    }
}
