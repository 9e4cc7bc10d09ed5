//! Script drafts returned by the preview endpoint.

use serde::{Deserialize, Deserializer, Serialize};

/// A generated script, shown to the user before committing to rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptDraft {
    pub title: String,
    pub style: String,
    #[serde(default)]
    pub scenes: Vec<Scene>,
}

/// One narrated scene of a script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub text: String,
    pub visual_concept: String,
    /// Length in seconds.
    #[serde(deserialize_with = "number_or_string", default)]
    pub duration: f64,
}

impl ScriptDraft {
    /// Sum of all scene durations in seconds.
    pub fn total_duration(&self) -> f64 {
        self.scenes.iter().map(|s| s.duration).sum()
    }
}

/// The backend serialises scene fields as strings, so `duration` may arrive
/// as `"5"` rather than `5`.
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid scene duration '{s}'"))),
    }
}
