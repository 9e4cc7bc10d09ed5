//! Style and voice catalogs.
//!
//! Styles are fetched from the backend once per session; voices are a
//! closed set fixed at build time.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::VoiceId;

// ---------------------------------------------------------------------------
// Styles
// ---------------------------------------------------------------------------

/// One selectable visual style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleOption {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Prompt keywords the renderer uses to keep scenes visually consistent.
    #[serde(default)]
    pub consistency_keywords: Vec<String>,
}

/// The style catalog as returned by `GET /api/styles`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleCatalog {
    #[serde(default)]
    pub styles: Vec<StyleOption>,
}

impl StyleCatalog {
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&StyleOption> {
        self.styles.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Validate a style id against this catalog.
    ///
    /// An empty catalog (failed or pending load) accepts any non-empty id so
    /// the wizard stays usable.
    pub fn validate_style_id(&self, id: &str) -> Result<(), CoreError> {
        if id.trim().is_empty() {
            return Err(CoreError::Validation("Select a style first".to_string()));
        }
        if !self.is_empty() && !self.contains(id) {
            let known: Vec<&str> = self.styles.iter().map(|s| s.id.as_str()).collect();
            return Err(CoreError::Validation(format!(
                "Unknown style '{id}'. Must be one of: {}",
                known.join(", ")
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Voices
// ---------------------------------------------------------------------------

/// A speaker offered by the voice synthesiser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Voice {
    pub id: VoiceId,
    pub name: &'static str,
}

/// Speaker used when the user does not pick one.
pub const DEFAULT_VOICE_ID: VoiceId = 1;

/// The closed set of speakers, in display order.
pub const VOICES: &[Voice] = &[
    Voice {
        id: 1,
        name: "Zundamon",
    },
    Voice {
        id: 2,
        name: "Shikoku Metan",
    },
    Voice {
        id: 3,
        name: "Kasukabe Tsumugi",
    },
    Voice {
        id: 8,
        name: "Aoyama Ryusei",
    },
];

/// Look up a voice by id.
pub fn voice_by_id(id: VoiceId) -> Option<&'static Voice> {
    VOICES.iter().find(|v| v.id == id)
}

/// Validate that a voice id belongs to the closed set.
pub fn validate_voice_id(id: VoiceId) -> Result<(), CoreError> {
    if voice_by_id(id).is_none() {
        let known: Vec<String> = VOICES.iter().map(|v| v.id.to_string()).collect();
        return Err(CoreError::Validation(format!(
            "Unknown voice {id}. Must be one of: {}",
            known.join(", ")
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
