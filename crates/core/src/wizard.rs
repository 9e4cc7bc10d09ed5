//! Wizard step definitions and navigation rules.
//!
//! Defines the six ordered steps of the generation wizard, their 1-based
//! numbering and labels for step indicators, and the fixed set of backward
//! transitions. Forward guards that depend on session data live in
//! [`crate::session`].

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Wizard steps
// ---------------------------------------------------------------------------

/// The six steps of the generation wizard, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    TopicSelection,
    StyleSelection,
    AudioSettings,
    ScriptPreview,
    GenerationInProgress,
    Completed,
}

/// Total number of steps in the wizard.
pub const TOTAL_STEPS: u8 = 6;

/// Every step in display order.
pub const ALL_STEPS: [WizardStep; TOTAL_STEPS as usize] = [
    WizardStep::TopicSelection,
    WizardStep::StyleSelection,
    WizardStep::AudioSettings,
    WizardStep::ScriptPreview,
    WizardStep::GenerationInProgress,
    WizardStep::Completed,
];

impl WizardStep {
    /// Convert to a 1-based step number.
    pub fn to_number(self) -> u8 {
        match self {
            Self::TopicSelection => 1,
            Self::StyleSelection => 2,
            Self::AudioSettings => 3,
            Self::ScriptPreview => 4,
            Self::GenerationInProgress => 5,
            Self::Completed => 6,
        }
    }

    /// Human-readable label for the step.
    pub fn label(self) -> &'static str {
        match self {
            Self::TopicSelection => "Topic",
            Self::StyleSelection => "Style",
            Self::AudioSettings => "Voice",
            Self::ScriptPreview => "Preview",
            Self::GenerationInProgress => "Generating",
            Self::Completed => "Done",
        }
    }

    /// The step a "back" action returns to, if one is allowed.
    ///
    /// `GenerationInProgress` and `Completed` have no way back; only a
    /// reset leaves them.
    pub fn previous(self) -> Option<Self> {
        match self {
            Self::StyleSelection => Some(Self::TopicSelection),
            Self::AudioSettings => Some(Self::StyleSelection),
            Self::ScriptPreview => Some(Self::AudioSettings),
            Self::TopicSelection | Self::GenerationInProgress | Self::Completed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Position in the wizard as a percentage, for a step indicator.
    pub fn progress_percent(self) -> u8 {
        ((u16::from(self.to_number()) * 100) / u16::from(TOTAL_STEPS)) as u8
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Topic entry mode
// ---------------------------------------------------------------------------

/// How the user supplies the topic on the first step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicMode {
    /// Enter a broad theme and pick one of the server's suggestions.
    #[default]
    Theme,
    /// Type the topic directly.
    Direct,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
