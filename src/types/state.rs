//! Controller phase definitions

use serde::{Deserialize, Serialize};

/// Phases of the round/session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// No session running
    Setup,
    /// Premises on screen until the player is ready
    PremiseMemorize,
    /// Colour-match task between premises and question
    Interference,
    /// Waiting for a yes/no answer
    Question,
    /// Feedback for the answered question
    Result,
    /// Session over (timer ran out or aborted)
    SessionEnd,
}

impl Phase {
    /// Get ANSI color code for terminal display
    pub fn color_code(&self) -> &'static str {
        match self {
            Phase::Setup | Phase::SessionEnd => "\x1b[90m",   // Gray
            Phase::PremiseMemorize => "\x1b[36m",             // Cyan
            Phase::Interference => "\x1b[35m",                // Magenta
            Phase::Question => "\x1b[33m",                    // Yellow
            Phase::Result => "\x1b[32m",                      // Green
        }
    }

    /// Reset ANSI color
    pub fn color_reset() -> &'static str {
        "\x1b[0m"
    }

    /// Get emoji for phase
    pub fn emoji(&self) -> &'static str {
        match self {
            Phase::Setup => "⏳",
            Phase::PremiseMemorize => "🧠",
            Phase::Interference => "🎨",
            Phase::Question => "❓",
            Phase::Result => "✔",
            Phase::SessionEnd => "🏁",
        }
    }

    /// Is a session in progress?
    pub fn in_session(&self) -> bool {
        !matches!(self, Phase::Setup | Phase::SessionEnd)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Setup => "SETUP",
            Phase::PremiseMemorize => "PREMISE_MEMORIZE",
            Phase::Interference => "INTERFERENCE",
            Phase::Question => "QUESTION",
            Phase::Result => "RESULT",
            Phase::SessionEnd => "SESSION_END",
        };
        write!(f, "{}", name)
    }
}
