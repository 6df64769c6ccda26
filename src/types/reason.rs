//! Reason codes for controller transitions

use serde::{Deserialize, Serialize};

/// Reason codes for every step the controller takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ReasonCode {
    // =========================================================================
    // R1xx: Session lifecycle
    // =========================================================================
    /// Session started, first round dealt
    R101_SESSION_STARTED,
    /// Session clock reached zero
    R102_SESSION_TIMER_EXPIRED,
    /// Player aborted the session
    R103_SESSION_ABORTED,

    // =========================================================================
    // R2xx: Round phases
    // =========================================================================
    /// Blind mode: premises shown for memorization
    R201_MEMORIZE_BLIND,
    /// Cipher key changed: premises shown so the key can be relearned
    R202_MEMORIZE_KEY_CHANGED,
    /// Interference task started
    R203_INTERFERENCE_STARTED,
    /// Question asked
    R204_QUESTION_ASKED,

    // =========================================================================
    // R3xx: Answers
    // =========================================================================
    /// Correct answer
    R301_ANSWER_CORRECT,
    /// Wrong answer
    R302_ANSWER_WRONG,
    /// Question clock reached zero
    R303_ANSWER_TIMEOUT,

    // =========================================================================
    // R4xx: Timers
    // =========================================================================
    /// Session clock ticked
    R401_SESSION_TICK,
    /// Question clock ticked
    R402_QUESTION_TICK,
    /// Tick from a cancelled timer, ignored
    R403_STALE_TICK_IGNORED,

    // =========================================================================
    // R5xx: Interference
    // =========================================================================
    /// Palette advanced
    R501_INTERFERENCE_TICK,
    /// Signal on the target colour
    R502_INTERFERENCE_MATCH,
    /// Signal on the wrong colour
    R503_INTERFERENCE_MISS,

    // =========================================================================
    // R6xx: Configuration and no-ops
    // =========================================================================
    /// Event does not apply to the current phase
    R601_EVENT_IGNORED,
    /// Settings replaced, effective next round
    R602_SETTINGS_UPDATED,
}

impl ReasonCode {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::R101_SESSION_STARTED => "R101_SESSION_STARTED",
            Self::R102_SESSION_TIMER_EXPIRED => "R102_SESSION_TIMER_EXPIRED",
            Self::R103_SESSION_ABORTED => "R103_SESSION_ABORTED",
            Self::R201_MEMORIZE_BLIND => "R201_MEMORIZE_BLIND",
            Self::R202_MEMORIZE_KEY_CHANGED => "R202_MEMORIZE_KEY_CHANGED",
            Self::R203_INTERFERENCE_STARTED => "R203_INTERFERENCE_STARTED",
            Self::R204_QUESTION_ASKED => "R204_QUESTION_ASKED",
            Self::R301_ANSWER_CORRECT => "R301_ANSWER_CORRECT",
            Self::R302_ANSWER_WRONG => "R302_ANSWER_WRONG",
            Self::R303_ANSWER_TIMEOUT => "R303_ANSWER_TIMEOUT",
            Self::R401_SESSION_TICK => "R401_SESSION_TICK",
            Self::R402_QUESTION_TICK => "R402_QUESTION_TICK",
            Self::R403_STALE_TICK_IGNORED => "R403_STALE_TICK_IGNORED",
            Self::R501_INTERFERENCE_TICK => "R501_INTERFERENCE_TICK",
            Self::R502_INTERFERENCE_MATCH => "R502_INTERFERENCE_MATCH",
            Self::R503_INTERFERENCE_MISS => "R503_INTERFERENCE_MISS",
            Self::R601_EVENT_IGNORED => "R601_EVENT_IGNORED",
            Self::R602_SETTINGS_UPDATED => "R602_SETTINGS_UPDATED",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::R101_SESSION_STARTED => "Session started",
            Self::R102_SESSION_TIMER_EXPIRED => "Session time is up",
            Self::R103_SESSION_ABORTED => "Session aborted",
            Self::R201_MEMORIZE_BLIND => "Memorize the premises",
            Self::R202_MEMORIZE_KEY_CHANGED => "Cipher key changed - memorize the premises",
            Self::R203_INTERFERENCE_STARTED => "Signal when the target colour shows",
            Self::R204_QUESTION_ASKED => "Answer the question",
            Self::R301_ANSWER_CORRECT => "Correct",
            Self::R302_ANSWER_WRONG => "Wrong",
            Self::R303_ANSWER_TIMEOUT => "Out of time",
            Self::R401_SESSION_TICK => "Session clock",
            Self::R402_QUESTION_TICK => "Question clock",
            Self::R403_STALE_TICK_IGNORED => "Stale tick ignored",
            Self::R501_INTERFERENCE_TICK => "Colour changed",
            Self::R502_INTERFERENCE_MATCH => "Target hit",
            Self::R503_INTERFERENCE_MISS => "Missed - wrong colour",
            Self::R601_EVENT_IGNORED => "Nothing to do in this phase",
            Self::R602_SETTINGS_UPDATED => "Settings updated (next round)",
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
