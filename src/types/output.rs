//! Controller step output

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::types::{Phase, ReasonCode, RoundRecord, SessionRecord};

/// Result of feeding one event to the controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transition {
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Phase before the event
    pub from: Phase,
    /// Phase after the event
    pub to: Phase,
    /// Why
    pub reason: ReasonCode,
    /// Score after the event
    pub score: u32,
    /// Depth the next round will use
    pub depth: usize,
    /// Set when a question was answered or timed out
    pub outcome: Option<RoundRecord>,
    /// Set when the session ended with at least one question attempted
    pub session_record: Option<SessionRecord>,
}

impl Transition {
    /// Create new output
    pub fn new(from: Phase, to: Phase, reason: ReasonCode, score: u32, depth: usize) -> Self {
        Self {
            timestamp: Utc::now(),
            from,
            to,
            reason,
            score,
            depth,
            outcome: None,
            session_record: None,
        }
    }

    pub fn with_outcome(mut self, outcome: RoundRecord) -> Self {
        self.outcome = Some(outcome);
        self
    }

    pub fn with_session_record(mut self, record: Option<SessionRecord>) -> Self {
        self.session_record = record;
        self
    }

    /// Event was dropped without effect
    pub fn is_noop(&self) -> bool {
        matches!(
            self.reason,
            ReasonCode::R601_EVENT_IGNORED | ReasonCode::R403_STALE_TICK_IGNORED
        )
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let color = self.to.color_code();
        let reset = Phase::color_reset();
        let emoji = self.to.emoji();

        format!(
            "{}{} phase={} | score={} | depth={} | {}{}",
            color,
            emoji,
            self.to,
            self.score,
            self.depth,
            self.reason.description(),
            reset
        )
    }

    /// Status line for the CLI; `--no-color` selects the parseable form
    pub fn status_line(&self, color: bool) -> String {
        if color {
            self.to_terminal_string()
        } else {
            self.to_parseable_string()
        }
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "phase={} | score={} | depth={} | reason={}",
            self.to,
            self.score,
            self.depth,
            self.reason.code()
        )
    }
}
