//! Session state and the records handed to the history recorder

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::types::{CipherMap, Frame, Modifier, SpatialMode};
use crate::MIN_DEPTH;

/// Mutable per-session counters, owned by the controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub score: u32,
    pub questions_attempted: u32,
    pub correct: u32,
    /// Premise count for the next round
    pub depth: usize,
    pub progress_streak: u32,
    pub mistake_streak: u32,
    /// Current key, present once the cipher has been used this session
    pub cipher: Option<CipherMap>,
    /// Seconds left on the session clock (None when untimed)
    pub session_remaining: Option<u32>,
    /// Seconds left on the question clock (None when untimed or not asking)
    pub question_remaining: Option<u32>,
    pub rounds_played: u32,
}

impl SessionState {
    pub fn new(depth: usize) -> Self {
        Self {
            score: 0,
            questions_attempted: 0,
            correct: 0,
            depth: depth.max(MIN_DEPTH),
            progress_streak: 0,
            mistake_streak: 0,
            cipher: None,
            session_remaining: None,
            question_remaining: None,
            rounds_played: 0,
        }
    }

    /// Fraction of attempted questions answered correctly (0.0 when none)
    pub fn accuracy(&self) -> f64 {
        if self.questions_attempted == 0 {
            0.0
        } else {
            self.correct as f64 / self.questions_attempted as f64
        }
    }
}

/// Outcome of one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub timestamp: DateTime<Utc>,
    pub round: u32,
    pub frame: Frame,
    pub spatial_mode: Option<SpatialMode>,
    pub depth: usize,
    pub expected: bool,
    /// None when the question timer ran out
    pub answer: Option<bool>,
    pub correct: bool,
    pub reaction_ms: u64,
    pub night: bool,
    pub key_changed: bool,
    pub score_after: u32,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionEndCause {
    TimerExpired,
    Aborted,
}

/// Archival snapshot of one finished session. Never mutated once emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub end_cause: SessionEndCause,
    pub score: u32,
    pub questions_attempted: u32,
    pub correct: u32,
    pub accuracy: f64,
    pub start_depth: usize,
    pub final_depth: usize,
    pub peak_depth: usize,
    pub avg_reaction_ms: f64,
    pub modifiers: Vec<Modifier>,
    /// Frame of every attempted question, in play order
    pub frames: Vec<Frame>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_clamps_depth() {
        assert_eq!(SessionState::new(0).depth, MIN_DEPTH);
        assert_eq!(SessionState::new(5).depth, 5);
    }

    #[test]
    fn test_accuracy_without_attempts() {
        assert_eq!(SessionState::new(2).accuracy(), 0.0);
    }
}
