//! Scoring and adaptive difficulty
//!
//! Two hysteresis counters on the session:
//! - correct: mistake streak → 0, progress streak + 1; at 3 → depth + 1
//! - wrong: progress streak → 0, mistake streak + 1 (only above the floor); at 2 → depth - 1

use tracing::info;
use crate::types::SessionState;
use crate::{
    MIN_DEPTH, MISTAKE_STREAK_TARGET, PROGRESS_STREAK_TARGET, SCORE_PER_DEPTH,
    WRONG_ANSWER_PENALTY,
};

/// Depth movement caused by one answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthChange {
    Unchanged,
    Increased(usize),
    Decreased(usize),
}

/// Score after an answer at the given round depth
pub fn score_answer(score: u32, correct: bool, depth: usize) -> u32 {
    if correct {
        score.saturating_add(SCORE_PER_DEPTH.saturating_mul(depth as u32))
    } else {
        score.saturating_sub(WRONG_ANSWER_PENALTY)
    }
}

/// Apply one result (timeouts count as wrong) to score and, when
/// `auto_progress` is on, to the streaks and depth.
pub fn record_answer(
    session: &mut SessionState,
    correct: bool,
    round_depth: usize,
    auto_progress: bool,
) -> DepthChange {
    session.questions_attempted += 1;
    if correct {
        session.correct += 1;
    }
    session.score = score_answer(session.score, correct, round_depth);

    if !auto_progress {
        return DepthChange::Unchanged;
    }
    let change = adapt(session, correct);
    match change {
        DepthChange::Increased(d) => info!(depth = d, "difficulty increased"),
        DepthChange::Decreased(d) => info!(depth = d, "difficulty decreased"),
        DepthChange::Unchanged => {}
    }
    change
}

/// Hysteresis step on the streak counters
pub fn adapt(session: &mut SessionState, correct: bool) -> DepthChange {
    if correct {
        session.mistake_streak = 0;
        session.progress_streak += 1;
        if session.progress_streak >= PROGRESS_STREAK_TARGET {
            session.progress_streak = 0;
            session.depth += 1;
            return DepthChange::Increased(session.depth);
        }
    } else {
        session.progress_streak = 0;
        if session.depth > MIN_DEPTH {
            session.mistake_streak += 1;
            if session.mistake_streak >= MISTAKE_STREAK_TARGET {
                session.mistake_streak = 0;
                session.depth -= 1;
                return DepthChange::Decreased(session.depth);
            }
        }
    }
    DepthChange::Unchanged
}

// =============================================================================
// TESTS
// =============================================================================
