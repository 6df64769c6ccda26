//! Scoped timer handles owned by the controller
//!
//! Arming a kind bumps a generation counter, so any tick carrying an older
//! handle is recognisably stale. Phase timers (question, interference) are
//! cancelled together whenever a new phase is entered.

use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::{COUNTDOWN_TICK_MS, INTERFERENCE_TICK_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimerKind {
    Session,
    Question,
    Interference,
}

impl TimerKind {
    /// Tick period
    pub fn period(&self) -> Duration {
        match self {
            TimerKind::Session | TimerKind::Question => Duration::from_millis(COUNTDOWN_TICK_MS),
            TimerKind::Interference => Duration::from_millis(INTERFERENCE_TICK_MS),
        }
    }

    fn slot(&self) -> usize {
        match self {
            TimerKind::Session => 0,
            TimerKind::Question => 1,
            TimerKind::Interference => 2,
        }
    }
}

/// Identity of one arming of a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle {
    pub kind: TimerKind,
    pub generation: u64,
}

#[derive(Debug, Default, Clone)]
pub struct TimerSet {
    armed: [Option<TimerHandle>; 3],
    next_generation: u64,
}

impl TimerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `kind`, replacing any previous arming of it
    pub fn arm(&mut self, kind: TimerKind) -> TimerHandle {
        self.next_generation += 1;
        let handle = TimerHandle {
            kind,
            generation: self.next_generation,
        };
        self.armed[kind.slot()] = Some(handle);
        handle
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        self.armed[kind.slot()] = None;
    }

    /// Cancel the question and interference timers
    pub fn cancel_phase_timers(&mut self) {
        self.cancel(TimerKind::Question);
        self.cancel(TimerKind::Interference);
    }

    pub fn cancel_all(&mut self) {
        self.armed = [None; 3];
    }

    /// True only for the current arming of its kind
    pub fn is_armed(&self, handle: TimerHandle) -> bool {
        self.armed[handle.kind.slot()] == Some(handle)
    }

    pub fn armed(&self) -> Vec<TimerHandle> {
        self.armed.iter().flatten().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rearm_makes_old_handle_stale() {
        let mut timers = TimerSet::new();
        let first = timers.arm(TimerKind::Question);
        let second = timers.arm(TimerKind::Question);
        assert!(!timers.is_armed(first));
        assert!(timers.is_armed(second));
        assert_eq!(timers.armed(), vec![second]);
    }

    #[test]
    fn test_phase_cancel_keeps_session_timer() {
        let mut timers = TimerSet::new();
        let session = timers.arm(TimerKind::Session);
        let question = timers.arm(TimerKind::Question);
        let interference = timers.arm(TimerKind::Interference);
        timers.cancel_phase_timers();
        assert!(timers.is_armed(session));
        assert!(!timers.is_armed(question));
        assert!(!timers.is_armed(interference));
        timers.cancel_all();
        assert!(timers.armed().is_empty());
    }

    #[test]
    fn test_periods() {
        assert_eq!(TimerKind::Session.period(), Duration::from_secs(1));
        assert_eq!(TimerKind::Interference.period(), Duration::from_millis(500));
    }
}
