//! Interference episode: a colour cycles on a fixed tick; the player signals
//! when it matches the episode's target.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use crate::INTERFERENCE_PALETTE;

/// Result of a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalOutcome {
    Match,
    Miss,
}

/// One interference episode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterferenceEpisode {
    current: usize,
    target: usize,
    /// Set by a mismatched signal, cleared on the next tick
    pub missed: bool,
    pub ticks: u32,
}

impl InterferenceEpisode {
    /// Random start colour and target
    pub fn start(rng: &mut dyn RngCore) -> Self {
        Self::with_indices(
            rng.gen_range(0..INTERFERENCE_PALETTE.len()),
            rng.gen_range(0..INTERFERENCE_PALETTE.len()),
        )
    }

    pub fn with_indices(current: usize, target: usize) -> Self {
        Self {
            current: current % INTERFERENCE_PALETTE.len(),
            target: target % INTERFERENCE_PALETTE.len(),
            missed: false,
            ticks: 0,
        }
    }

    pub fn current(&self) -> &'static str {
        INTERFERENCE_PALETTE[self.current]
    }

    pub fn target(&self) -> &'static str {
        INTERFERENCE_PALETTE[self.target]
    }

    /// Advance to the next palette colour
    pub fn tick(&mut self) {
        self.current = (self.current + 1) % INTERFERENCE_PALETTE.len();
        self.ticks += 1;
        self.missed = false;
    }

    pub fn signal(&mut self) -> SignalOutcome {
        if self.current == self.target {
            SignalOutcome::Match
        } else {
            self.missed = true;
            SignalOutcome::Miss
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_cycles_palette() {
        let mut ep = InterferenceEpisode::with_indices(3, 0);
        assert_eq!(ep.current(), "YELLOW");
        ep.tick();
        assert_eq!(ep.current(), "RED");
        assert_eq!(ep.ticks, 1);
    }

    #[test]
    fn test_signal_match_and_miss() {
        let mut ep = InterferenceEpisode::with_indices(0, 1);
        assert_eq!(ep.signal(), SignalOutcome::Miss);
        assert!(ep.missed);
        ep.tick();
        assert!(!ep.missed);
        assert_eq!(ep.signal(), SignalOutcome::Match);
        assert_eq!(ep.target(), "GREEN");
    }
}
