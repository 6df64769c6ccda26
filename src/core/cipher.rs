//! Cipher Subsystem: session-scoped keyword → nonsense token substitution
//!
//! Key lifecycle:
//! - session start: fresh key
//! - cipher enabled but no key yet: fresh key
//! - any later round: fresh key with probability 0.15, flagged "key changed"

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use tracing::debug;
use crate::types::{CipherMap, RelationKeyword};
use crate::{CIPHER_REKEY_PROBABILITY, CIPHER_TOKEN_POOL};

/// What happened to the key before a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyUpdate {
    /// A new map was drawn
    pub regenerated: bool,
    /// The round must force memorization so the key can be relearned
    pub key_changed: bool,
}

/// Stateless cipher operations
#[derive(Debug, Default, Clone, Copy)]
pub struct CipherEngine;

impl CipherEngine {
    pub fn new() -> Self {
        Self
    }

    /// Shuffle the token pool and zip it against the keyword list
    pub fn generate(&self, rng: &mut dyn RngCore) -> CipherMap {
        let mut pool: Vec<&str> = CIPHER_TOKEN_POOL.to_vec();
        pool.shuffle(rng);
        CipherMap::from_pairs(
            RelationKeyword::ALL
                .iter()
                .zip(pool)
                .map(|(k, t)| (*k, t.to_string())),
        )
    }

    /// Apply the per-round regeneration rules to the session's key slot.
    ///
    /// `first_round` is true for the opening round of a session, which never
    /// rolls for a rekey.
    pub fn prepare_round(
        &self,
        slot: &mut Option<CipherMap>,
        enabled: bool,
        first_round: bool,
        rng: &mut dyn RngCore,
    ) -> KeyUpdate {
        if !enabled {
            return KeyUpdate::default();
        }
        if slot.is_none() {
            *slot = Some(self.generate(rng));
            debug!("cipher key created");
            return KeyUpdate {
                regenerated: true,
                key_changed: false,
            };
        }
        if !first_round && rng.gen_bool(CIPHER_REKEY_PROBABILITY) {
            *slot = Some(self.generate(rng));
            debug!("cipher key rotated");
            return KeyUpdate {
                regenerated: true,
                key_changed: true,
            };
        }
        KeyUpdate::default()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_map_is_bijection() {
        let engine = CipherEngine::new();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let map = engine.generate(&mut rng);
            assert!(map.is_bijection(), "seed {seed}");
            assert!(map.iter().all(|(_, t)| CIPHER_TOKEN_POOL.contains(&t.as_str())));
        }
    }

    #[test]
    fn test_disabled_cipher_leaves_slot_alone() {
        let engine = CipherEngine::new();
        let mut rng = StdRng::seed_from_u64(7);
        let mut slot = None;
        let update = engine.prepare_round(&mut slot, false, false, &mut rng);
        assert_eq!(update, KeyUpdate::default());
        assert!(slot.is_none());
    }

    #[test]
    fn test_missing_key_is_created_without_flag() {
        let engine = CipherEngine::new();
        let mut rng = StdRng::seed_from_u64(8);
        let mut slot = None;
        let update = engine.prepare_round(&mut slot, true, false, &mut rng);
        assert!(update.regenerated);
        assert!(!update.key_changed);
        assert!(slot.is_some());
    }

    #[test]
    fn test_first_round_never_rekeys() {
        let engine = CipherEngine::new();
        let mut rng = StdRng::seed_from_u64(9);
        let mut slot = Some(engine.generate(&mut rng));
        let before = slot.clone();
        for _ in 0..200 {
            let update = engine.prepare_round(&mut slot, true, true, &mut rng);
            assert!(!update.key_changed);
        }
        assert_eq!(slot, before);
    }

    #[test]
    fn test_rekey_frequency_near_fifteen_percent() {
        let engine = CipherEngine::new();
        let mut rng = StdRng::seed_from_u64(10);
        let mut slot = Some(engine.generate(&mut rng));
        let trials = 20_000;
        let changed = (0..trials)
            .filter(|_| engine.prepare_round(&mut slot, true, false, &mut rng).key_changed)
            .count();
        let freq = changed as f64 / trials as f64;
        assert!((freq - CIPHER_REKEY_PROBABILITY).abs() < 0.02, "freq = {freq}");
        assert!(slot.as_ref().map(|m| m.is_bijection()).unwrap_or(false));
    }
}
