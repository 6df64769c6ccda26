//! Round assembly: frame selection, generator dispatch, modifiers
//!
//! Pipeline for one round:
//! 1. pick an enabled frame (none enabled → configuration error)
//! 2. roll night mode
//! 3. draw depth + 1 symbols
//! 4. run the frame's generator with the cipher and night flag
//! 5. apply the transformation layer to the ground truth

use std::collections::BTreeSet;
use rand::{Rng, RngCore};
use tracing::debug;
use crate::core::distinction::DistinctionGenerator;
use crate::core::hierarchy::HierarchyGenerator;
use crate::core::linear::LinearGenerator;
use crate::core::spatial::SpatialGenerator;
use crate::core::symbols::SymbolProvider;
use crate::core::transform;
use crate::types::{
    display_token, CipherMap, Frame, GameError, GameSettings, MovementQueryPolicy, Premise, Query,
    RelationKeyword, RoundModifiers, RoundState, SpatialDetail, SpatialMode, Symbol, SymbolId,
};
use crate::TRUE_QUERY_PROBABILITY;

/// Inputs shared by every generator call. Records each keyword it renders.
#[derive(Debug)]
pub struct GenerationContext<'a> {
    cipher: Option<&'a CipherMap>,
    /// Context inversion in effect
    pub night: bool,
    /// Enabled perspective sub-modes; empty means plain map queries
    pub spatial_modes: Vec<SpatialMode>,
    pub movement_policy: MovementQueryPolicy,
    used: BTreeSet<RelationKeyword>,
}

impl<'a> GenerationContext<'a> {
    pub fn new(cipher: Option<&'a CipherMap>, night: bool) -> Self {
        Self {
            cipher,
            night,
            spatial_modes: Vec::new(),
            movement_policy: MovementQueryPolicy::default(),
            used: BTreeSet::new(),
        }
    }

    pub fn with_spatial_modes(mut self, modes: Vec<SpatialMode>) -> Self {
        self.spatial_modes = modes;
        self
    }

    pub fn with_movement_policy(mut self, policy: MovementQueryPolicy) -> Self {
        self.movement_policy = policy;
        self
    }

    /// Display token for a keyword; marks the keyword as used
    pub fn token(&mut self, keyword: RelationKeyword) -> String {
        self.used.insert(keyword);
        display_token(self.cipher, keyword)
    }

    pub fn premise(&mut self, subject: usize, object: usize, keyword: RelationKeyword) -> Premise {
        Premise {
            subject: SymbolId(subject),
            object: SymbolId(object),
            keyword,
            token: self.token(keyword),
        }
    }

    pub fn query(&mut self, subject: usize, object: usize, keyword: RelationKeyword, expected: bool) -> Query {
        Query {
            subject: SymbolId(subject),
            object: SymbolId(object),
            keyword,
            token: self.token(keyword),
            expected,
        }
    }

    pub fn used_keywords(&self) -> &BTreeSet<RelationKeyword> {
        &self.used
    }
}

/// What a generator hands back
#[derive(Debug, Clone)]
pub struct RoundBody {
    pub premises: Vec<Premise>,
    pub query: Query,
    pub spatial: Option<SpatialDetail>,
}

/// One relational frame's premise/query builder
pub trait RelationGenerator {
    fn frame(&self) -> Frame;

    /// Build premises and a query over `symbols` (at least two).
    fn generate(
        &self,
        symbols: &[Symbol],
        ctx: &mut GenerationContext<'_>,
        rng: &mut dyn RngCore,
    ) -> RoundBody;
}

/// Generator for a frame
pub fn generator_for(frame: Frame) -> Box<dyn RelationGenerator> {
    match frame {
        Frame::Linear => Box::new(LinearGenerator::new()),
        Frame::Distinction => Box::new(DistinctionGenerator::new()),
        Frame::Hierarchy => Box::new(HierarchyGenerator::new()),
        Frame::Spatial2D => Box::new(SpatialGenerator::new(false)),
        Frame::Spatial3D => Box::new(SpatialGenerator::new(true)),
    }
}

// =============================================================================
// SAMPLING HELPERS
// =============================================================================

/// Two distinct indices below `n` (n ≥ 2)
pub fn pick_distinct_pair(n: usize, rng: &mut dyn RngCore) -> (usize, usize) {
    let a = rng.gen_range(0..n);
    let mut b = rng.gen_range(0..n - 1);
    if b >= a {
        b += 1;
    }
    (a, b)
}

/// Uniform pick from a non-empty slice of keywords
pub fn pick_keyword(options: &[RelationKeyword], rng: &mut dyn RngCore) -> RelationKeyword {
    options[rng.gen_range(0..options.len())]
}

/// Symmetric true/false query sampling against a relation.
///
/// Half the time ask about a member of `truth` (answer yes), otherwise ask
/// about a keyword of `universe` outside `truth` (answer no).
pub fn sample_query(
    truth: &[RelationKeyword],
    universe: &[RelationKeyword],
    rng: &mut dyn RngCore,
) -> (RelationKeyword, bool) {
    let truth: Vec<RelationKeyword> = if truth.is_empty() {
        vec![RelationKeyword::SameLocation]
    } else {
        truth.to_vec()
    };
    let complement: Vec<RelationKeyword> = universe
        .iter()
        .copied()
        .filter(|k| !truth.contains(k))
        .collect();

    if complement.is_empty() || rng.gen_bool(TRUE_QUERY_PROBABILITY) {
        (pick_keyword(&truth, rng), true)
    } else {
        (pick_keyword(&complement, rng), false)
    }
}

/// Draw an enabled frame
pub fn select_frame(settings: &GameSettings, rng: &mut dyn RngCore) -> Result<Frame, GameError> {
    let frames = settings.enabled_frames();
    if frames.is_empty() {
        return Err(GameError::configuration("no relational frame is enabled"));
    }
    Ok(frames[rng.gen_range(0..frames.len())])
}

/// Spatial sub-modes the settings allow
pub fn spatial_modes(settings: &GameSettings) -> Vec<SpatialMode> {
    let mut modes = Vec::new();
    if settings.enable_deictic {
        modes.push(SpatialMode::Deictic);
    }
    if settings.enable_movement {
        modes.push(SpatialMode::Movement);
    }
    modes
}

// =============================================================================
// ROUND GENERATOR
// =============================================================================

/// Everything the controller supplies for one round
#[derive(Debug, Clone, Copy)]
pub struct RoundRequest<'a> {
    pub settings: &'a GameSettings,
    pub depth: usize,
    pub number: u32,
    /// Active key; None when the cipher is off
    pub cipher: Option<&'a CipherMap>,
    pub key_changed: bool,
}

/// Builds a complete `RoundState`
#[derive(Debug, Default, Clone, Copy)]
pub struct RoundGenerator;

impl RoundGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, request: RoundRequest<'_>, rng: &mut dyn RngCore) -> Result<RoundState, GameError> {
        let settings = request.settings;
        let frame = select_frame(settings, rng)?;
        let night = transform::roll_night(settings.enable_transformation, rng);
        let symbols = SymbolProvider::new(settings.symbol_mode).provide(request.depth + 1, rng);

        let mut ctx = GenerationContext::new(request.cipher, night)
            .with_spatial_modes(spatial_modes(settings))
            .with_movement_policy(settings.movement_query_policy);
        let mut body = generator_for(frame).generate(&symbols, &mut ctx, rng);
        body.query.expected = transform::apply_to_answer(frame, body.query.expected, night);

        debug!(
            round = request.number,
            frame = %frame,
            depth = request.depth,
            night,
            cipher = request.cipher.is_some(),
            "round generated"
        );

        Ok(RoundState {
            number: request.number,
            frame,
            depth: request.depth,
            symbols,
            premises: body.premises,
            query: body.query,
            spatial: body.spatial,
            modifiers: RoundModifiers {
                night,
                cipher: request.cipher.is_some(),
                key_changed: request.key_changed,
                blind: settings.blind_mode,
                interference: settings.enable_interference,
            },
            used_keywords: ctx.used_keywords().clone(),
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cipher::CipherEngine;
    use crate::types::ActiveModes;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn only(frame: Frame) -> GameSettings {
        let mut modes = ActiveModes {
            linear: false,
            distinction: false,
            spatial_2d: false,
            spatial_3d: false,
            hierarchy: false,
        };
        modes.set(frame, true);
        GameSettings {
            active_modes: modes,
            ..Default::default()
        }
    }

    #[test]
    fn test_pick_distinct_pair_always_distinct() {
        let mut rng = StdRng::seed_from_u64(20);
        for n in 2..8 {
            for _ in 0..500 {
                let (a, b) = pick_distinct_pair(n, &mut rng);
                assert_ne!(a, b);
                assert!(a < n && b < n);
            }
        }
    }

    #[test]
    fn test_no_frame_is_configuration_error() {
        let mut settings = only(Frame::Linear);
        settings.active_modes.linear = false;
        let mut rng = StdRng::seed_from_u64(21);
        let err = RoundGenerator::new()
            .generate(
                RoundRequest { settings: &settings, depth: 2, number: 1, cipher: None, key_changed: false },
                &mut rng,
            )
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_sample_query_answers_match_truth() {
        let mut rng = StdRng::seed_from_u64(22);
        let truth = [RelationKeyword::North, RelationKeyword::East];
        let mut saw = (false, false);
        for _ in 0..500 {
            let (kw, expected) = sample_query(&truth, &RelationKeyword::CARDINALS, &mut rng);
            assert_eq!(expected, truth.contains(&kw));
            if expected { saw.0 = true } else { saw.1 = true }
        }
        assert!(saw.0 && saw.1);
    }

    #[test]
    fn test_round_shape_per_frame() {
        let mut rng = StdRng::seed_from_u64(23);
        for frame in Frame::ALL {
            let settings = only(frame);
            for depth in 2..6 {
                let round = RoundGenerator::new()
                    .generate(
                        RoundRequest { settings: &settings, depth, number: 1, cipher: None, key_changed: false },
                        &mut rng,
                    )
                    .unwrap();
                assert_eq!(round.frame, frame);
                assert_eq!(round.symbols.len(), depth + 1);
                assert_eq!(round.premises.len(), depth);
                assert_ne!(round.query.subject, round.query.object);
                assert!(round.used_keywords.contains(&round.query.keyword));
                assert_eq!(round.spatial.is_some(), frame.is_spatial());
            }
        }
    }

    #[test]
    fn test_cipher_tokens_substituted_and_tracked() {
        let mut rng = StdRng::seed_from_u64(24);
        let key = CipherEngine::new().generate(&mut rng);
        let settings = only(Frame::Hierarchy);
        let round = RoundGenerator::new()
            .generate(
                RoundRequest { settings: &settings, depth: 3, number: 1, cipher: Some(&key), key_changed: false },
                &mut rng,
            )
            .unwrap();

        assert!(round.modifiers.cipher);
        for p in &round.premises {
            assert_eq!(Some(p.token.as_str()), key.token(p.keyword));
        }
        let legend = key.legend_for(&round.used_keywords);
        assert!(legend.token(RelationKeyword::Contains).is_some());
        assert!(legend.token(RelationKeyword::North).is_none());
    }

    #[test]
    fn test_without_cipher_tokens_are_canonical() {
        let mut rng = StdRng::seed_from_u64(25);
        let settings = only(Frame::Distinction);
        let round = RoundGenerator::new()
            .generate(
                RoundRequest { settings: &settings, depth: 2, number: 1, cipher: None, key_changed: false },
                &mut rng,
            )
            .unwrap();
        assert!(round.premises.iter().all(|p| p.token == p.keyword.canonical()));
        assert_eq!(round.query.token, round.query.keyword.canonical());
    }
}
