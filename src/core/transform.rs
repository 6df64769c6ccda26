//! Transformation layer: context inversion ("night mode")
//!
//! Spatial frames invert the relation before the query is sampled, so the
//! direction word shown stays meaningful. Other frames have no direction to
//! flip and negate the final answer instead.

use rand::{Rng, RngCore};
use crate::types::{Frame, RelationKeyword};
use crate::NIGHT_MODE_PROBABILITY;

/// Roll night mode for a round
pub fn roll_night(enabled: bool, rng: &mut dyn RngCore) -> bool {
    enabled && rng.gen_bool(NIGHT_MODE_PROBABILITY)
}

/// Opposite of a directional keyword. Non-directional keywords and SAME
/// LOCATION map to themselves.
pub fn invert_keyword(keyword: RelationKeyword) -> RelationKeyword {
    use RelationKeyword::*;
    match keyword {
        North => South,
        South => North,
        East => West,
        West => East,
        Above => Below,
        Below => Above,
        Left => Right,
        Right => Left,
        Front => Behind,
        Behind => Front,
        other => other,
    }
}

/// Invert every component of a relation (multi-axis allowed)
pub fn invert_relation(relation: &[RelationKeyword]) -> Vec<RelationKeyword> {
    relation.iter().map(|k| invert_keyword(*k)).collect()
}

/// Relation in effect for the round
pub fn effective_relation(relation: &[RelationKeyword], night: bool) -> Vec<RelationKeyword> {
    if night {
        invert_relation(relation)
    } else {
        relation.to_vec()
    }
}

/// Final answer for a non-spatial frame. Spatial answers pass through,
/// their inversion already happened on the relation.
pub fn apply_to_answer(frame: Frame, expected: bool, night: bool) -> bool {
    if night && !frame.is_spatial() {
        !expected
    } else {
        expected
    }
}
