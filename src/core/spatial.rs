//! Spatial generator (2D and 3D)
//!
//! Item 0 sits at the origin; every next item is one unit step from the
//! previous one along a random axis direction, giving one premise per step.
//! Query modes:
//! - STANDARD: map direction between two items
//! - DEICTIC: bearing of a target from an observer with a facing
//! - MOVEMENT: bearing of a target after a short walk
//!
//! With deictic or movement enabled, STANDARD is never drawn.
//! Night mode inverts the relation before the query is sampled.

use std::collections::BTreeMap;
use rand::{Rng, RngCore};
use crate::core::generator::{
    pick_distinct_pair, pick_keyword, sample_query, GenerationContext, RelationGenerator, RoundBody,
};
use crate::core::{geometry, transform};
use crate::types::{
    Frame, Heading, Instruction, MovementQueryPolicy, Observer, Position, Premise, Query,
    RelationKeyword, SpatialDetail, SpatialMode, Symbol, SymbolId, Walk,
};
use crate::{MOVEMENT_MAX_STEPS, MOVEMENT_MIN_STEPS, MOVEMENT_REROLL_LIMIT};

const DIRECTIONS_2D: [RelationKeyword; 4] = RelationKeyword::CARDINALS;

const DIRECTIONS_3D: [RelationKeyword; 6] = [
    RelationKeyword::North,
    RelationKeyword::South,
    RelationKeyword::East,
    RelationKeyword::West,
    RelationKeyword::Above,
    RelationKeyword::Below,
];

/// Bearings the equality policy may ask about
const ALL_BEARINGS: [RelationKeyword; 5] = [
    RelationKeyword::Front,
    RelationKeyword::Behind,
    RelationKeyword::Left,
    RelationKeyword::Right,
    RelationKeyword::SameLocation,
];

/// Unit offset of a map direction
pub fn unit_step(direction: RelationKeyword) -> (i32, i32, i32) {
    match direction {
        RelationKeyword::North => (0, 1, 0),
        RelationKeyword::South => (0, -1, 0),
        RelationKeyword::East => (1, 0, 0),
        RelationKeyword::West => (-1, 0, 0),
        RelationKeyword::Above => (0, 0, 1),
        RelationKeyword::Below => (0, 0, -1),
        _ => (0, 0, 0),
    }
}

/// Positions implied by a chain of step directions, starting at the origin
pub fn walk_positions(steps: &[RelationKeyword]) -> Vec<Position> {
    let mut positions = Vec::with_capacity(steps.len() + 1);
    positions.push(Position::ORIGIN);
    for step in steps {
        let (dx, dy, dz) = unit_step(*step);
        let last = positions[positions.len() - 1];
        positions.push(last.offset(dx, dy, dz));
    }
    positions
}

/// Ground truth of a STANDARD query: does `keyword` belong to the (possibly
/// inverted) relation of `subject` relative to `object`?
pub fn relation_holds(
    subject: &Position,
    object: &Position,
    keyword: RelationKeyword,
    three_d: bool,
    night: bool,
) -> bool {
    let truth = geometry::map_relation(subject, object, three_d);
    transform::effective_relation(&truth, night).contains(&keyword)
}

#[derive(Debug, Clone, Copy)]
pub struct SpatialGenerator {
    three_d: bool,
}

impl SpatialGenerator {
    pub fn new(three_d: bool) -> Self {
        Self { three_d }
    }

    fn directions(&self) -> &'static [RelationKeyword] {
        if self.three_d {
            &DIRECTIONS_3D
        } else {
            &DIRECTIONS_2D
        }
    }

    fn standard(
        &self,
        positions: &[Position],
        ctx: &mut GenerationContext<'_>,
        rng: &mut dyn RngCore,
    ) -> (Query, Option<Observer>, Option<Walk>) {
        let (a, b) = pick_distinct_pair(positions.len(), rng);
        let truth = geometry::map_relation(&positions[a], &positions[b], self.three_d);
        let effective = transform::effective_relation(&truth, ctx.night);
        let (keyword, expected) = sample_query(&effective, self.directions(), rng);
        (ctx.query(a, b, keyword, expected), None, None)
    }

    fn deictic(
        &self,
        positions: &[Position],
        ctx: &mut GenerationContext<'_>,
        rng: &mut dyn RngCore,
    ) -> (Query, Option<Observer>, Option<Walk>) {
        let (observer, target) = pick_distinct_pair(positions.len(), rng);
        let facing = Heading::ALL[rng.gen_range(0..Heading::ALL.len())];
        let truth = geometry::bearing(&positions[observer], facing, &positions[target]);
        let effective = transform::effective_relation(&[truth], ctx.night);
        let (keyword, expected) = sample_query(&effective, &RelationKeyword::BEARINGS, rng);

        let observer_detail = Observer {
            symbol: SymbolId(observer),
            facing,
            facing_token: ctx.token(facing.keyword()),
        };
        (ctx.query(target, observer, keyword, expected), Some(observer_detail), None)
    }

    fn movement(
        &self,
        positions: &[Position],
        ctx: &mut GenerationContext<'_>,
        rng: &mut dyn RngCore,
    ) -> (Query, Option<Observer>, Option<Walk>) {
        let n = positions.len();
        let start = rng.gen_range(0..n);
        let start_heading = Heading::ALL[rng.gen_range(0..Heading::ALL.len())];
        let heading_token = ctx.token(start_heading.keyword());

        let step_count = rng.gen_range(MOVEMENT_MIN_STEPS..=MOVEMENT_MAX_STEPS);
        let instructions: Vec<Instruction> = (0..step_count)
            .map(|_| {
                let keyword = if rng.gen_bool(0.5) {
                    RelationKeyword::Forward
                } else if rng.gen_bool(0.5) {
                    RelationKeyword::TurnLeft
                } else {
                    RelationKeyword::TurnRight
                };
                Instruction {
                    keyword,
                    token: ctx.token(keyword),
                }
            })
            .collect();
        let (final_position, final_heading) =
            geometry::integrate(positions[start], start_heading, &instructions);

        let target = pick_target(positions, start, &final_position, rng);
        let truth = geometry::bearing(&final_position, final_heading, &positions[target]);
        let effective = transform::effective_relation(&[truth], ctx.night);
        let (keyword, expected) = match ctx.movement_policy {
            MovementQueryPolicy::Symmetric => sample_query(&effective, &RelationKeyword::BEARINGS, rng),
            MovementQueryPolicy::Equality => {
                let keyword = pick_keyword(&ALL_BEARINGS, rng);
                (keyword, effective.contains(&keyword))
            }
        };

        let walk = Walk {
            start: SymbolId(start),
            start_heading,
            heading_token,
            instructions,
            final_position,
            final_heading,
        };
        (ctx.query(target, start, keyword, expected), None, Some(walk))
    }
}

/// Movement target: never the start item, preferably one the walker is not
/// standing on. After `MOVEMENT_REROLL_LIMIT` draws the last one is kept,
/// even if it coincides with the walker (bearing SAME LOCATION).
fn pick_target(positions: &[Position], start: usize, walker: &Position, rng: &mut dyn RngCore) -> usize {
    let mut target = pick_other(positions.len(), start, rng);
    for _ in 1..MOVEMENT_REROLL_LIMIT {
        if positions[target] != *walker {
            break;
        }
        target = pick_other(positions.len(), start, rng);
    }
    target
}

/// Index in 0..n other than `skip` (n ≥ 2)
fn pick_other(n: usize, skip: usize, rng: &mut dyn RngCore) -> usize {
    let i = rng.gen_range(0..n - 1);
    if i >= skip {
        i + 1
    } else {
        i
    }
}

impl RelationGenerator for SpatialGenerator {
    fn frame(&self) -> Frame {
        if self.three_d {
            Frame::Spatial3D
        } else {
            Frame::Spatial2D
        }
    }

    fn generate(
        &self,
        symbols: &[Symbol],
        ctx: &mut GenerationContext<'_>,
        rng: &mut dyn RngCore,
    ) -> RoundBody {
        let n = symbols.len();
        let steps: Vec<RelationKeyword> = (0..n.saturating_sub(1))
            .map(|_| pick_keyword(self.directions(), rng))
            .collect();
        let positions = walk_positions(&steps);
        let premises: Vec<Premise> = steps
            .iter()
            .enumerate()
            .map(|(i, step)| ctx.premise(i + 1, i, *step))
            .collect();

        let mode = if ctx.spatial_modes.is_empty() {
            SpatialMode::Standard
        } else {
            ctx.spatial_modes[rng.gen_range(0..ctx.spatial_modes.len())]
        };

        let (query, observer, walk) = match mode {
            SpatialMode::Standard => self.standard(&positions, ctx, rng),
            SpatialMode::Deictic => self.deictic(&positions, ctx, rng),
            SpatialMode::Movement => self.movement(&positions, ctx, rng),
        };

        let positions: BTreeMap<SymbolId, Position> = positions
            .into_iter()
            .enumerate()
            .map(|(i, p)| (SymbolId(i), p))
            .collect();

        RoundBody {
            premises,
            query,
            spatial: Some(SpatialDetail {
                mode,
                positions,
                observer,
                walk,
            }),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::symbols::SymbolProvider;
    use crate::types::SymbolStyle;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn run(three_d: bool, modes: Vec<SpatialMode>, night: bool, seed: u64) -> RoundBody {
        let mut rng = StdRng::seed_from_u64(seed);
        let symbols = SymbolProvider::new(SymbolStyle::Words).provide(5, &mut rng);
        let mut ctx = GenerationContext::new(None, night).with_spatial_modes(modes);
        SpatialGenerator::new(three_d).generate(&symbols, &mut ctx, &mut rng)
    }

    #[test]
    fn test_positions_follow_premises() {
        for seed in 0..50 {
            let body = run(true, vec![], false, seed);
            let detail = body.spatial.unwrap();
            for p in &body.premises {
                let (dx, dy, dz) = unit_step(p.keyword);
                let from = detail.positions[&p.object];
                assert_eq!(detail.positions[&p.subject], from.offset(dx, dy, dz));
            }
        }
    }

    #[test]
    fn test_two_d_stays_flat() {
        for seed in 0..50 {
            let body = run(false, vec![], false, seed);
            let detail = body.spatial.unwrap();
            assert!(detail.positions.values().all(|p| p.z == 0));
            assert!(body.premises.iter().all(|p| !matches!(p.keyword, RelationKeyword::Above | RelationKeyword::Below)));
        }
    }

    #[test]
    fn test_standard_answers_are_derivable() {
        for night in [false, true] {
            for seed in 0..200 {
                let body = run(true, vec![], night, seed);
                let detail = body.spatial.unwrap();
                assert_eq!(detail.mode, SpatialMode::Standard);
                let q = &body.query;
                let holds = relation_holds(
                    &detail.positions[&q.subject],
                    &detail.positions[&q.object],
                    q.keyword,
                    true,
                    night,
                );
                assert_eq!(q.expected, holds, "seed {seed} night {night}");
            }
        }
    }

    #[test]
    fn test_modifiers_exclude_standard() {
        for seed in 0..100 {
            let body = run(false, vec![SpatialMode::Deictic, SpatialMode::Movement], false, seed);
            assert_ne!(body.spatial.unwrap().mode, SpatialMode::Standard);
        }
    }

    #[test]
    fn test_deictic_answers_are_derivable() {
        for night in [false, true] {
            for seed in 0..200 {
                let body = run(false, vec![SpatialMode::Deictic], night, seed);
                let detail = body.spatial.unwrap();
                let observer = detail.observer.unwrap();
                let q = &body.query;
                assert_eq!(q.object, observer.symbol);
                let truth = geometry::bearing(&detail.positions[&observer.symbol], observer.facing, &detail.positions[&q.subject]);
                let truth = if night { transform::invert_keyword(truth) } else { truth };
                assert_eq!(q.expected, q.keyword == truth, "seed {seed}");
            }
        }
    }

    #[test]
    fn test_movement_answers_are_derivable() {
        for seed in 0..200 {
            let body = run(false, vec![SpatialMode::Movement], false, seed);
            let detail = body.spatial.unwrap();
            let walk = detail.walk.unwrap();
            assert!((MOVEMENT_MIN_STEPS..=MOVEMENT_MAX_STEPS).contains(&walk.instructions.len()));

            let (pos, heading) = geometry::integrate(detail.positions[&walk.start], walk.start_heading, &walk.instructions);
            assert_eq!((pos, heading), (walk.final_position, walk.final_heading));

            let q = &body.query;
            assert_eq!(q.object, walk.start);
            assert_ne!(q.subject, walk.start);
            let truth = geometry::bearing(&pos, heading, &detail.positions[&q.subject]);
            assert_eq!(q.expected, q.keyword == truth, "seed {seed}");
        }
    }

    #[test]
    fn test_movement_equality_policy() {
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let symbols = SymbolProvider::new(SymbolStyle::Words).provide(4, &mut rng);
            let mut ctx = GenerationContext::new(None, false)
                .with_spatial_modes(vec![SpatialMode::Movement])
                .with_movement_policy(MovementQueryPolicy::Equality);
            let body = SpatialGenerator::new(false).generate(&symbols, &mut ctx, &mut rng);
            let detail = body.spatial.unwrap();
            let walk = detail.walk.unwrap();
            let truth = geometry::bearing(&walk.final_position, walk.final_heading, &detail.positions[&body.query.subject]);
            assert_eq!(body.query.expected, body.query.keyword == truth);
        }
    }

    #[test]
    fn test_target_falls_back_to_walker_position() {
        let walker = Position::new(0, 1, 0);
        let positions = vec![Position::ORIGIN, walker, walker, walker];
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let target = pick_target(&positions, 0, &walker, &mut rng);
            assert_ne!(target, 0);
            assert_eq!(positions[target], walker);

            let truth = geometry::bearing(&walker, Heading::North, &positions[target]);
            assert_eq!(truth, RelationKeyword::SameLocation);
            let (keyword, expected) = sample_query(&[truth], &RelationKeyword::BEARINGS, &mut rng);
            assert_eq!(expected, keyword == truth);
        }
    }

    #[test]
    fn test_target_avoids_walker_when_possible() {
        let walker = Position::new(0, 1, 0);
        let positions = vec![Position::ORIGIN, walker, Position::new(1, 1, 0), walker];
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_eq!(pick_target(&positions, 0, &walker, &mut rng), 2);
        }
    }

    #[test]
    fn test_used_keywords_cover_walk_and_facing() {
        let mut rng = StdRng::seed_from_u64(77);
        let symbols = SymbolProvider::new(SymbolStyle::Words).provide(4, &mut rng);
        let mut ctx = GenerationContext::new(None, false).with_spatial_modes(vec![SpatialMode::Movement]);
        let body = SpatialGenerator::new(false).generate(&symbols, &mut ctx, &mut rng);
        let walk = body.spatial.unwrap().walk.unwrap();
        let used = ctx.used_keywords();
        assert!(used.contains(&walk.start_heading.keyword()));
        assert!(walk.instructions.iter().all(|i| used.contains(&i.keyword)));
        assert!(used.contains(&body.query.keyword));
    }
}
