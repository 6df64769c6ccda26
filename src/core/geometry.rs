//! Geometry: rotation into an observer's frame and bearing classification
//!
//! Shared by the deictic and movement spatial modes. Only the horizontal
//! plane takes part; vertical offsets do not change a bearing.

use crate::types::{Heading, Instruction, Position, RelationKeyword};

/// Rotate a map displacement into the local frame of an observer.
///
/// Local +y is straight ahead, local +x is to the right.
pub fn to_local(dx: i32, dy: i32, facing: Heading) -> (i32, i32) {
    match facing {
        Heading::North => (dx, dy),
        Heading::East => (-dy, dx),
        Heading::South => (-dx, -dy),
        Heading::West => (dy, -dx),
    }
}

/// Classify a local vector with forward dominance: ahead/behind wins ties.
pub fn classify_local(lx: i32, ly: i32) -> RelationKeyword {
    if ly > 0 && lx.abs() <= ly {
        RelationKeyword::Front
    } else if ly < 0 && lx.abs() <= ly.abs() {
        RelationKeyword::Behind
    } else if lx > 0 {
        RelationKeyword::Right
    } else if lx < 0 {
        RelationKeyword::Left
    } else {
        RelationKeyword::SameLocation
    }
}

/// Bearing of `target` as seen from `from` while facing `facing`
pub fn bearing(from: &Position, facing: Heading, target: &Position) -> RelationKeyword {
    let (dx, dy, _) = from.delta_to(target);
    let (lx, ly) = to_local(dx, dy, facing);
    classify_local(lx, ly)
}

/// Map-relative relation set of `subject` relative to `object`.
///
/// Each axis with a nonzero displacement contributes one direction; a
/// zero displacement gives `[SameLocation]`. Vertical only counts in 3D.
pub fn map_relation(subject: &Position, object: &Position, three_d: bool) -> Vec<RelationKeyword> {
    let (dx, dy, dz) = object.delta_to(subject);
    let mut relation = Vec::with_capacity(3);
    if three_d {
        if dz > 0 {
            relation.push(RelationKeyword::Above);
        } else if dz < 0 {
            relation.push(RelationKeyword::Below);
        }
    }
    if dy > 0 {
        relation.push(RelationKeyword::North);
    } else if dy < 0 {
        relation.push(RelationKeyword::South);
    }
    if dx > 0 {
        relation.push(RelationKeyword::East);
    } else if dx < 0 {
        relation.push(RelationKeyword::West);
    }
    if relation.is_empty() {
        relation.push(RelationKeyword::SameLocation);
    }
    relation
}

/// Path integration: follow instructions from a start pose
pub fn integrate(start: Position, heading: Heading, steps: &[Instruction]) -> (Position, Heading) {
    steps.iter().fold((start, heading), |(pos, h), step| match step.keyword {
        RelationKeyword::Forward => {
            let (dx, dy) = h.step();
            (pos.offset(dx, dy, 0), h)
        }
        RelationKeyword::TurnLeft => (pos, h.turn_left()),
        RelationKeyword::TurnRight => (pos, h.turn_right()),
        _ => (pos, h),
    })
}

// =============================================================================
// TESTS
// =============================================================================
