//! Lattice positions and headings

use serde::{Deserialize, Serialize};
use crate::types::RelationKeyword;

/// Integer lattice point. `z` stays 0 outside 3D rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0, z: 0 };

    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Displacement from `self` to `other`
    pub fn delta_to(&self, other: &Position) -> (i32, i32, i32) {
        (other.x - self.x, other.y - self.y, other.z - self.z)
    }

    pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> Position {
        Position::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

/// Facing of an observer or walker. North is +y, east is +x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::North, Heading::East, Heading::South, Heading::West];

    /// Quarter turn counter-clockwise
    pub fn turn_left(self) -> Heading {
        match self {
            Heading::North => Heading::West,
            Heading::West => Heading::South,
            Heading::South => Heading::East,
            Heading::East => Heading::North,
        }
    }

    /// Quarter turn clockwise
    pub fn turn_right(self) -> Heading {
        match self {
            Heading::North => Heading::East,
            Heading::East => Heading::South,
            Heading::South => Heading::West,
            Heading::West => Heading::North,
        }
    }

    /// Unit step (dx, dy) of one pace forward
    pub fn step(self) -> (i32, i32) {
        match self {
            Heading::North => (0, 1),
            Heading::East => (1, 0),
            Heading::South => (0, -1),
            Heading::West => (-1, 0),
        }
    }

    /// Matching cardinal keyword (used when the facing is shown)
    pub fn keyword(self) -> RelationKeyword {
        match self {
            Heading::North => RelationKeyword::North,
            Heading::East => RelationKeyword::East,
            Heading::South => RelationKeyword::South,
            Heading::West => RelationKeyword::West,
        }
    }
}

impl std::fmt::Display for Heading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_turns_return_home() {
        for h in Heading::ALL {
            assert_eq!(h.turn_left().turn_left().turn_left().turn_left(), h);
            assert_eq!(h.turn_right().turn_left(), h);
        }
    }

    #[test]
    fn test_delta_to() {
        let a = Position::new(1, 2, 0);
        let b = Position::new(-1, 3, 2);
        assert_eq!(a.delta_to(&b), (-2, 1, 2));
    }
}
