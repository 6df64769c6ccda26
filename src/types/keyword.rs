//! Canonical relation vocabulary

use serde::{Deserialize, Serialize};

/// Every relation term a premise, query or instruction can use.
///
/// Process-wide and immutable; the cipher maps each one to a session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationKeyword {
    // Magnitude
    Greater,
    Less,
    // Identity
    Same,
    Different,
    // Containment
    Contains,
    Inside,
    // Cardinal / vertical direction
    North,
    South,
    East,
    West,
    Above,
    Below,
    // Local bearing
    Front,
    Behind,
    Left,
    Right,
    SameLocation,
    // Movement instructions
    Forward,
    TurnLeft,
    TurnRight,
}

impl RelationKeyword {
    /// The full keyword list, in cipher zip order
    pub const ALL: [RelationKeyword; 20] = [
        Self::Greater,
        Self::Less,
        Self::Same,
        Self::Different,
        Self::Contains,
        Self::Inside,
        Self::North,
        Self::South,
        Self::East,
        Self::West,
        Self::Above,
        Self::Below,
        Self::Front,
        Self::Behind,
        Self::Left,
        Self::Right,
        Self::SameLocation,
        Self::Forward,
        Self::TurnLeft,
        Self::TurnRight,
    ];

    /// The four horizontal compass directions
    pub const CARDINALS: [RelationKeyword; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// The four perspective bearings (SAME LOCATION excluded)
    pub const BEARINGS: [RelationKeyword; 4] = [Self::Front, Self::Behind, Self::Left, Self::Right];

    /// Canonical display text
    pub fn canonical(&self) -> &'static str {
        match self {
            Self::Greater => "GREATER",
            Self::Less => "LESS",
            Self::Same => "SAME",
            Self::Different => "DIFFERENT",
            Self::Contains => "CONTAINS",
            Self::Inside => "INSIDE",
            Self::North => "NORTH",
            Self::South => "SOUTH",
            Self::East => "EAST",
            Self::West => "WEST",
            Self::Above => "ABOVE",
            Self::Below => "BELOW",
            Self::Front => "FRONT",
            Self::Behind => "BEHIND",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::SameLocation => "SAME LOCATION",
            Self::Forward => "FORWARD",
            Self::TurnLeft => "TURN LEFT",
            Self::TurnRight => "TURN RIGHT",
        }
    }
}

impl std::fmt::Display for RelationKeyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_is_distinct() {
        let set: HashSet<_> = RelationKeyword::ALL.iter().collect();
        assert_eq!(set.len(), RelationKeyword::ALL.len());
    }

    #[test]
    fn test_pool_covers_vocabulary() {
        assert!(crate::CIPHER_TOKEN_POOL.len() >= RelationKeyword::ALL.len());
    }
}
