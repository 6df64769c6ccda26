//! Round model: premises, query and the modifiers in play
//!
//! The core emits structured tuples (symbol ids, keyword, substituted token).
//! Sentence assembly belongs to the presentation layer.

use std::collections::{BTreeMap, BTreeSet};
use serde::{Deserialize, Serialize};
use crate::types::{Heading, Position, RelationKeyword, Symbol, SymbolId};

/// Relational frame of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Frame {
    #[serde(rename = "LINEAR")]
    Linear,
    #[serde(rename = "DISTINCTION")]
    Distinction,
    #[serde(rename = "HIERARCHY")]
    Hierarchy,
    #[serde(rename = "SPATIAL_2D")]
    Spatial2D,
    #[serde(rename = "SPATIAL_3D")]
    Spatial3D,
}

impl Frame {
    pub const ALL: [Frame; 5] = [
        Frame::Linear,
        Frame::Distinction,
        Frame::Hierarchy,
        Frame::Spatial2D,
        Frame::Spatial3D,
    ];

    pub fn is_spatial(&self) -> bool {
        matches!(self, Frame::Spatial2D | Frame::Spatial3D)
    }
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Frame::Linear => "LINEAR",
            Frame::Distinction => "DISTINCTION",
            Frame::Hierarchy => "HIERARCHY",
            Frame::Spatial2D => "SPATIAL_2D",
            Frame::Spatial3D => "SPATIAL_3D",
        };
        write!(f, "{}", name)
    }
}

/// Query style of a spatial round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpatialMode {
    /// Map-relative direction between two items
    Standard,
    /// Bearing from an observer facing a given way
    Deictic,
    /// Bearing after following walk instructions
    Movement,
}

/// "subject <keyword> object", e.g. B NORTH A
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Premise {
    pub subject: SymbolId,
    pub object: SymbolId,
    pub keyword: RelationKeyword,
    /// Keyword as displayed (cipher token or canonical word)
    pub token: String,
}

/// One step of a movement walk (FORWARD, TURN LEFT, TURN RIGHT)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub keyword: RelationKeyword,
    pub token: String,
}

/// The question and its ground truth
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub subject: SymbolId,
    pub object: SymbolId,
    pub keyword: RelationKeyword,
    pub token: String,
    /// Correct answer after all modifiers are applied
    pub expected: bool,
}

/// Observer of a deictic round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observer {
    pub symbol: SymbolId,
    pub facing: Heading,
    pub facing_token: String,
}

/// Path of a movement round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Walk {
    pub start: SymbolId,
    pub start_heading: Heading,
    pub heading_token: String,
    pub instructions: Vec<Instruction>,
    pub final_position: Position,
    pub final_heading: Heading,
}

/// Spatial extras, read-only for the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpatialDetail {
    pub mode: SpatialMode,
    pub positions: BTreeMap<SymbolId, Position>,
    pub observer: Option<Observer>,
    pub walk: Option<Walk>,
}

/// Modifiers active for one round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundModifiers {
    /// Context inversion in effect
    pub night: bool,
    /// Cipher tokens replace keywords
    pub cipher: bool,
    /// A new cipher key was drawn for this round
    pub key_changed: bool,
    /// Premises hidden once the question shows
    pub blind: bool,
    /// Interference task runs before the question
    pub interference: bool,
}

/// Everything the presentation layer needs for one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    /// 1-based round number in the session
    pub number: u32,
    pub frame: Frame,
    /// Premise count requested for this round
    pub depth: usize,
    pub symbols: Vec<Symbol>,
    pub premises: Vec<Premise>,
    pub query: Query,
    pub spatial: Option<SpatialDetail>,
    pub modifiers: RoundModifiers,
    /// Keywords referenced by premises, instructions, facing and query
    pub used_keywords: BTreeSet<RelationKeyword>,
}

impl RoundState {
    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0)
    }

    pub fn spatial_mode(&self) -> Option<SpatialMode> {
        self.spatial.as_ref().map(|s| s.mode)
    }

    /// Read-only position map (spatial rounds only)
    pub fn positions(&self) -> Option<&BTreeMap<SymbolId, Position>> {
        self.spatial.as_ref().map(|s| &s.positions)
    }
}
