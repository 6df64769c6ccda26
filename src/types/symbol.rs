//! Puzzle item tokens

use serde::{Deserialize, Serialize};

/// Index of a symbol inside its round (0 = first item of the chain)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SymbolId(pub usize);

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How symbols are drawn for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SymbolStyle {
    Emoji,
    #[default]
    Words,
    Voronoi,
    /// Re-roll one of the other styles per symbol
    Mixed,
}

/// Procedural polygon parameters. The renderer draws it; the core only rolls it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonShape {
    /// Hue in degrees (0-359)
    pub hue: u16,
    /// Vertices on the unit square, in drawing order
    pub vertices: Vec<(f32, f32)>,
}

/// Display payload of a symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SymbolKind {
    Emoji(String),
    Word(String),
    Polygon(PolygonShape),
}

/// An opaque puzzle item. Symbols carry no meaning; any two are interchangeable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub id: SymbolId,
    pub kind: SymbolKind,
}

impl Symbol {
    /// Short text label (polygons fall back to their id)
    pub fn label(&self) -> String {
        match &self.kind {
            SymbolKind::Emoji(e) => e.clone(),
            SymbolKind::Word(w) => w.clone(),
            SymbolKind::Polygon(p) => format!("◆{}/{}", self.id.0, p.hue),
        }
    }
}
