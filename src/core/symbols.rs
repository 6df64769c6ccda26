//! Symbol Provider: opaque display tokens for puzzle items
//!
//! Emoji come from a shuffled pool indexed modulo its size, so a round that
//! needs more items than the pool holds will repeat emoji.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use crate::types::{PolygonShape, Symbol, SymbolId, SymbolKind, SymbolStyle};
use crate::EMOJI_POOL;

const CONSONANTS: &[u8] = b"BCDFGHJKLMNPQRSTVWXZ";
const VOWELS: &[u8] = b"AEIOUY";

/// Re-rolls allowed per word before accepting a duplicate
const WORD_REROLLS: usize = 16;

/// Symbol provider for one style
#[derive(Debug, Clone, Copy)]
pub struct SymbolProvider {
    style: SymbolStyle,
}

impl SymbolProvider {
    pub fn new(style: SymbolStyle) -> Self {
        Self { style }
    }

    /// Produce `count` symbols with ids 0..count
    pub fn provide(&self, count: usize, rng: &mut dyn RngCore) -> Vec<Symbol> {
        let mut emoji: Vec<&str> = EMOJI_POOL.to_vec();
        emoji.shuffle(rng);

        let mut words: Vec<String> = Vec::with_capacity(count);
        let mut symbols = Vec::with_capacity(count);

        for i in 0..count {
            let style = match self.style {
                SymbolStyle::Mixed => roll_style(rng),
                fixed => fixed,
            };
            let kind = match style {
                SymbolStyle::Emoji => SymbolKind::Emoji(emoji[i % emoji.len()].to_string()),
                SymbolStyle::Voronoi => SymbolKind::Polygon(polygon(rng)),
                SymbolStyle::Words | SymbolStyle::Mixed => {
                    let word = fresh_word(&words, rng);
                    words.push(word.clone());
                    SymbolKind::Word(word)
                }
            };
            symbols.push(Symbol {
                id: SymbolId(i),
                kind,
            });
        }
        symbols
    }
}

fn roll_style(rng: &mut dyn RngCore) -> SymbolStyle {
    match rng.gen_range(0..3) {
        0 => SymbolStyle::Emoji,
        1 => SymbolStyle::Words,
        _ => SymbolStyle::Voronoi,
    }
}

fn pick(set: &[u8], rng: &mut dyn RngCore) -> char {
    set[rng.gen_range(0..set.len())] as char
}

/// Consonant-vowel-consonant nonsense word, e.g. "BAX"
fn nonsense_word(rng: &mut dyn RngCore) -> String {
    let mut word = String::with_capacity(3);
    word.push(pick(CONSONANTS, rng));
    word.push(pick(VOWELS, rng));
    word.push(pick(CONSONANTS, rng));
    word
}

fn fresh_word(taken: &[String], rng: &mut dyn RngCore) -> String {
    let mut word = nonsense_word(rng);
    for _ in 0..WORD_REROLLS {
        if !taken.contains(&word) {
            break;
        }
        word = nonsense_word(rng);
    }
    word
}

/// Star-ish polygon: 5-8 vertices at jittered radii around the centre
fn polygon(rng: &mut dyn RngCore) -> PolygonShape {
    let sides = rng.gen_range(5..=8);
    let vertices = (0..sides)
        .map(|i| {
            let angle = (i as f32 / sides as f32) * std::f32::consts::TAU;
            let radius: f32 = rng.gen_range(0.25..0.5);
            (0.5 + radius * angle.cos(), 0.5 + radius * angle.sin())
        })
        .collect();
    PolygonShape {
        hue: rng.gen_range(0..360),
        vertices,
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
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_sequential() {
        let mut rng = StdRng::seed_from_u64(1);
        let symbols = SymbolProvider::new(SymbolStyle::Words).provide(6, &mut rng);
        let ids: Vec<usize> = symbols.iter().map(|s| s.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_emoji_distinct_within_pool() {
        let mut rng = StdRng::seed_from_u64(2);
        let symbols = SymbolProvider::new(SymbolStyle::Emoji).provide(EMOJI_POOL.len(), &mut rng);
        let labels: HashSet<String> = symbols.iter().map(|s| s.label()).collect();
        assert_eq!(labels.len(), EMOJI_POOL.len());
    }

    #[test]
    fn test_emoji_repeat_past_pool_size() {
        let mut rng = StdRng::seed_from_u64(3);
        let n = EMOJI_POOL.len() + 3;
        let symbols = SymbolProvider::new(SymbolStyle::Emoji).provide(n, &mut rng);
        assert_eq!(symbols.len(), n);
        assert_eq!(symbols[0].kind, symbols[EMOJI_POOL.len()].kind);
    }

    #[test]
    fn test_words_follow_template() {
        let mut rng = StdRng::seed_from_u64(4);
        for s in SymbolProvider::new(SymbolStyle::Words).provide(10, &mut rng) {
            match s.kind {
                SymbolKind::Word(w) => {
                    let b = w.as_bytes();
                    assert_eq!(b.len(), 3);
                    assert!(CONSONANTS.contains(&b[0]));
                    assert!(VOWELS.contains(&b[1]));
                    assert!(CONSONANTS.contains(&b[2]));
                }
                other => panic!("expected word, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_polygons_in_unit_square() {
        let mut rng = StdRng::seed_from_u64(5);
        for s in SymbolProvider::new(SymbolStyle::Voronoi).provide(8, &mut rng) {
            let SymbolKind::Polygon(p) = s.kind else {
                panic!("expected polygon");
            };
            assert!((5..=8).contains(&p.vertices.len()));
            assert!(p.hue < 360);
            assert!(p.vertices.iter().all(|(x, y)| (0.0..=1.0).contains(x) && (0.0..=1.0).contains(y)));
        }
    }

    #[test]
    fn test_mixed_produces_several_styles() {
        let mut rng = StdRng::seed_from_u64(6);
        let symbols = SymbolProvider::new(SymbolStyle::Mixed).provide(40, &mut rng);
        let kinds: HashSet<&str> = symbols
            .iter()
            .map(|s| match s.kind {
                SymbolKind::Emoji(_) => "emoji",
                SymbolKind::Word(_) => "word",
                SymbolKind::Polygon(_) => "polygon",
            })
            .collect();
        assert!(kinds.len() >= 2);
    }
}
