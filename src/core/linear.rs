//! Linear (magnitude) generator
//!
//! Items are ordered by index: a later item is always the greater one.
//! Each link is phrased with a randomly chosen keyword, oriented so it states
//! that order: GREATER puts the later item first, LESS the earlier one.

use rand::{Rng, RngCore};
use crate::core::generator::{pick_distinct_pair, GenerationContext, RelationGenerator, RoundBody};
use crate::types::{Frame, RelationKeyword, Symbol};

/// Ground truth for "is item `a` <keyword> than item `b`?"
pub fn evaluate(a: usize, b: usize, keyword: RelationKeyword) -> bool {
    match keyword {
        RelationKeyword::Greater => a > b,
        RelationKeyword::Less => a < b,
        _ => false,
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LinearGenerator;

impl LinearGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl RelationGenerator for LinearGenerator {
    fn frame(&self) -> Frame {
        Frame::Linear
    }

    fn generate(
        &self,
        symbols: &[Symbol],
        ctx: &mut GenerationContext<'_>,
        rng: &mut dyn RngCore,
    ) -> RoundBody {
        let n = symbols.len();
        let premises = (0..n.saturating_sub(1))
            .map(|i| {
                if rng.gen_bool(0.5) {
                    ctx.premise(i + 1, i, RelationKeyword::Greater)
                } else {
                    ctx.premise(i, i + 1, RelationKeyword::Less)
                }
            })
            .collect();

        let (a, b) = pick_distinct_pair(n, rng);
        let keyword = if rng.gen_bool(0.5) {
            RelationKeyword::Greater
        } else {
            RelationKeyword::Less
        };
        let query = ctx.query(a, b, keyword, evaluate(a, b, keyword));

        RoundBody {
            premises,
            query,
            spatial: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::symbols::SymbolProvider;
    use crate::types::SymbolStyle;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_evaluate_index_order() {
        assert!(evaluate(3, 1, RelationKeyword::Greater));
        assert!(!evaluate(1, 3, RelationKeyword::Greater));
        assert!(evaluate(0, 2, RelationKeyword::Less));
        assert!(!evaluate(0, 2, RelationKeyword::Same));
    }

    #[test]
    fn test_premises_chain_with_index_order() {
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let symbols = SymbolProvider::new(SymbolStyle::Words).provide(5, &mut rng);
            let mut ctx = GenerationContext::new(None, false);
            let body = LinearGenerator::new().generate(&symbols, &mut ctx, &mut rng);

            assert_eq!(body.premises.len(), 4);
            for p in &body.premises {
                // Every stated link agrees with the index-order ground truth
                assert!(evaluate(p.subject.0, p.object.0, p.keyword));
                assert_eq!(p.subject.0.abs_diff(p.object.0), 1);
            }
            let q = &body.query;
            assert_eq!(q.expected, evaluate(q.subject.0, q.object.0, q.keyword));
        }
    }
}
