//! Hierarchy (containment) generator: item[i] CONTAINS item[i+1], never reversed

use rand::{Rng, RngCore};
use crate::core::generator::{pick_distinct_pair, GenerationContext, RelationGenerator, RoundBody};
use crate::types::{Frame, RelationKeyword, Symbol};

/// Ground truth for "is `a` INSIDE `b`?" / "does `a` CONTAIN `b`?"
pub fn evaluate(a: usize, b: usize, keyword: RelationKeyword) -> bool {
    match keyword {
        RelationKeyword::Inside => a > b,
        RelationKeyword::Contains => a < b,
        _ => false,
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HierarchyGenerator;

impl HierarchyGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl RelationGenerator for HierarchyGenerator {
    fn frame(&self) -> Frame {
        Frame::Hierarchy
    }

    fn generate(
        &self,
        symbols: &[Symbol],
        ctx: &mut GenerationContext<'_>,
        rng: &mut dyn RngCore,
    ) -> RoundBody {
        let n = symbols.len();
        let premises = (0..n.saturating_sub(1))
            .map(|i| ctx.premise(i, i + 1, RelationKeyword::Contains))
            .collect();

        let (a, b) = pick_distinct_pair(n, rng);
        let keyword = if rng.gen_bool(0.5) {
            RelationKeyword::Inside
        } else {
            RelationKeyword::Contains
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
    fn test_chain_is_strict() {
        let mut rng = StdRng::seed_from_u64(30);
        let symbols = SymbolProvider::new(SymbolStyle::Words).provide(5, &mut rng);
        let mut ctx = GenerationContext::new(None, false);
        let body = HierarchyGenerator::new().generate(&symbols, &mut ctx, &mut rng);
        for (i, p) in body.premises.iter().enumerate() {
            assert_eq!((p.subject.0, p.object.0, p.keyword), (i, i + 1, RelationKeyword::Contains));
        }
    }

    #[test]
    fn test_outer_is_not_inside_inner() {
        // A ⊃ B ⊃ C: "is A INSIDE C?" is false
        assert!(!evaluate(0, 2, RelationKeyword::Inside));
        assert!(evaluate(2, 0, RelationKeyword::Inside));
        assert!(evaluate(0, 2, RelationKeyword::Contains));
    }
}
