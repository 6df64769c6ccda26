//! Distinction (identity) generator
//!
//! Each item carries a hidden boolean. The first is random; every link
//! either keeps it (SAME) or flips it (DIFFERENT), so premises and values
//! agree by construction.

use rand::{Rng, RngCore};
use crate::core::generator::{pick_distinct_pair, GenerationContext, RelationGenerator, RoundBody};
use crate::types::{Frame, RelationKeyword, Symbol};

/// Values implied by a start value and the link keywords
pub fn chain_values(start: bool, links: &[RelationKeyword]) -> Vec<bool> {
    let mut values = Vec::with_capacity(links.len() + 1);
    values.push(start);
    for link in links {
        let prev = values[values.len() - 1];
        values.push(if *link == RelationKeyword::Different { !prev } else { prev });
    }
    values
}

/// Ground truth for "is item `a` <SAME|DIFFERENT> as item `b`?"
pub fn evaluate(values: &[bool], a: usize, b: usize, keyword: RelationKeyword) -> bool {
    let same = values[a] == values[b];
    match keyword {
        RelationKeyword::Same => same,
        RelationKeyword::Different => !same,
        _ => false,
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DistinctionGenerator;

impl DistinctionGenerator {
    pub fn new() -> Self {
        Self
    }
}

fn same_or_different(rng: &mut dyn RngCore) -> RelationKeyword {
    if rng.gen_bool(0.5) {
        RelationKeyword::Same
    } else {
        RelationKeyword::Different
    }
}

impl RelationGenerator for DistinctionGenerator {
    fn frame(&self) -> Frame {
        Frame::Distinction
    }

    fn generate(
        &self,
        symbols: &[Symbol],
        ctx: &mut GenerationContext<'_>,
        rng: &mut dyn RngCore,
    ) -> RoundBody {
        let n = symbols.len();
        let start = rng.gen_bool(0.5);
        let links: Vec<RelationKeyword> = (0..n.saturating_sub(1)).map(|_| same_or_different(rng)).collect();
        let values = chain_values(start, &links);

        let premises = links
            .iter()
            .enumerate()
            .map(|(i, link)| ctx.premise(i + 1, i, *link))
            .collect();

        let (a, b) = pick_distinct_pair(n, rng);
        let keyword = same_or_different(rng);
        let query = ctx.query(a, b, keyword, evaluate(&values, a, b, keyword));

        RoundBody {
            premises,
            query,
            spatial: None,
        }
    }
}
