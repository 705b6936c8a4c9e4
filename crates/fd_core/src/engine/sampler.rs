use rand::Rng;

use crate::models::{Candidate, CandidateId};
use crate::strategy::StrategyDescriptor;

/// Sampling weight of one candidate under the resolved strategy. Negative
/// transform outputs clamp to zero; disabling `weighted_random` flattens
/// everything to 1.
pub fn weight_of(
    candidate: &Candidate,
    strategy: &StrategyDescriptor,
    weighted_random: bool,
) -> f64 {
    if !weighted_random {
        return 1.0;
    }
    strategy.transform.weight(candidate).max(0.0)
}

/// Weighted sampling without replacement: draws `min(requested, |pool|)`
/// winners in order.
///
/// Each step draws one candidate with probability `w_i / sum(w)` via a
/// cumulative-weight scan against a single roll in `[0, sum(w))`, then
/// removes it from the remaining pool, so winners never repeat. A step whose
/// weights sum to zero falls back to a uniform draw among the remaining
/// candidates, so the draw never stalls. An empty pool yields an empty
/// list; that is a reportable outcome, not an error.
pub fn draw(
    pool: &[&Candidate],
    strategy: &StrategyDescriptor,
    weighted_random: bool,
    requested: usize,
    rng: &mut impl Rng,
) -> Vec<CandidateId> {
    let mut remaining: Vec<(f64, &Candidate)> = pool
        .iter()
        .map(|candidate| (weight_of(candidate, strategy, weighted_random), *candidate))
        .collect();

    let take = requested.min(remaining.len());
    let mut winners = Vec::with_capacity(take);

    for _ in 0..take {
        let total: f64 = remaining.iter().map(|(weight, _)| weight).sum();
        let index = if total > 0.0 && total.is_finite() {
            let roll = rng.gen::<f64>() * total;
            let mut acc = 0.0;
            let mut chosen = remaining.len() - 1;
            for (i, (weight, _)) in remaining.iter().enumerate() {
                acc += weight;
                if roll < acc {
                    chosen = i;
                    break;
                }
            }
            chosen
        } else {
            rng.gen_range(0..remaining.len())
        };

        let (_, candidate) = remaining.swap_remove(index);
        winners.push(candidate.id.clone());
    }

    winners
}
