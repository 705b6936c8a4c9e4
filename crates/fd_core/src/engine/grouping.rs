use fxhash::FxHashSet;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{Candidate, CandidateId, FairnessPolicy, GroupStrategy, HistoryIndex};

pub struct PartitionOutcome {
    pub groups: Vec<Vec<CandidateId>>,
    /// Recently-paired couples still sharing a group after swapping.
    pub unresolved_pairs: u32,
}

/// Splits the pool into `group_count` groups whose sizes differ by at most
/// one, then applies best-effort pair-avoidance.
///
/// `random` shuffles the pool and deals round-robin; `balanced-score` sorts
/// by score and snake-drafts so strong and weak candidates interleave
/// evenly. Pair-avoidance swaps members between groups while sizes stay
/// fixed; it can reduce conflicts but never fail the call.
pub fn partition(
    pool: &[&Candidate],
    group_count: usize,
    policy: &FairnessPolicy,
    index: &HistoryIndex<'_>,
    rng: &mut impl Rng,
) -> PartitionOutcome {
    if pool.is_empty() {
        return PartitionOutcome { groups: Vec::new(), unresolved_pairs: 0 };
    }

    let mut groups = match policy.group_strategy {
        GroupStrategy::Random => deal_random(pool, group_count, rng),
        GroupStrategy::BalancedScore => snake_draft(pool, group_count),
    };

    let mut unresolved_pairs = 0;
    if policy.pair_avoid_rounds > 0 {
        let pairs = recent_pairs(index, policy.pair_avoid_rounds as usize);
        if !pairs.is_empty() {
            unresolved_pairs = resolve_pairs(&mut groups, &pairs);
            if unresolved_pairs > 0 {
                log::debug!(
                    "pair-avoidance left {} conflict(s) unresolved (auto_relax: {})",
                    unresolved_pairs,
                    policy.auto_relax_on_conflict
                );
            }
        }
    }

    PartitionOutcome { groups, unresolved_pairs }
}

/// Uniform Fisher–Yates shuffle, then round-robin deal.
fn deal_random(
    pool: &[&Candidate],
    group_count: usize,
    rng: &mut impl Rng,
) -> Vec<Vec<CandidateId>> {
    let mut order: Vec<&Candidate> = pool.to_vec();
    order.shuffle(rng);

    let mut groups = vec![Vec::new(); group_count];
    for (i, candidate) in order.iter().enumerate() {
        groups[i % group_count].push(candidate.id.clone());
    }
    groups
}

/// Sort descending by score, then deal in alternating direction so each
/// group receives one strong and one weak candidate per pair of rounds,
/// approximately equalizing per-group average score.
fn snake_draft(pool: &[&Candidate], group_count: usize) -> Vec<Vec<CandidateId>> {
    let mut order: Vec<&Candidate> = pool.to_vec();
    order.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.id.cmp(&b.id)));

    let mut groups = vec![Vec::new(); group_count];
    for (i, candidate) in order.iter().enumerate() {
        let round = i / group_count;
        let position = i % group_count;
        let bucket =
            if round % 2 == 0 { position } else { group_count - 1 - position };
        groups[bucket].push(candidate.id.clone());
    }
    groups
}

/// Unordered id pairs that shared a group in the most recent `rounds`
/// group events.
fn recent_pairs(index: &HistoryIndex<'_>, rounds: usize) -> FxHashSet<(String, String)> {
    let mut pairs = FxHashSet::default();
    for event in index.recent_groups(rounds) {
        for group in &event.groups {
            for (i, a) in group.iter().enumerate() {
                for b in &group[i + 1..] {
                    pairs.insert(pair_key(a, b));
                }
            }
        }
    }
    pairs
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

fn group_conflicts(group: &[CandidateId], pairs: &FxHashSet<(String, String)>) -> u32 {
    let mut conflicts = 0;
    for (i, a) in group.iter().enumerate() {
        for b in &group[i + 1..] {
            if pairs.contains(&pair_key(a, b)) {
                conflicts += 1;
            }
        }
    }
    conflicts
}

fn member_conflicted(
    group: &[CandidateId],
    member: usize,
    pairs: &FxHashSet<(String, String)>,
) -> bool {
    group
        .iter()
        .enumerate()
        .any(|(i, other)| i != member && pairs.contains(&pair_key(&group[member], other)))
}

/// Greedy size-preserving swap search: for every conflicted member, try
/// swapping it into each other group and keep the first swap that strictly
/// reduces total conflicts. Sweeps repeat until one makes no progress.
/// Returns the number of conflicted pairs left.
fn resolve_pairs(
    groups: &mut [Vec<CandidateId>],
    pairs: &FxHashSet<(String, String)>,
) -> u32 {
    let mut total: u32 = groups.iter().map(|group| group_conflicts(group, pairs)).sum();

    while total > 0 {
        let mut improved = false;

        'sweep: for gi in 0..groups.len() {
            for mi in 0..groups[gi].len() {
                if !member_conflicted(&groups[gi], mi, pairs) {
                    continue;
                }
                for gj in 0..groups.len() {
                    if gj == gi {
                        continue;
                    }
                    for mj in 0..groups[gj].len() {
                        let before =
                            group_conflicts(&groups[gi], pairs) + group_conflicts(&groups[gj], pairs);

                        let a = groups[gi][mi].clone();
                        let b = groups[gj][mj].clone();
                        groups[gi][mi] = b.clone();
                        groups[gj][mj] = a.clone();

                        let after =
                            group_conflicts(&groups[gi], pairs) + group_conflicts(&groups[gj], pairs);

                        if after < before {
                            total = total - before + after;
                            improved = true;
                            if total == 0 {
                                return 0;
                            }
                            continue 'sweep;
                        }

                        // Revert: the swap did not help.
                        groups[gi][mi] = a;
                        groups[gj][mj] = b;
                    }
                }
            }
        }

        if !improved {
            break;
        }
    }

    total
}
