use std::collections::BTreeSet;

use fxhash::FxHashSet;

use crate::models::{Candidate, CandidateId, FairnessPolicy, HistoryIndex};

/// Cooldown decision for one draw.
pub struct CooldownOutcome<'a> {
    pub pool: Vec<&'a Candidate>,
    /// Ids the window barred, restricted to candidates that were actually
    /// in the pool. Reported even when relaxation re-admitted them.
    pub excluded_ids: BTreeSet<CandidateId>,
    /// True when exclusion would have emptied the pool and was discarded
    /// for this call.
    pub relaxed: bool,
}

/// Derives the set of candidates temporarily barred from re-selection and
/// removes them from the pool.
///
/// With `cooldown_rounds > 0` the window is the union of winners over that
/// many most-recent pick events for the class. With `cooldown_rounds == 0`
/// selection is cyclic: nobody repeats until every currently eligible
/// candidate has been drawn once.
///
/// If exclusion would empty the pool entirely, the window is discarded for
/// this call so a draw stays possible; the barred ids are still reported.
pub fn apply<'a>(
    pool: Vec<&'a Candidate>,
    index: &HistoryIndex<'_>,
    policy: &FairnessPolicy,
) -> CooldownOutcome<'a> {
    if !policy.prevent_repeat || pool.is_empty() {
        return CooldownOutcome { pool, excluded_ids: BTreeSet::new(), relaxed: false };
    }

    let barred = if policy.cooldown_rounds > 0 {
        window_exclusion(index, policy.cooldown_rounds as usize)
    } else {
        cycle_exclusion(&pool, index)
    };

    let excluded_ids: BTreeSet<CandidateId> = pool
        .iter()
        .filter(|candidate| barred.contains(candidate.id.as_str()))
        .map(|candidate| candidate.id.clone())
        .collect();

    let retained: Vec<&Candidate> =
        pool.iter().copied().filter(|candidate| !barred.contains(candidate.id.as_str())).collect();

    if retained.is_empty() && !excluded_ids.is_empty() {
        log::debug!(
            "cooldown would empty the pool, relaxing for this draw ({} barred)",
            excluded_ids.len()
        );
        return CooldownOutcome { pool, excluded_ids, relaxed: true };
    }

    CooldownOutcome { pool: retained, excluded_ids, relaxed: false }
}

/// Union of winners over the most recent `rounds` pick events.
fn window_exclusion<'h>(index: &HistoryIndex<'h>, rounds: usize) -> FxHashSet<&'h str> {
    let mut barred = FxHashSet::default();
    for event in index.recent_picks(rounds) {
        barred.extend(event.picked_ids.iter().map(String::as_str));
    }
    barred
}

/// Cyclic exclusion: scan pick events newest-first accumulating distinct
/// winners. Accumulating every id of the current pool means the cycle is
/// complete and a fresh one starts (nobody barred). A repeated id marks the
/// boundary of the previous cycle; everything accumulated up to it is still
/// "this cycle" and stays barred. Exhausting history with the cycle open
/// bars the accumulated set as well.
///
/// Ids no longer in the pool neither hold a cycle open nor complete it:
/// coverage is counted against pool membership only.
fn cycle_exclusion<'h>(pool: &[&Candidate], index: &HistoryIndex<'h>) -> FxHashSet<&'h str> {
    let pool_ids: FxHashSet<&str> =
        pool.iter().map(|candidate| candidate.id.as_str()).collect();

    let mut seen: FxHashSet<&'h str> = FxHashSet::default();
    let mut covered = 0usize;

    for event in index.picks_newest_first() {
        for id in &event.picked_ids {
            if !seen.insert(id.as_str()) {
                return seen;
            }
            if pool_ids.contains(id.as_str()) {
                covered += 1;
                if covered == pool_ids.len() {
                    return FxHashSet::default();
                }
            }
        }
    }

    seen
}
