use std::collections::{BTreeMap, BTreeSet};

use crate::models::{Candidate, CandidateId, ExclusionReason, Gender};

/// Reduces a roster to the candidates a draw or grouping may use, recording
/// one exclusion reason per dropped candidate.
///
/// Reasons are checked in a fixed priority order (inactive status, then
/// manual exclusion, then gender scope), so a manually excluded candidate
/// reports that reason even when it would also fail the gender filter.
/// Candidates without a recorded gender fall outside any gender scope.
pub fn filter<'a>(
    roster: &'a [Candidate],
    gender_scope: Option<Gender>,
    manual_excluded: &BTreeSet<CandidateId>,
) -> (Vec<&'a Candidate>, BTreeMap<CandidateId, ExclusionReason>) {
    let mut pool = Vec::with_capacity(roster.len());
    let mut stubs = BTreeMap::new();

    for candidate in roster {
        if !candidate.is_active() {
            stubs.insert(candidate.id.clone(), ExclusionReason::StatusInactive);
            continue;
        }
        if manual_excluded.contains(&candidate.id) {
            stubs.insert(candidate.id.clone(), ExclusionReason::ManuallyExcluded);
            continue;
        }
        if let Some(scope) = gender_scope {
            if candidate.gender != Some(scope) {
                stubs.insert(candidate.id.clone(), ExclusionReason::GenderScopeMismatch);
                continue;
            }
        }
        pool.push(candidate);
    }

    (pool, stubs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CandidateStatus;

    fn roster() -> Vec<Candidate> {
        let mut absent = Candidate::new("s01");
        absent.status = CandidateStatus::Absent;
        absent.gender = Some(Gender::Male);

        let mut boy = Candidate::new("s02");
        boy.gender = Some(Gender::Male);

        let mut girl = Candidate::new("s03");
        girl.gender = Some(Gender::Female);

        let unspecified = Candidate::new("s04");

        vec![absent, boy, girl, unspecified]
    }

    #[test]
    fn inactive_candidates_never_enter_the_pool() {
        let roster = roster();
        let (pool, stubs) = filter(&roster, None, &BTreeSet::new());
        assert_eq!(pool.len(), 3);
        assert_eq!(stubs.get("s01"), Some(&ExclusionReason::StatusInactive));
    }

    #[test]
    fn gender_scope_drops_mismatches_and_unspecified() {
        let roster = roster();
        let (pool, stubs) = filter(&roster, Some(Gender::Female), &BTreeSet::new());
        let ids: Vec<&str> = pool.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["s03"]);
        assert_eq!(stubs.get("s02"), Some(&ExclusionReason::GenderScopeMismatch));
        assert_eq!(stubs.get("s04"), Some(&ExclusionReason::GenderScopeMismatch));
    }

    #[test]
    fn manual_exclusion_outranks_gender_scope() {
        let roster = roster();
        let manual: BTreeSet<CandidateId> = ["s02".to_string()].into();
        let (pool, stubs) = filter(&roster, Some(Gender::Female), &manual);
        // s02 would also fail the female scope, but the manual reason wins.
        assert_eq!(stubs.get("s02"), Some(&ExclusionReason::ManuallyExcluded));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn status_outranks_manual_exclusion() {
        let roster = roster();
        let manual: BTreeSet<CandidateId> = ["s01".to_string()].into();
        let (_, stubs) = filter(&roster, None, &manual);
        assert_eq!(stubs.get("s01"), Some(&ExclusionReason::StatusInactive));
    }
}
