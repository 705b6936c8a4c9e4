use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::candidate::CandidateId;
use super::policy::FairnessPolicy;

/// Why a candidate was kept out of the pool. First-matching reason wins;
/// the ordering of the checks is part of the engine contract so the
/// explanation UI always shows the dominant cause.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    StatusInactive,
    ManuallyExcluded,
    GenderScopeMismatch,
    CoolingDown,
}

/// Per-candidate audit record: was the candidate drawable, and at what
/// weight; if not, the specific reason.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trace {
    pub eligible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<ExclusionReason>,
    pub weight: f64,
}

impl Trace {
    pub fn eligible(weight: f64) -> Self {
        Self { eligible: true, reason: None, weight }
    }

    pub fn excluded(reason: ExclusionReason) -> Self {
        Self { eligible: false, reason: Some(reason), weight: 0.0 }
    }
}

/// Stamped onto every result for audit and persistence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultMeta {
    pub engine_version: String,
    /// Deep copy of the policy the call ran under.
    pub policy_snapshot: FairnessPolicy,
    pub requested_count: u32,
    pub actual_count: u32,
    pub generated_at: DateTime<Utc>,
}

/// Outcome of a single- or multi-pick draw.
///
/// Ordered maps keep the serialized form deterministic for a given input,
/// which the host relies on when diffing audit records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PickResult {
    /// Draw order, length <= requested count, no duplicates.
    pub winners: Vec<CandidateId>,
    pub traces: BTreeMap<CandidateId, Trace>,
    /// Ids the cooldown window barred. When relaxation re-admitted them the
    /// ids are still listed here, so an id can appear both as a winner and
    /// in this set.
    pub cooldown_excluded_ids: BTreeSet<CandidateId>,
    pub meta: ResultMeta,
}

impl PickResult {
    /// Excluded candidates with their reasons, for "why wasn't X picked"
    /// explanation views.
    pub fn excluded(&self) -> impl Iterator<Item = (&CandidateId, &Trace)> {
        self.traces.iter().filter(|(_, trace)| !trace.eligible)
    }

    /// Human-readable digest of the draw.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "picked {} of {} requested: {}",
            self.meta.actual_count,
            self.meta.requested_count,
            self.winners.join(", ")
        );

        let excluded_count = self.excluded().count();
        if excluded_count > 0 {
            summary.push_str(&format!("\nexcluded: {} candidate(s)", excluded_count));
        }
        if !self.cooldown_excluded_ids.is_empty() {
            let ids: Vec<&str> =
                self.cooldown_excluded_ids.iter().map(String::as_str).collect();
            summary.push_str(&format!("\ncooling down: {}", ids.join(", ")));
        }
        summary
    }
}

/// Outcome of partitioning a roster into groups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupResult {
    /// Every eligible candidate appears in exactly one group; group sizes
    /// differ by at most 1.
    pub groups: Vec<Vec<CandidateId>>,
    /// Recently-paired couples left in the same group after best-effort
    /// swapping. Zero means pair-avoidance fully resolved.
    pub unresolved_pairs: u32,
    pub meta: ResultMeta,
}

impl GroupResult {
    pub fn group_sizes(&self) -> Vec<usize> {
        self.groups.iter().map(Vec::len).collect()
    }

    pub fn summary(&self) -> String {
        let sizes: Vec<String> =
            self.group_sizes().iter().map(|s| s.to_string()).collect();
        let mut summary =
            format!("{} groups (sizes {})", self.groups.len(), sizes.join("/"));
        if self.unresolved_pairs > 0 {
            summary.push_str(&format!(
                "\nunresolved recent pairs: {}",
                self.unresolved_pairs
            ));
        }
        summary
    }
}
