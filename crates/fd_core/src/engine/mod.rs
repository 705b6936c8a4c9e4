//! Draw orchestration: eligibility filtering, cooldown, strategy
//! resolution, sampling/partitioning, and result assembly.

pub mod cooldown;
pub mod eligibility;
pub mod grouping;
pub mod sampler;


use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use fxhash::FxHashSet;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::models::{
    Candidate, CandidateId, ExclusionReason, FairnessPolicy, Gender, GroupResult, HistoryEvent,
    HistoryIndex, PickResult, ResultMeta, Trace,
};
use crate::strategy::StrategyRegistry;
use crate::ENGINE_VERSION;

/// A single- or multi-pick draw request.
///
/// Rosters and history travel by value on every call: the engine holds no
/// state between calls apart from the strategy registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PickRequest {
    pub class_id: String,
    pub roster: Vec<Candidate>,
    #[serde(default)]
    pub history: Vec<HistoryEvent>,
    #[serde(default)]
    pub policy: FairnessPolicy,
    pub requested_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender_scope: Option<Gender>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub manual_excluded_ids: BTreeSet<CandidateId>,
}

/// A group partition request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupRequest {
    pub class_id: String,
    pub roster: Vec<Candidate>,
    #[serde(default)]
    pub history: Vec<HistoryEvent>,
    #[serde(default)]
    pub policy: FairnessPolicy,
    pub group_count: u32,
}

/// The engine facade. Owns the strategy registry, its only cross-call
/// state, and is otherwise a pure function of each request.
#[derive(Debug, Default)]
pub struct DrawEngine {
    registry: StrategyRegistry,
}

impl DrawEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: StrategyRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    /// Runs a pick draw: filter, cooldown, resolve the strategy, sample,
    /// and assemble the traced result.
    pub fn pick(&self, request: &PickRequest, rng: &mut impl Rng) -> Result<PickResult> {
        if request.requested_count < 1 {
            return Err(EngineError::InvalidRequestedCount(request.requested_count));
        }
        validate_unique_ids(&request.roster)?;

        let (pool, stubs) = eligibility::filter(
            &request.roster,
            request.gender_scope,
            &request.manual_excluded_ids,
        );

        let index = HistoryIndex::build(&request.history, &request.class_id);
        let cooldown = cooldown::apply(pool, &index, &request.policy);

        let strategy = self.registry.resolve(&request.policy.strategy_preset);

        let winners = sampler::draw(
            &cooldown.pool,
            &strategy,
            request.policy.weighted_random,
            request.requested_count as usize,
            rng,
        );

        // Merge traces: eligibility stubs, cooldown exclusions, and the
        // weights the surviving pool entered the draw with.
        let mut traces: BTreeMap<CandidateId, Trace> = stubs
            .into_iter()
            .map(|(id, reason)| (id, Trace::excluded(reason)))
            .collect();
        if !cooldown.relaxed {
            for id in &cooldown.excluded_ids {
                traces.insert(id.clone(), Trace::excluded(ExclusionReason::CoolingDown));
            }
        }
        for candidate in &cooldown.pool {
            let weight =
                sampler::weight_of(candidate, &strategy, request.policy.weighted_random);
            traces.insert(candidate.id.clone(), Trace::eligible(weight));
        }

        let actual_count = winners.len() as u32;
        Ok(PickResult {
            winners,
            traces,
            cooldown_excluded_ids: cooldown.excluded_ids,
            meta: ResultMeta {
                engine_version: ENGINE_VERSION.to_string(),
                policy_snapshot: request.policy.clone(),
                requested_count: request.requested_count,
                actual_count,
                generated_at: Utc::now(),
            },
        })
    }

    /// Partitions the active roster into `group_count` groups.
    ///
    /// Grouping reuses the eligibility filter on status only (group
    /// requests carry no gender scope or manual exclusions) and skips the
    /// cooldown window: cooldown bars re-selection, while a partition must
    /// cover every eligible candidate exactly once.
    pub fn group(&self, request: &GroupRequest, rng: &mut impl Rng) -> Result<GroupResult> {
        if request.group_count < 2 {
            return Err(EngineError::InvalidGroupCount(request.group_count));
        }
        validate_unique_ids(&request.roster)?;

        let (pool, _) = eligibility::filter(&request.roster, None, &BTreeSet::new());
        let index = HistoryIndex::build(&request.history, &request.class_id);

        let outcome = grouping::partition(
            &pool,
            request.group_count as usize,
            &request.policy,
            &index,
            rng,
        );

        let actual_count = outcome.groups.len() as u32;
        Ok(GroupResult {
            groups: outcome.groups,
            unresolved_pairs: outcome.unresolved_pairs,
            meta: ResultMeta {
                engine_version: ENGINE_VERSION.to_string(),
                policy_snapshot: request.policy.clone(),
                requested_count: request.group_count,
                actual_count,
                generated_at: Utc::now(),
            },
        })
    }
}

fn validate_unique_ids(roster: &[Candidate]) -> Result<()> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for candidate in roster {
        if !seen.insert(candidate.id.as_str()) {
            return Err(EngineError::DuplicateCandidateId(candidate.id.clone()));
        }
    }
    Ok(())
}
