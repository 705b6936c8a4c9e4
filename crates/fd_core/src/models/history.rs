use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::candidate::CandidateId;
use super::policy::FairnessPolicy;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Pick,
    Group,
}

/// An immutable past draw or grouping, supplied as read-only evidence for
/// cooldown and pair-avoidance decisions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEvent {
    pub timestamp: DateTime<Utc>,
    pub class_id: String,
    pub kind: EventKind,

    /// Ordered winners, for `pick` events.
    #[serde(default)]
    pub picked_ids: Vec<CandidateId>,

    /// Group membership, for `group` events.
    #[serde(default)]
    pub groups: Vec<Vec<CandidateId>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_snapshot: Option<FairnessPolicy>,
}

impl HistoryEvent {
    pub fn pick(timestamp: DateTime<Utc>, class_id: impl Into<String>, picked_ids: Vec<CandidateId>) -> Self {
        Self {
            timestamp,
            class_id: class_id.into(),
            kind: EventKind::Pick,
            picked_ids,
            groups: Vec::new(),
            policy_snapshot: None,
        }
    }

    pub fn group(timestamp: DateTime<Utc>, class_id: impl Into<String>, groups: Vec<Vec<CandidateId>>) -> Self {
        Self {
            timestamp,
            class_id: class_id.into(),
            kind: EventKind::Group,
            picked_ids: Vec::new(),
            groups,
            policy_snapshot: None,
        }
    }
}

/// Per-call view over the history of one class, split by event kind and
/// stored newest first.
///
/// The caller's history list is an append-only log: supplied order is
/// chronological, newest last. Built once per engine call so cooldown and
/// pair-avoidance never rescan the full history.
pub struct HistoryIndex<'a> {
    picks: Vec<&'a HistoryEvent>,
    groups: Vec<&'a HistoryEvent>,
}

impl<'a> HistoryIndex<'a> {
    pub fn build(history: &'a [HistoryEvent], class_id: &str) -> Self {
        let mut picks = Vec::new();
        let mut groups = Vec::new();
        for event in history.iter().rev() {
            if event.class_id != class_id {
                continue;
            }
            match event.kind {
                EventKind::Pick => picks.push(event),
                EventKind::Group => groups.push(event),
            }
        }
        Self { picks, groups }
    }

    /// All pick events for the class, newest first.
    pub fn picks_newest_first(&self) -> &[&'a HistoryEvent] {
        &self.picks
    }

    /// The most recent `rounds` pick events for the class.
    pub fn recent_picks(&self, rounds: usize) -> &[&'a HistoryEvent] {
        &self.picks[..rounds.min(self.picks.len())]
    }

    /// The most recent `rounds` group events for the class.
    pub fn recent_groups(&self, rounds: usize) -> &[&'a HistoryEvent] {
        &self.groups[..rounds.min(self.groups.len())]
    }
}
