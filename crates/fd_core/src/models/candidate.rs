use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable caller-assigned identity of a roster member.
pub type CandidateId = String;

/// One participant on a roster.
///
/// # Boundary Contract
/// - Rosters are supplied whole on every engine call.
/// - The engine never mutates a candidate: it returns decisions, and the
///   caller applies side effects (`pick_count` bumps, `last_picked_at`)
///   after persisting a result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    pub id: CandidateId,

    /// User-assigned base weight (>= 1).
    #[serde(default = "default_display_weight")]
    pub display_weight: u32,

    /// Lifetime times this candidate was selected.
    #[serde(default)]
    pub pick_count: u32,

    #[serde(default)]
    pub score: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_picked_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub status: CandidateStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

fn default_display_weight() -> u32 {
    1
}

impl Candidate {
    pub fn new(id: impl Into<CandidateId>) -> Self {
        Self {
            id: id.into(),
            display_weight: 1,
            pick_count: 0,
            score: 0,
            last_picked_at: None,
            status: CandidateStatus::Active,
            gender: None,
        }
    }

    /// Only active candidates ever enter a draw or grouping pool.
    pub fn is_active(&self) -> bool {
        self.status == CandidateStatus::Active
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    #[default]
    Active,
    Absent,
    Excluded,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_fills_defaults() {
        let c: Candidate = serde_json::from_str(r#"{"id": "s01"}"#).unwrap();
        assert_eq!(c.display_weight, 1);
        assert_eq!(c.pick_count, 0);
        assert_eq!(c.status, CandidateStatus::Active);
        assert!(c.gender.is_none());
        assert!(c.is_active());
    }

    #[test]
    fn status_uses_snake_case_wire_form() {
        let c: Candidate =
            serde_json::from_str(r#"{"id": "s02", "status": "absent", "gender": "female"}"#)
                .unwrap();
        assert_eq!(c.status, CandidateStatus::Absent);
        assert_eq!(c.gender, Some(Gender::Female));
        assert!(!c.is_active());
    }
}
