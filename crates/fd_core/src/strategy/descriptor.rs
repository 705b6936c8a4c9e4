use serde::{Deserialize, Serialize};

use super::expr::WeightExpr;
use crate::models::Candidate;

/// The three permanent presets. They can never be unregistered and plugin
/// ids may not collide with them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinPreset {
    /// Pure weighted draw on the user-assigned weight.
    Classic,
    /// Discourages already-frequently-picked candidates.
    Balanced,
    /// Rewards higher-scoring candidates with higher draw probability.
    Momentum,
}

impl BuiltinPreset {
    pub const ALL: [BuiltinPreset; 3] =
        [BuiltinPreset::Classic, BuiltinPreset::Balanced, BuiltinPreset::Momentum];

    pub fn id(self) -> &'static str {
        match self {
            BuiltinPreset::Classic => "classic",
            BuiltinPreset::Balanced => "balanced",
            BuiltinPreset::Momentum => "momentum",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            BuiltinPreset::Classic => "Classic",
            BuiltinPreset::Balanced => "Balanced",
            BuiltinPreset::Momentum => "Momentum",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.id() == id)
    }

    fn weight(self, candidate: &Candidate) -> f64 {
        let base = f64::from(candidate.display_weight);
        match self {
            BuiltinPreset::Classic => base,
            BuiltinPreset::Balanced => base / (1.0 + f64::from(candidate.pick_count)),
            BuiltinPreset::Momentum => {
                base * (1.0 + f64::from(candidate.score.max(0)) / 10.0)
            }
        }
    }
}

/// How a strategy turns a candidate into a sampling weight: a built-in
/// formula, or a validated plugin expression.
#[derive(Debug, Clone, PartialEq)]
pub enum WeightTransform {
    Builtin(BuiltinPreset),
    Expr(WeightExpr),
}

impl WeightTransform {
    pub fn weight(&self, candidate: &Candidate) -> f64 {
        match self {
            WeightTransform::Builtin(preset) => preset.weight(candidate),
            WeightTransform::Expr(expr) => expr.eval(candidate),
        }
    }
}

/// A resolvable strategy: id, display label, and the weight transform the
/// sampler applies.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyDescriptor {
    pub id: String,
    pub name: String,
    pub transform: WeightTransform,
}

impl StrategyDescriptor {
    pub fn builtin(preset: BuiltinPreset) -> Self {
        Self {
            id: preset.id().to_string(),
            name: preset.display_name().to_string(),
            transform: WeightTransform::Builtin(preset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_is_display_weight_unchanged() {
        let mut candidate = Candidate::new("s01");
        candidate.display_weight = 7;
        candidate.pick_count = 99;
        candidate.score = -50;
        let descriptor = StrategyDescriptor::builtin(BuiltinPreset::Classic);
        assert_eq!(descriptor.transform.weight(&candidate), 7.0);
    }

    #[test]
    fn balanced_weight_drops_with_pick_count() {
        let mut fresh = Candidate::new("s01");
        fresh.display_weight = 2;
        let mut picked = fresh.clone();
        picked.id = "s02".to_string();
        picked.pick_count = 3;

        let descriptor = StrategyDescriptor::builtin(BuiltinPreset::Balanced);
        let fresh_weight = descriptor.transform.weight(&fresh);
        let picked_weight = descriptor.transform.weight(&picked);

        assert_eq!(fresh_weight, 2.0);
        assert_eq!(picked_weight, 0.5);
        // Monotonicity: equal display_weight and score, fewer picks wins.
        assert!(fresh_weight > picked_weight);
    }

    #[test]
    fn momentum_ignores_negative_scores() {
        let mut scorer = Candidate::new("s01");
        scorer.display_weight = 2;
        scorer.score = 20;
        let mut laggard = Candidate::new("s02");
        laggard.display_weight = 2;
        laggard.score = -30;

        let descriptor = StrategyDescriptor::builtin(BuiltinPreset::Momentum);
        assert_eq!(descriptor.transform.weight(&scorer), 6.0);
        assert_eq!(descriptor.transform.weight(&laggard), 2.0);
    }

    #[test]
    fn builtin_ids_resolve_back() {
        for preset in BuiltinPreset::ALL {
            assert_eq!(BuiltinPreset::from_id(preset.id()), Some(preset));
        }
        assert_eq!(BuiltinPreset::from_id("no_such"), None);
    }
}
