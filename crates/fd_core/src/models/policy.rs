use serde::{Deserialize, Serialize};

use crate::strategy::BuiltinPreset;

/// Fairness configuration in effect for one engine call. Immutable per call;
/// results carry a snapshot of it for audit.
///
/// `cooldown_rounds` and `pair_avoid_rounds` count most-recent matching
/// history events, never wall-clock time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FairnessPolicy {
    /// When false every candidate draws with uniform weight 1, regardless
    /// of the configured strategy preset.
    #[serde(default = "default_true")]
    pub weighted_random: bool,

    /// Master switch for the cooldown window.
    #[serde(default = "default_true")]
    pub prevent_repeat: bool,

    /// Number of recent pick events whose winners are barred from
    /// re-selection. 0 means "exclude until every active candidate has been
    /// drawn once in the current cycle".
    #[serde(default)]
    pub cooldown_rounds: u32,

    /// Strategy preset id; unknown ids degrade to `classic` at resolve time.
    #[serde(default = "default_strategy_preset")]
    pub strategy_preset: String,

    #[serde(default)]
    pub group_strategy: GroupStrategy,

    /// Number of recent group events whose co-membership pairs should be
    /// kept apart in the next partition.
    #[serde(default)]
    pub pair_avoid_rounds: u32,

    /// Accept a best-effort partition when pair-avoidance conflicts cannot
    /// all be resolved by swapping.
    #[serde(default = "default_true")]
    pub auto_relax_on_conflict: bool,
}

fn default_true() -> bool {
    true
}

fn default_strategy_preset() -> String {
    BuiltinPreset::Classic.id().to_string()
}

impl Default for FairnessPolicy {
    fn default() -> Self {
        Self {
            weighted_random: true,
            prevent_repeat: true,
            cooldown_rounds: 0,
            strategy_preset: default_strategy_preset(),
            group_strategy: GroupStrategy::default(),
            pair_avoid_rounds: 0,
            auto_relax_on_conflict: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum GroupStrategy {
    #[default]
    Random,
    BalancedScore,
}
