use std::collections::BTreeMap;
use std::sync::RwLock;

use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::descriptor::{BuiltinPreset, StrategyDescriptor, WeightTransform};
use super::expr::WeightExpr;

/// A plugin-supplied strategy definition, already parsed by the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PluginConfig {
    pub id: String,
    pub name: String,
    pub weight_expression: WeightExpr,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PluginStatus {
    Loaded,
    Skipped,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PluginLoadDetail {
    pub id: String,
    pub status: PluginStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Per-batch load outcome. Partial success is the normal case: one bad
/// descriptor never aborts the rest of the batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoadReport {
    pub loaded: u32,
    pub skipped: u32,
    pub errors: Vec<String>,
    pub details: Vec<PluginLoadDetail>,
}

impl LoadReport {
    fn loaded(&mut self, id: &str) {
        self.loaded += 1;
        self.details.push(PluginLoadDetail {
            id: id.to_string(),
            status: PluginStatus::Loaded,
            reason: None,
        });
    }

    fn skipped(&mut self, id: &str, reason: impl Into<String>) {
        self.skipped += 1;
        self.details.push(PluginLoadDetail {
            id: id.to_string(),
            status: PluginStatus::Skipped,
            reason: Some(reason.into()),
        });
    }

    fn error(&mut self, id: &str, reason: impl Into<String>) {
        let reason = reason.into();
        self.errors.push(format!("{}: {}", id, reason));
        self.details.push(PluginLoadDetail {
            id: id.to_string(),
            status: PluginStatus::Error,
            reason: Some(reason),
        });
    }
}

/// Listing entry for configuration UIs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrategyInfo {
    pub id: String,
    pub name: String,
}

/// Holds the three permanent built-in presets plus the currently loaded
/// plugin descriptors.
///
/// Plugin state is the engine's only cross-call mutable state. `register`
/// and `reset` take the write lock; `resolve` and `list` only read, so
/// lookups from concurrent draws never block each other.
///
/// Re-registering an id from an earlier batch replaces the old descriptor:
/// plugin sets are replaced wholesale on reload (`reset` + `register`).
#[derive(Debug, Default)]
pub struct StrategyRegistry {
    plugins: RwLock<BTreeMap<String, StrategyDescriptor>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and loads a batch of plugin configs, reporting per-item
    /// status.
    pub fn register(&self, configs: Vec<PluginConfig>) -> LoadReport {
        let mut report = LoadReport::default();
        let mut batch_ids: FxHashSet<String> = FxHashSet::default();
        let mut plugins = self.plugins.write().expect("strategy registry lock poisoned");

        for config in configs {
            if config.id.trim().is_empty() {
                report.error("<empty>", "plugin id must be non-empty");
                continue;
            }
            if BuiltinPreset::from_id(&config.id).is_some() {
                report.skipped(&config.id, "collides with a built-in preset");
                continue;
            }
            if !batch_ids.insert(config.id.clone()) {
                report.skipped(&config.id, "duplicate id within batch");
                continue;
            }
            if let Err(reason) = config.weight_expression.validate() {
                report.error(&config.id, reason);
                continue;
            }

            log::debug!("loaded strategy plugin '{}'", config.id);
            report.loaded(&config.id);
            plugins.insert(
                config.id.clone(),
                StrategyDescriptor {
                    id: config.id,
                    name: config.name,
                    transform: WeightTransform::Expr(config.weight_expression),
                },
            );
        }

        report
    }

    /// Clears all plugin descriptors. Built-ins are unaffected.
    pub fn reset(&self) {
        self.plugins.write().expect("strategy registry lock poisoned").clear();
    }

    /// Resolves a strategy id, degrading to `classic` for unknown ids. A
    /// missing strategy must never block a draw.
    pub fn resolve(&self, id: &str) -> StrategyDescriptor {
        if let Some(preset) = BuiltinPreset::from_id(id) {
            return StrategyDescriptor::builtin(preset);
        }
        let plugins = self.plugins.read().expect("strategy registry lock poisoned");
        if let Some(descriptor) = plugins.get(id) {
            return descriptor.clone();
        }
        log::trace!("unknown strategy preset '{}', falling back to classic", id);
        StrategyDescriptor::builtin(BuiltinPreset::Classic)
    }

    /// All resolvable strategies, built-ins first, plugins in id order.
    pub fn list(&self) -> Vec<StrategyInfo> {
        let plugins = self.plugins.read().expect("strategy registry lock poisoned");
        let mut entries: Vec<StrategyInfo> = BuiltinPreset::ALL
            .into_iter()
            .map(|preset| StrategyInfo {
                id: preset.id().to_string(),
                name: preset.display_name().to_string(),
            })
            .collect();
        entries.extend(plugins.values().map(|descriptor| StrategyInfo {
            id: descriptor.id.clone(),
            name: descriptor.name.clone(),
        }));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::expr::CandidateField;

    fn weight_expr() -> WeightExpr {
        WeightExpr::Field { field: CandidateField::DisplayWeight }
    }

    fn config(id: &str) -> PluginConfig {
        PluginConfig {
            id: id.to_string(),
            name: format!("Plugin {}", id),
            weight_expression: weight_expr(),
        }
    }

    #[test]
    fn register_reports_per_item_status() {
        let registry = StrategyRegistry::new();
        let report = registry.register(vec![
            config("fair_boost"),
            config("fair_boost"), // duplicate within batch
        ]);

        assert_eq!(report.loaded, 1);
        assert_eq!(report.skipped, 1);
        assert!(report.errors.is_empty());
        assert_eq!(report.details.len(), 2);
        assert_eq!(report.details[0].status, PluginStatus::Loaded);
        assert_eq!(report.details[1].status, PluginStatus::Skipped);

        let listed = registry.list();
        assert_eq!(listed.len(), 4);
        assert!(listed.iter().any(|info| info.id == "fair_boost"));
    }

    #[test]
    fn register_skips_builtin_collisions() {
        let registry = StrategyRegistry::new();
        let report = registry.register(vec![config("classic")]);
        assert_eq!(report.loaded, 0);
        assert_eq!(report.skipped, 1);
        assert_eq!(registry.list().len(), 3);
    }

    #[test]
    fn register_rejects_invalid_expressions_without_aborting_batch() {
        let registry = StrategyRegistry::new();
        let bad = PluginConfig {
            id: "raw_score".to_string(),
            name: "Raw Score".to_string(),
            // Goes negative for low scorers, so validation must reject it.
            weight_expression: WeightExpr::Field { field: CandidateField::Score },
        };
        let report = registry.register(vec![bad, config("fair_boost")]);

        assert_eq!(report.loaded, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("raw_score:"));
        assert_eq!(registry.list().len(), 4);
    }

    #[test]
    fn register_rejects_empty_ids() {
        let registry = StrategyRegistry::new();
        let report = registry.register(vec![config("  ")]);
        assert_eq!(report.loaded, 0);
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn reset_then_empty_register_leaves_builtins_only() {
        let registry = StrategyRegistry::new();
        registry.register(vec![config("fair_boost")]);
        registry.reset();
        let report = registry.register(Vec::new());

        assert_eq!(report.loaded, 0);
        let listed = registry.list();
        let ids: Vec<&str> = listed.iter().map(|info| info.id.as_str()).collect();
        assert_eq!(ids, vec!["classic", "balanced", "momentum"]);
    }

    #[test]
    fn resolve_degrades_to_classic() {
        let registry = StrategyRegistry::new();
        let descriptor = registry.resolve("no_such_preset");
        assert_eq!(descriptor.id, "classic");

        registry.register(vec![config("fair_boost")]);
        assert_eq!(registry.resolve("fair_boost").id, "fair_boost");
        registry.reset();
        assert_eq!(registry.resolve("fair_boost").id, "classic");
    }
}
