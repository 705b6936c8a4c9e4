//! # fd_core - Deterministic Fairness-Aware Selection Engine
//!
//! This library decides, for a roster of participants, who is drawn in a
//! single- or multi-pick event and how a roster is partitioned into
//! balanced groups, with per-candidate traces explaining every exclusion.
//!
//! ## Features
//! - 100% deterministic draws (same seed + same request = same result)
//! - Pluggable weight strategies: built-in presets plus validated
//!   declarative plugin expressions
//! - Cooldown windows and full-cycle "everyone goes once" rotation
//! - Balanced grouping with pair-avoidance across recent group events
//! - JSON API for easy integration with desktop shells
//!
//! The engine is a leaf library: callers supply the full roster and history
//! on every call and persist results themselves. Degraded fairness is
//! always preferred over a blocked draw: bad configuration produces a
//! usable (possibly empty) result, never an error.

pub mod api;
pub mod contract;
pub mod engine;
pub mod error;
pub mod models;
pub mod strategy;

// Re-export main API functions
pub use api::{group_json, list_strategies_json, pick_json, register_plugins_json};
pub use engine::{DrawEngine, GroupRequest, PickRequest};
pub use error::{EngineError, Result};
pub use models::{
    Candidate, CandidateId, CandidateStatus, EventKind, ExclusionReason, FairnessPolicy, Gender,
    GroupResult, GroupStrategy, HistoryEvent, PickResult, ResultMeta, Trace,
};
pub use strategy::{
    BuiltinPreset, CandidateField, LoadReport, PluginConfig, StrategyDescriptor, StrategyInfo,
    StrategyRegistry, WeightExpr,
};

/// Stamped into every result's meta block for audit.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
