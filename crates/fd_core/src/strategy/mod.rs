pub mod descriptor;
pub mod expr;
pub mod registry;

pub use descriptor::{BuiltinPreset, StrategyDescriptor, WeightTransform};
pub use expr::{CandidateField, WeightExpr};
pub use registry::{
    LoadReport, PluginConfig, PluginLoadDetail, PluginStatus, StrategyInfo, StrategyRegistry,
};
