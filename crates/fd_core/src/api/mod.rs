pub mod json_api;

pub use json_api::{group_json, list_strategies_json, pick_json, register_plugins_json};
