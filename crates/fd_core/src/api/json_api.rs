//! String-in/string-out JSON boundary for desktop-shell hosts.
//!
//! Every request carries a `schema_version` and an explicit RNG `seed`, so
//! the same request reproduces the same draw; the host replays seeds when
//! re-rendering reveal animations or audits.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

use crate::contract::{error_codes, is_supported_schema_version};
use crate::engine::{DrawEngine, GroupRequest, PickRequest};
use crate::strategy::PluginConfig;

fn err_code(code: &str, message: impl std::fmt::Display) -> String {
    format!("{code}: {message}")
}

#[derive(Debug, Deserialize)]
struct PickRequestEnvelope {
    pub schema_version: u8,
    pub seed: u64,
    #[serde(flatten)]
    pub request: PickRequest,
}

#[derive(Debug, Deserialize)]
struct GroupRequestEnvelope {
    pub schema_version: u8,
    pub seed: u64,
    #[serde(flatten)]
    pub request: GroupRequest,
}

/// Runs a pick draw from a JSON request, returning the serialized
/// `PickResult`.
pub fn pick_json(engine: &DrawEngine, request_json: &str) -> Result<String, String> {
    let envelope: PickRequestEnvelope = serde_json::from_str(request_json)
        .map_err(|e| err_code(error_codes::INVALID_JSON, e))?;
    check_schema_version(envelope.schema_version)?;

    let mut rng = ChaCha8Rng::seed_from_u64(envelope.seed);
    let result = engine
        .pick(&envelope.request, &mut rng)
        .map_err(|e| err_code(error_codes::INVALID_REQUEST, e))?;

    serde_json::to_string(&result).map_err(|e| err_code(error_codes::SERIALIZATION_FAILED, e))
}

/// Runs a group partition from a JSON request, returning the serialized
/// `GroupResult`.
pub fn group_json(engine: &DrawEngine, request_json: &str) -> Result<String, String> {
    let envelope: GroupRequestEnvelope = serde_json::from_str(request_json)
        .map_err(|e| err_code(error_codes::INVALID_JSON, e))?;
    check_schema_version(envelope.schema_version)?;

    let mut rng = ChaCha8Rng::seed_from_u64(envelope.seed);
    let result = engine
        .group(&envelope.request, &mut rng)
        .map_err(|e| err_code(error_codes::INVALID_REQUEST, e))?;

    serde_json::to_string(&result).map_err(|e| err_code(error_codes::SERIALIZATION_FAILED, e))
}

/// Registers a batch of plugin configs, returning the serialized
/// `LoadReport`. A malformed item is reported inside the report; only
/// unparseable JSON fails the call.
pub fn register_plugins_json(engine: &DrawEngine, configs_json: &str) -> Result<String, String> {
    let configs: Vec<PluginConfig> = serde_json::from_str(configs_json)
        .map_err(|e| err_code(error_codes::INVALID_JSON, e))?;

    let report = engine.registry().register(configs);
    serde_json::to_string(&report).map_err(|e| err_code(error_codes::SERIALIZATION_FAILED, e))
}

/// Lists all resolvable strategies as serialized `StrategyInfo` entries.
pub fn list_strategies_json(engine: &DrawEngine) -> Result<String, String> {
    serde_json::to_string(&engine.registry().list())
        .map_err(|e| err_code(error_codes::SERIALIZATION_FAILED, e))
}

fn check_schema_version(version: u8) -> Result<(), String> {
    if !is_supported_schema_version(version) {
        return Err(err_code(
            error_codes::UNSUPPORTED_SCHEMA_VERSION,
            format!("unsupported schema version: {}", version),
        ));
    }
    Ok(())
}
