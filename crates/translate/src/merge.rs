//! Final request body construction.
//!
//! Two families of endpoint: JSON-RPC (a `params` object with `service`,
//! `method`, `args`) where configuration args are prefixed onto caller args,
//! and plain REST, where configuration defaults are overlaid under the
//! caller body.

use crate::config::EndpointConfig;
use serde_json::{Map, Value, json};

pub const DEFAULT_RPC_SERVICE: &str = "object";
pub const DEFAULT_RPC_METHOD: &str = "execute_kw";

/// Merge a normalized payload value with the configuration defaults into
/// the outbound request body.
///
/// The JSON-RPC branch is taken when the payload carries a `params` key or
/// the configuration's `additional_params` does. Within it, `args`
/// concatenate config-first while `service`/`method` prefer the payload's
/// values; that asymmetry is intentional and preserved from the upstream
/// contract.
#[must_use]
pub fn build_body(config: &EndpointConfig, value: Value) -> Value {
    match value {
        // A bare args list against a JSON-RPC endpoint is caller-side args.
        Value::Array(args) if config.rpc_params().is_some() => {
            let mut payload_params = Map::new();
            payload_params.insert("args".to_string(), Value::Array(args));
            build_rpc_body(config, &payload_params)
        }
        Value::Object(map) => {
            if map.contains_key("params") || config.rpc_params().is_some() {
                let payload_params = map
                    .get("params")
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_default();
                build_rpc_body(config, &payload_params)
            } else if let Some(defaults) = config
                .additional_params
                .as_ref()
                .filter(|p| !p.is_empty())
            {
                overlay_defaults(defaults, map)
            } else {
                Value::Object(map)
            }
        }
        // Lists (REST) and post-unwrap leftovers go out verbatim.
        other => other,
    }
}

fn build_rpc_body(config: &EndpointConfig, payload_params: &Map<String, Value>) -> Value {
    let config_params = config.rpc_params().cloned().unwrap_or_default();

    let mut merged = config_params.clone();
    for (key, value) in payload_params {
        merged.insert(key.clone(), value.clone());
    }

    // Config args always precede caller args.
    let mut args = config_params
        .get("args")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    args.extend(
        payload_params
            .get("args")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
    );
    merged.insert("args".to_string(), Value::Array(args));

    // service/method: payload wins, then config, then the RPC defaults.
    let service = payload_params
        .get("service")
        .or_else(|| config_params.get("service"))
        .cloned()
        .unwrap_or_else(|| json!(DEFAULT_RPC_SERVICE));
    let method = payload_params
        .get("method")
        .or_else(|| config_params.get("method"))
        .cloned()
        .unwrap_or_else(|| json!(DEFAULT_RPC_METHOD));
    merged.insert("service".to_string(), service);
    merged.insert("method".to_string(), method);

    // Other configuration-level additional params ride along under the
    // envelope, which wins on collisions.
    let mut body = config.additional_params.clone().unwrap_or_default();
    body.remove("params");
    body.insert("jsonrpc".to_string(), json!("2.0"));
    body.insert("method".to_string(), json!("call"));
    body.insert("params".to_string(), Value::Object(merged));
    Value::Object(body)
}

fn overlay_defaults(defaults: &Map<String, Value>, payload: Map<String, Value>) -> Value {
    let mut merged = defaults.clone();
    for (key, value) in payload {
        merged.insert(key, value);
    }
    Value::Object(merged)
}
