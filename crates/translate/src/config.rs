//! Stored endpoint configuration, as seen by the execution path.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One stored API endpoint: where to send a translated request and what
/// defaults to fold into it. Read-only during execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointConfig {
    /// Stable lookup key; unique per active configuration.
    pub tool_id: String,
    /// Absolute target URL.
    pub base_url: String,
    /// GET/POST/PUT/DELETE/PATCH, case-insensitive.
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    /// Default/template request body. For JSON-RPC endpoints this holds a
    /// `params` object whose `args` prefix caller-supplied args.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_params: Option<Map<String, Value>>,
    /// Pass-through metadata only; never applied by the dispatcher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_config: Option<Value>,
}

fn default_method() -> String {
    "POST".to_string()
}

impl EndpointConfig {
    /// The configuration-side `params` object, when this endpoint is
    /// JSON-RPC shaped.
    #[must_use]
    pub fn rpc_params(&self) -> Option<&Map<String, Value>> {
        self.additional_params
            .as_ref()
            .and_then(|p| p.get("params"))
            .and_then(Value::as_object)
    }

    /// Headers for the outbound call: stored headers plus a
    /// `Content-Type: application/json` default.
    ///
    /// The check is case-sensitive on purpose: a stored `content-type` key
    /// does not suppress the default, matching the upstream behavior.
    #[must_use]
    pub fn outbound_headers(&self) -> BTreeMap<String, String> {
        let mut headers = self.headers.clone().unwrap_or_default();
        if !headers.contains_key("Content-Type") {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }
        headers
    }
}
