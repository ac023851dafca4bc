//! Payload shape detection and normalization.
//!
//! Callers send execution payloads in several inconsistent shapes: a raw
//! `body`, a `body` nested under `query`, JSON encoded as a string (sometimes
//! twice), or a bare `args` list. This module resolves all of them into one
//! structured value for the merge step, or a precise error.

use crate::error::{ExecuteError, Result};
use serde_json::Value;

/// Which top-level key supplied the raw source.
///
/// The `args` branch is the only one where a bare list is a legal body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Body,
    Query,
    Args,
}

/// Extract the raw body source from a caller payload.
///
/// Priority is `body` → `query` → `args`. A source that re-wraps a single
/// `query` or `body` key one level deeper is unwrapped once.
///
/// # Errors
///
/// Returns `MissingPayloadSource` when the payload is not an object or
/// names none of the recognized keys.
pub fn extract_source(payload: &Value) -> Result<(Value, SourceKind)> {
    let Some(obj) = payload.as_object() else {
        return Err(ExecuteError::MissingPayloadSource);
    };

    for (key, kind) in [
        ("body", SourceKind::Body),
        ("query", SourceKind::Query),
        ("args", SourceKind::Args),
    ] {
        if let Some(value) = obj.get(key) {
            return Ok((unwrap_rewrapped(value.clone()), kind));
        }
    }

    Err(ExecuteError::MissingPayloadSource)
}

/// Resolve a raw source into the structured value the merge step consumes.
///
/// Strings are parsed as JSON text; a parse that yields another string is
/// parsed once more (double-encoded payloads). Objects pass through. Lists
/// are accepted only from the `args` branch. A singleton `{"body": ...}`
/// wrapper around the result is peeled off.
///
/// # Errors
///
/// `InvalidJsonPayload` when a string source does not parse (either pass),
/// `UnsupportedPayloadType` for scalars and for lists outside `args`.
pub fn materialize(source: Value, kind: SourceKind) -> Result<Value> {
    let value = match source {
        Value::String(text) => parse_json_text(&text)?,
        other => other,
    };

    let value = match value {
        Value::Object(map) => Value::Object(map),
        Value::Array(items) if kind == SourceKind::Args => Value::Array(items),
        other => {
            return Err(ExecuteError::UnsupportedPayloadType(format!(
                "cannot build a request body from a bare {}",
                describe(&other)
            )));
        }
    };

    Ok(unwrap_singleton_body(value))
}

/// Extraction and materialization in one step.
///
/// # Errors
///
/// Propagates the errors of [`extract_source`] and [`materialize`].
pub fn normalize(payload: &Value) -> Result<(Value, SourceKind)> {
    let (raw, kind) = extract_source(payload)?;
    Ok((materialize(raw, kind)?, kind))
}

fn parse_json_text(text: &str) -> Result<Value> {
    let parsed: Value = serde_json::from_str(text)
        .map_err(|e| ExecuteError::InvalidJsonPayload(e.to_string()))?;

    // Double-encoded payloads decode to a string on the first pass.
    if let Value::String(inner) = parsed {
        return serde_json::from_str(&inner)
            .map_err(|e| ExecuteError::InvalidJsonPayload(e.to_string()));
    }

    Ok(parsed)
}

fn unwrap_rewrapped(value: Value) -> Value {
    if let Value::Object(map) = &value
        && map.len() == 1
        && let Some((key, inner)) = map.iter().next()
        && matches!(key.as_str(), "query" | "body")
    {
        return inner.clone();
    }
    value
}

fn unwrap_singleton_body(value: Value) -> Value {
    if let Value::Object(map) = &value
        && map.len() == 1
        && let Some(inner) = map.get("body")
    {
        return inner.clone();
    }
    value
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
