//! JSON body helpers (decode once, mutate structurally, encode once).
//!
//! Bodies are kept as `serde_json::Value` so any upstream schema survives a
//! round trip. The workspace builds `serde_json` with `preserve_order`, so
//! object keys are re-emitted in their upstream order, and with
//! `arbitrary_precision`, so numbers keep their upstream text.

use bytes::Bytes;
use serde_json::{Map, Value};

use crate::error::{OwnerGateError, Result};

/// Decode a buffered body into a generic value.
pub fn decode_body(raw: &[u8]) -> Result<Value> {
    serde_json::from_slice(raw).map_err(|e| OwnerGateError::Decode(format!("invalid json body: {e}")))
}

/// Decode a buffered body that must be a JSON object.
pub fn decode_top_level_object(raw: &[u8]) -> Result<Map<String, Value>> {
    match decode_body(raw)? {
        Value::Object(map) => Ok(map),
        other => Err(OwnerGateError::Decode(format!(
            "expected json object, got {}",
            kind_name(&other)
        ))),
    }
}

/// Nested object under `field`, if present and an object.
pub fn extract_nested_object<'a>(value: &'a Map<String, Value>, field: &str) -> Option<&'a Map<String, Value>> {
    value.get(field).and_then(Value::as_object)
}

/// Serialize a value back into body bytes.
pub fn encode_body(value: &Value) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(|e| OwnerGateError::Encode(format!("json encode failed: {e}")))
}

/// Short type name for error messages.
pub(crate) fn kind_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
