//! Item-level accessors shared by list and inspect paths.

use serde_json::{Map, Value};

use crate::body::{extract_nested_object, kind_name};
use crate::error::{OwnerGateError, Result};

/// Identifier of an item. Absent or non-string counts as missing.
pub fn identifier<'a>(item: &'a Map<String, Value>, field: &str) -> Result<&'a str> {
    item.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| OwnerGateError::MissingIdentifier { field: field.to_string() })
}

/// Labels mapping of an item, if any. `path` is dot-separated (`Config.Labels`).
pub fn labels<'a>(item: &'a Map<String, Value>, path: &str) -> Option<&'a Map<String, Value>> {
    path.split('.')
        .try_fold(item, |obj, field| extract_nested_object(obj, field))
}

/// Borrow an array element as an object, or fail as a schema violation.
pub fn as_item_mut(value: &mut Value) -> Result<&mut Map<String, Value>> {
    let kind = kind_name(value);
    value
        .as_object_mut()
        .ok_or_else(|| OwnerGateError::Decode(format!("expected item object, got {kind}")))
}
