//! Property bags: the field-name to value mappings that credentials commit to.

use std::collections::BTreeMap;

use serde_json::Value;

/// A property bag. Keys iterate in sorted order; insertion order is never
/// observable.
pub type Properties = BTreeMap<String, Value>;

/// Whether `value` may appear in a property bag: a scalar, or a flat object
/// whose values are all scalars.
pub fn is_property_value(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.values().all(is_scalar),
        other => is_scalar(other),
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(
        value,
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)
    )
}

/// Convert a JSON object into a property bag.
///
/// Returns `None` for anything other than an object.
pub fn properties_from_value(value: Value) -> Option<Properties> {
    match value {
        Value::Object(map) => Some(map.into_iter().collect()),
        _ => None,
    }
}
