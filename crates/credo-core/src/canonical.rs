//! # Canonical Serialization — Order-Independent Byte Production
//!
//! This module defines `CanonicalBytes`, the sole construction path for bytes
//! that are hashed into commitments anywhere in credo.
//!
//! ## Security Invariant
//!
//! The `CanonicalBytes` newtype has a private inner field. The only way to
//! construct it is through `CanonicalBytes::new()`, which deep-sorts the value
//! before RFC 8785 serialization. Any function that hashes structured data
//! accepts `&CanonicalBytes`, so a value serialized in insertion order can
//! never reach a digest primitive.
//!
//! ## Ordering Rules
//!
//! 1. **Object keys** ascend in byte order at every depth.
//! 2. **Array elements** ascend under a fixed type rank
//!    `null < boolean < number < string < array < object`, then by natural
//!    value: numbers numerically, strings bytewise, composites by their own
//!    canonical serialization.
//!
//! Two values that are equal up to key order and element order therefore
//! serialize to identical bytes.

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by deep-sorting followed by JCS serialization.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::new()`.
/// - Every object's keys appear in ascending order.
/// - Every array's elements appear in ascending type-rank order.
/// - Serialization uses compact separators (RFC 8785).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::SerializationFailed` if the value cannot
    /// be represented as JSON.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        let sorted = deep_sort(value);
        let s = serde_jcs::to_string(&sorted)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The canonical form as text. Always valid UTF-8.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Recursively sort a JSON value: object keys and array elements alike.
pub fn deep_sort(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(deep_sort_object(map)),
        Value::Array(arr) => Value::Array(deep_sort_array(arr)),
        scalar => scalar,
    }
}

/// Rebuild an object with its keys inserted in ascending order and every
/// value deep-sorted.
pub fn deep_sort_object(map: Map<String, Value>) -> Map<String, Value> {
    let mut entries: Vec<(String, Value)> = map.into_iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));

    let mut sorted = Map::new();
    for (k, v) in entries {
        sorted.insert(k, deep_sort(v));
    }
    sorted
}

/// Deep-sort every element, then order the elements by type rank and value.
pub fn deep_sort_array(arr: Vec<Value>) -> Vec<Value> {
    let mut elements: Vec<Value> = arr.into_iter().map(deep_sort).collect();
    elements.sort_by(compare_values);
    elements
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over already deep-sorted values.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
        (Value::String(x), Value::String(y)) => x.as_bytes().cmp(y.as_bytes()),
        (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_)) => {
            composite_text(a).cmp(&composite_text(b))
        }
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x.cmp(&y);
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x.cmp(&y);
    }
    let x = a.as_f64().unwrap_or(f64::NAN);
    let y = b.as_f64().unwrap_or(f64::NAN);
    x.partial_cmp(&y)
        // Equal magnitudes with different spellings (1 vs 1.0) still need a
        // stable order.
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.to_string().cmp(&b.to_string()))
}

// Composites are deep-sorted before comparison, so plain compact
// serialization is already canonical.
fn composite_text(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_default()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn json_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| serde_json::json!(n)),
            "[a-zA-Z0-9_ ]{0,20}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 64, 8, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,10}", inner, 0..8)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    /// Reverse every array at every depth.
    fn permute(value: Value) -> Value {
        match value {
            Value::Array(arr) => Value::Array(arr.into_iter().rev().map(permute).collect()),
            Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, permute(v))).collect())
            }
            scalar => scalar,
        }
    }

    proptest! {
        #[test]
        fn canonical_bytes_deterministic(value in json_value()) {
            let a = CanonicalBytes::new(&value).unwrap();
            let b = CanonicalBytes::new(&value).unwrap();
            prop_assert_eq!(a.as_bytes(), b.as_bytes());
        }

        #[test]
        fn element_order_does_not_matter(value in json_value()) {
            let a = CanonicalBytes::new(&value).unwrap();
            let b = CanonicalBytes::new(&permute(value)).unwrap();
            prop_assert_eq!(a.as_str(), b.as_str());
        }

        #[test]
        fn deep_sort_is_idempotent(value in json_value()) {
            let once = deep_sort(value);
            let twice = deep_sort(once.clone());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn canonical_bytes_valid_json(value in json_value()) {
            let cb = CanonicalBytes::new(&value).unwrap();
            let parsed: Result<Value, _> = serde_json::from_slice(cb.as_bytes());
            prop_assert!(parsed.is_ok(), "Not valid JSON: {:?}", parsed.err());
        }
    }
}
