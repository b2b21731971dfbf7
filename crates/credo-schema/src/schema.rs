//! Schema bodies: a field map of declared types plus a required list.
//!
//! Serialized form: `{"properties": {field: {"type": T | [T, ..]}}, "required": [..]}`.

use std::collections::BTreeMap;

use credo_core::Properties;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON types a property may be declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Null,
}

/// A single type or a union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSpec {
    One(JsonType),
    Union(Vec<JsonType>),
}

impl TypeSpec {
    pub fn allows(&self, ty: JsonType) -> bool {
        match self {
            Self::One(t) => *t == ty,
            Self::Union(ts) => ts.contains(&ty),
        }
    }
}

impl From<JsonType> for TypeSpec {
    fn from(t: JsonType) -> Self {
        Self::One(t)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySpec {
    #[serde(rename = "type")]
    pub ty: TypeSpec,
}

impl PropertySpec {
    pub fn new(ty: impl Into<TypeSpec>) -> Self {
        Self { ty: ty.into() }
    }

    pub fn union(types: &[JsonType]) -> Self {
        Self {
            ty: TypeSpec::Union(types.to_vec()),
        }
    }
}

/// A capability schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub properties: BTreeMap<String, PropertySpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl Schema {
    /// Whether `field` is declared.
    pub fn declares(&self, field: &str) -> bool {
        self.properties.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Merge `other` into `self`: its fields override same-named ones, its
    /// required names are appended once.
    pub fn merge(&mut self, other: &Schema) {
        for (field, spec) in &other.properties {
            self.properties.insert(field.clone(), spec.clone());
        }
        for name in &other.required {
            if !self.required.contains(name) {
                self.required.push(name.clone());
            }
        }
    }

    /// Keep only the declared fields of `properties`.
    pub fn prune(&self, properties: &Properties) -> Properties {
        properties
            .iter()
            .filter(|(k, _)| self.declares(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Names in `properties` that the schema does not declare.
    pub fn undeclared<'a>(&self, properties: &'a Properties) -> Vec<&'a str> {
        properties
            .keys()
            .filter(|k| !self.declares(k))
            .map(String::as_str)
            .collect()
    }

    /// The field map alone, as a JSON object.
    pub fn properties_value(&self) -> Value {
        serde_json::to_value(&self.properties).unwrap_or(Value::Null)
    }
}
