//! # Property Validation
//!
//! Runtime validation of property bags against capability schemas
//! (JSON Schema draft-07).
//!
//! ## Security Invariant
//!
//! Validation is a trust boundary. Two distinct failures are reported:
//!
//! - `InvalidSchema`: the schema body itself is malformed (checked against
//!   the meta-schema before it is trusted to judge any data).
//! - `PropertyMismatch`: the data does not conform. Each violation carries
//!   the instance path, the schema path and a readable message.
//!
//! ## Modes
//!
//! The body is wrapped into a full draft-07 object schema. In
//! [`ValidationMode::Lenient`] undeclared properties pass (callers prune
//! them afterwards); in [`ValidationMode::Strict`] they are violations.

use std::fmt;
use std::sync::OnceLock;

use credo_core::{is_property_value, Properties};
use jsonschema::Validator;
use serde_json::{json, Value};
use thiserror::Error;

use crate::schema::Schema;

const DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

/// Error raised by schema composition or validation.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The schema body failed meta-schema validation or could not compile.
    #[error("invalid schema:\n{0}")]
    InvalidSchema(ValidationViolations),

    /// The property bag does not conform to the schema.
    #[error("property mismatch:\n{0}")]
    PropertyMismatch(ValidationViolations),

    /// A level names an unknown capability, or composes to no fields.
    #[error("unsupported KYC level: {0}")]
    UnsupportedKycLevel(String),
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer path to the violating field in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }

    /// Whether any violation points at `field` (top-level instance path).
    pub fn mentions(&self, field: &str) -> bool {
        let pointer = format!("/{field}");
        self.violations
            .iter()
            .any(|v| v.instance_path == pointer || v.message.contains(field))
    }

    fn single(message: impl Into<String>) -> Self {
        Self {
            violations: vec![Violation {
                instance_path: String::new(),
                schema_path: String::new(),
                message: message.into(),
            }],
        }
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// How undeclared properties are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Undeclared properties are allowed.
    #[default]
    Lenient,
    /// Undeclared properties are violations.
    Strict,
}

/// Validates schema bodies and property bags.
///
/// Compiles the meta-schema once at construction.
pub struct PropertyValidator {
    meta: Validator,
}

impl fmt::Debug for PropertyValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyValidator").finish_non_exhaustive()
    }
}

impl PropertyValidator {
    /// Build a validator.
    ///
    /// # Errors
    ///
    /// `InvalidSchema` if the meta-schema fails to compile.
    pub fn new() -> Result<Self, SchemaError> {
        let meta = compile(&meta_schema())?;
        Ok(Self { meta })
    }

    /// A process-wide validator, compiled on first use.
    pub fn shared() -> Result<&'static Self, SchemaError> {
        static SHARED: OnceLock<PropertyValidator> = OnceLock::new();
        if let Some(validator) = SHARED.get() {
            return Ok(validator);
        }
        let validator = Self::new()?;
        Ok(SHARED.get_or_init(|| validator))
    }

    /// Check a raw schema body against the meta-schema.
    pub fn validate_schema(&self, body: &Value) -> Result<(), SchemaError> {
        let violations = collect(&self.meta, body);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::InvalidSchema(violations))
        }
    }

    pub fn is_valid_schema(&self, body: &Value) -> bool {
        self.meta.is_valid(body)
    }

    /// Validate `properties` against a raw schema body.
    ///
    /// # Errors
    ///
    /// `InvalidSchema` if the body is malformed, `PropertyMismatch` if the
    /// bag does not conform.
    pub fn validate(
        &self,
        body: &Value,
        properties: &Properties,
        mode: ValidationMode,
    ) -> Result<(), SchemaError> {
        self.validate_schema(body)?;
        let validator = compile(&wrap_schema(body, mode))?;

        let instance = Value::Object(
            properties
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        );
        let violations = collect(&validator, &instance);
        if violations.is_empty() {
            Ok(())
        } else {
            tracing::debug!(
                violations = violations.len(),
                ?mode,
                "property bag rejected by schema"
            );
            Err(SchemaError::PropertyMismatch(violations))
        }
    }

    /// Validate `properties` against a typed schema.
    pub fn validate_against(
        &self,
        schema: &Schema,
        properties: &Properties,
        mode: ValidationMode,
    ) -> Result<(), SchemaError> {
        let body = serde_json::to_value(schema)
            .map_err(|e| SchemaError::InvalidSchema(ValidationViolations::single(e.to_string())))?;
        self.validate(&body, properties, mode)
    }

    pub fn is_valid(&self, body: &Value, properties: &Properties, mode: ValidationMode) -> bool {
        self.validate(body, properties, mode).is_ok()
    }
}

/// Check that every value is a scalar or a flat object of scalars.
///
/// # Errors
///
/// `PropertyMismatch` with one violation per offending field.
pub fn check_values(properties: &Properties) -> Result<(), SchemaError> {
    let violations: Vec<Violation> = properties
        .iter()
        .filter(|(_, value)| !is_property_value(value))
        .map(|(field, _)| Violation {
            instance_path: format!("/{field}"),
            schema_path: String::new(),
            message: format!("{field} holds a nested or list value"),
        })
        .collect();
    if violations.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::PropertyMismatch(ValidationViolations { violations }))
    }
}

/// Wrap a `{properties, required}` body into a full draft-07 object schema.
pub fn wrap_schema(body: &Value, mode: ValidationMode) -> Value {
    let properties = body.get("properties").cloned().unwrap_or_else(|| json!({}));
    let required = body.get("required").cloned().unwrap_or_else(|| json!([]));
    json!({
        "$schema": DRAFT_07,
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": mode == ValidationMode::Lenient,
    })
}

/// Meta-schema every schema body must satisfy: a `properties` map whose
/// entries declare only a `type` (one JSON type or a list of them), and an
/// optional `required` list of names.
pub fn meta_schema() -> Value {
    let types = json!(["string", "integer", "number", "boolean", "object", "null"]);
    json!({
        "$schema": DRAFT_07,
        "type": "object",
        "properties": {
            "properties": {
                "type": "object",
                "patternProperties": {
                    "^.*$": {
                        "type": "object",
                        "properties": {
                            "type": {
                                "oneOf": [
                                    {"type": "string", "enum": types.clone()},
                                    {"type": "array", "items": {"type": "string", "enum": types}}
                                ]
                            }
                        },
                        "additionalProperties": false,
                        "required": ["type"]
                    }
                }
            },
            "required": {
                "type": "array",
                "items": {"type": "string"}
            }
        },
        "additionalProperties": false,
        "required": ["properties"]
    })
}

fn compile(schema: &Value) -> Result<Validator, SchemaError> {
    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft7);
    opts.build(schema)
        .map_err(|e| SchemaError::InvalidSchema(ValidationViolations::single(e.to_string())))
}

fn collect(validator: &Validator, instance: &Value) -> ValidationViolations {
    ValidationViolations {
        violations: validator
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect(),
    }
}
