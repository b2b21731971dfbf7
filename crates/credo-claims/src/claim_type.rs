//! # Claim Types
//!
//! A [`ClaimType`] fingerprints a field shape. Its hash is the provider's
//! hash of the pseudo-schema body, and the body is then stamped with
//! `$id = "credo:ctype:<hash>"`. Two claim types built from the same level
//! with the same provider always share a hash, regardless of fragment order.

use credo_core::{canonicalize_level, Hash, Properties};
use credo_crypto::CryptoProvider;
use credo_schema::{compose, PropertySpec, PropertyValidator, Schema};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

use crate::error::ClaimError;

/// Schema dialect stamped on pseudo-schemas when none is given.
pub const DEFAULT_SCHEMA_VERSION: &str = "http://kilt-protocol.org/draft-01/ctype#";

/// Prefix of a claim type's `$id`.
pub const CLAIM_TYPE_ID_PREFIX: &str = "credo:ctype:";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimType {
    pub hash: Hash,
    pub owner: Option<String>,
    pub schema: Value,
}

impl ClaimType {
    /// The pseudo-schema body `{$schema, title, properties, type}`.
    pub fn build_schema(title: &str, properties: Value, schema_uri: Option<&str>) -> Value {
        json!({
            "$schema": schema_uri.unwrap_or(DEFAULT_SCHEMA_VERSION),
            "title": title,
            "properties": properties,
            "type": "object",
        })
    }

    /// Fingerprint a pseudo-schema body.
    ///
    /// The hash covers the body as given; `$id` is added afterwards.
    pub fn from_schema<P: CryptoProvider + ?Sized>(
        provider: &P,
        body: Value,
        owner: Option<String>,
    ) -> Result<Self, ClaimError> {
        let Value::Object(mut map) = body else {
            return Err(ClaimError::InvalidRequest(
                "claim type schema must be an object".to_string(),
            ));
        };
        let hash = provider.hash(&Value::Object(map.clone()))?;
        map.insert(
            "$id".to_string(),
            Value::String(format!("{CLAIM_TYPE_ID_PREFIX}{hash}")),
        );
        Ok(Self {
            hash,
            owner,
            schema: Value::Object(map),
        })
    }

    /// The claim type for a `+`-joined KYC level.
    ///
    /// Fields come from composing the level's capability fragments; the
    /// title is the level in canonical form.
    pub fn build<P: CryptoProvider + ?Sized>(provider: &P, level: &str) -> Result<Self, ClaimError> {
        let composed = compose(level)?;
        let body = Self::build_schema(
            &canonicalize_level(level),
            composed.properties_value(),
            None,
        );
        let claim_type = Self::from_schema(provider, body, None)?;
        tracing::debug!(level, hash = %claim_type.hash, "claim type built");
        Ok(claim_type)
    }

    pub fn id(&self) -> Option<&str> {
        self.schema.get("$id").and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.schema.get("title").and_then(Value::as_str)
    }

    /// The declared fields as a schema claims are validated against.
    ///
    /// Claim types carry no required list, so only types are enforced.
    ///
    /// # Errors
    ///
    /// `InvalidSchema` if the field map is malformed.
    pub fn property_schema(&self) -> Result<Schema, ClaimError> {
        let fields = self
            .schema
            .get("properties")
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));
        PropertyValidator::shared()?.validate_schema(&json!({ "properties": fields }))?;

        let properties: BTreeMap<String, PropertySpec> = serde_json::from_value(fields)
            .map_err(|e| ClaimError::InvariantViolation(format!("claim type fields: {e}")))?;
        Ok(Schema {
            properties,
            required: Vec::new(),
        })
    }

    /// Drop the keys of `properties` this claim type does not declare.
    pub fn prune(&self, properties: &Properties) -> Result<Properties, ClaimError> {
        Ok(self.property_schema()?.prune(properties))
    }
}
