//! Shared steps of every builder and verifier: admitting a property bag
//! under a schema, checking the claim-type commitment, and redaction.

use credo_core::{Hash, Properties};
use credo_crypto::{CommitmentNode, CryptoProvider, HashTree};
use credo_schema::{check_values, PropertyValidator, Schema, ValidationMode};
use serde_json::Value;

use crate::config::{BuildPolicy, ExtraPropertyPolicy};
use crate::error::ClaimError;

/// Validate `properties` against `schema` and return the bag that will be
/// committed to.
///
/// Under [`ExtraPropertyPolicy::Prune`] undeclared keys pass validation and
/// are dropped; under `Reject` they fail it. Only the kept values must be
/// scalars or flat objects.
pub(crate) fn admit(
    schema: &Schema,
    properties: Properties,
    policy: &BuildPolicy,
) -> Result<Properties, ClaimError> {
    let mode = match policy.extra_properties {
        ExtraPropertyPolicy::Prune => ValidationMode::Lenient,
        ExtraPropertyPolicy::Reject => ValidationMode::Strict,
    };
    PropertyValidator::shared()?.validate_against(schema, &properties, mode)?;

    let undeclared = schema.undeclared(&properties);
    if !undeclared.is_empty() {
        tracing::debug!(?undeclared, "pruning undeclared properties");
    }
    let admitted = schema.prune(&properties);
    check_values(&admitted)?;

    if admitted.is_empty() && !policy.allow_empty_properties {
        return Err(ClaimError::EmptyProperties);
    }
    Ok(admitted)
}

/// Whether `node` commits to `claim_type_hash` under its stored nonce.
pub(crate) fn verify_claim_type_commitment<P: CryptoProvider + ?Sized>(
    provider: &P,
    node: &CommitmentNode,
    claim_type_hash: &Hash,
) -> bool {
    let Some(nonce) = node.nonce() else {
        return false;
    };
    let term = Value::String(claim_type_hash.as_str().to_string());
    match provider.hash_with_nonce(&term, Some(nonce.clone())) {
        Ok(recomputed) => recomputed.hash() == node.hash(),
        Err(_) => false,
    }
}

/// Drop `field`'s value and its node's nonce together.
pub(crate) fn redact(properties: &mut Properties, tree: &mut HashTree, field: &str) {
    let removed_value = properties.remove(field).is_some();
    let removed_nonce = tree.redact(field);
    if removed_value || removed_nonce {
        tracing::debug!(field, "property redacted");
    }
}

/// The string value of a well-known key, if present.
pub(crate) fn string_property<'a>(properties: &'a Properties, key: &str) -> Option<&'a str> {
    properties.get(key).and_then(Value::as_str)
}
