//! A claim: a property bag bound to a claim type and, optionally, an owner.

use credo_core::{Hash, Properties};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::claim_type::ClaimType;
use crate::commitment::admit;
use crate::config::BuildPolicy;
use crate::error::ClaimError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub claim_type_hash: Hash,
    pub owner: Option<String>,
    /// Only the keys the claim type declares.
    pub properties: Properties,
}

impl Claim {
    /// Validate `properties` against `claim_type` and keep the declared keys.
    pub fn new(
        claim_type: &ClaimType,
        properties: Properties,
        owner: Option<String>,
    ) -> Result<Self, ClaimError> {
        Self::with_policy(claim_type, properties, owner, &BuildPolicy::default())
    }

    pub fn with_policy(
        claim_type: &ClaimType,
        properties: Properties,
        owner: Option<String>,
        policy: &BuildPolicy,
    ) -> Result<Self, ClaimError> {
        let schema = claim_type.property_schema()?;
        let properties = admit(&schema, properties, policy)?;
        Ok(Self {
            claim_type_hash: claim_type.hash.clone(),
            owner,
            properties,
        })
    }

    pub fn get_property(&self, field: &str) -> Option<&Value> {
        self.properties.get(field)
    }
}
