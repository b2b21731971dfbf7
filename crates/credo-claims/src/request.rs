//! # Attestation Requests
//!
//! A claimer turns a [`Claim`] into an [`AttestationRequest`]: the claim's
//! properties are committed to in a hash tree, the claim-type hash gets its
//! own blinded commitment, and the root hash binds both to the owner.
//!
//! The claimer then signs the root hash out of band and attaches the
//! signature. Network attestation requires it ([`AttestationRequest::validate`]);
//! self-attestation does not ([`AttestationRequest::validate_without_signature`]).

use credo_core::Hash;
use credo_crypto::{CommitmentNode, CryptoProvider, EthereumProvider, HashTree};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::claim::Claim;
use crate::commitment::verify_claim_type_commitment;
use crate::error::ClaimError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(serialize = "", deserialize = "P: Default"))]
pub struct AttestationRequest<P = EthereumProvider> {
    pub claim: Claim,
    /// Blinded commitment to `claim.claim_type_hash`.
    pub claim_type_hash: CommitmentNode,
    pub claim_hash_tree: HashTree,
    pub root_hash: Hash,
    pub claimer_signature: Option<String>,
    #[serde(skip)]
    provider: P,
}

impl<P: CryptoProvider> AttestationRequest<P> {
    /// Commit to `claim`. The claimer signature is attached later.
    pub fn from_claim(provider: P, claim: Claim) -> Result<Self, ClaimError> {
        let claim_hash_tree = provider.build_hash_tree(&claim.properties)?;
        let claim_type_hash = provider.hash_with_nonce(
            &Value::String(claim.claim_type_hash.as_str().to_string()),
            None,
        )?;
        let root_hash = provider.calculate_claim_root_hash(
            &claim_hash_tree,
            claim_type_hash.hash(),
            claim.owner.as_deref(),
        );

        Ok(Self {
            claim,
            claim_type_hash,
            claim_hash_tree,
            root_hash,
            claimer_signature: None,
            provider,
        })
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Attach the owner's signature over the root hash.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` if the claim has no owner, `InvalidSignature` if the
    /// owner did not sign the root hash.
    pub fn set_claimer_signature(&mut self, signature: impl Into<String>) -> Result<(), ClaimError> {
        let signature = signature.into();
        let owner = self
            .claim
            .owner
            .as_deref()
            .ok_or_else(|| ClaimError::InvalidRequest("claim has no owner".to_string()))?;

        if !self
            .provider
            .verify_signature(&signature, &self.root_hash, owner)
        {
            tracing::warn!(signer = owner, "claimer signature rejected");
            return Err(ClaimError::invalid_signature(&signature, &self.root_hash, owner));
        }
        self.claimer_signature = Some(signature);
        Ok(())
    }

    /// Full check: commitments hold and the owner signed the root hash.
    pub fn validate(&self) -> bool {
        self.validate_without_signature() && self.verify_claimer_signature()
    }

    /// Commitments hold: every property re-derives its node, the key sets
    /// match, the claim-type commitment opens, and the root recomputes.
    pub fn validate_without_signature(&self) -> bool {
        self.provider
            .verify_hash_tree(&self.claim_hash_tree, &self.claim.properties)
            && verify_claim_type_commitment(
                &self.provider,
                &self.claim_type_hash,
                &self.claim.claim_type_hash,
            )
            && self.provider.verify_claim_root_hash(
                &self.claim_hash_tree,
                self.claim_type_hash.hash(),
                self.claim.owner.as_deref(),
                &self.root_hash,
            )
    }

    fn verify_claimer_signature(&self) -> bool {
        match (&self.claimer_signature, &self.claim.owner) {
            (Some(signature), Some(owner)) => {
                self.provider
                    .verify_signature(signature, &self.root_hash, owner)
            }
            _ => false,
        }
    }

    pub(crate) fn into_parts(self) -> RequestParts<P> {
        RequestParts {
            claim: self.claim,
            claim_type_hash: self.claim_type_hash,
            claim_hash_tree: self.claim_hash_tree,
            root_hash: self.root_hash,
            claimer_signature: self.claimer_signature,
            provider: self.provider,
        }
    }
}

pub(crate) struct RequestParts<P> {
    pub claim: Claim,
    pub claim_type_hash: CommitmentNode,
    pub claim_hash_tree: HashTree,
    pub root_hash: Hash,
    pub claimer_signature: Option<String>,
    pub provider: P,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim_type::ClaimType;
    use credo_core::Properties;
    use credo_crypto::EthereumWallet;
    use serde_json::json;

    fn request(owner: Option<String>) -> AttestationRequest {
        let ct = ClaimType::build(&EthereumProvider, "liveness").unwrap();
        let mut props = Properties::new();
        props.insert("liveness".into(), json!(true));
        let claim = Claim::new(&ct, props, owner).unwrap();
        AttestationRequest::from_claim(EthereumProvider, claim).unwrap()
    }

    #[test]
    fn fresh_request_validates_without_signature() {
        let wallet = EthereumWallet::generate();
        let req = request(Some(wallet.address()));
        assert!(req.validate_without_signature());
        assert!(!req.validate());
    }

    #[test]
    fn claimer_signature_round_trip() {
        let wallet = EthereumWallet::generate();
        let mut req = request(Some(wallet.address()));
        let sig = wallet.sign_hash(&req.root_hash).unwrap();
        req.set_claimer_signature(sig).unwrap();
        assert!(req.validate());
    }

    #[test]
    fn foreign_signature_is_refused() {
        let owner = EthereumWallet::generate();
        let other = EthereumWallet::generate();
        let mut req = request(Some(owner.address()));
        let sig = other.sign_hash(&req.root_hash).unwrap();
        assert!(matches!(
            req.set_claimer_signature(sig),
            Err(ClaimError::InvalidSignature { .. })
        ));
        assert!(req.claimer_signature.is_none());
    }

    #[test]
    fn ownerless_request_cannot_be_signed() {
        let mut req = request(None);
        assert!(matches!(
            req.set_claimer_signature("0x00"),
            Err(ClaimError::InvalidRequest(_))
        ));
    }

    #[test]
    fn tampered_property_fails_validation() {
        let wallet = EthereumWallet::generate();
        let mut req = request(Some(wallet.address()));
        req.claim.properties.insert("liveness".into(), json!(false));
        assert!(!req.validate_without_signature());
    }

    #[test]
    fn swapped_claim_type_fails_validation() {
        let wallet = EthereumWallet::generate();
        let mut req = request(Some(wallet.address()));
        req.claim.claim_type_hash = Hash::from("0x00");
        assert!(!req.validate_without_signature());
    }

    #[test]
    fn serde_round_trip_restores_provider() {
        let wallet = EthereumWallet::generate();
        let req = request(Some(wallet.address()));
        let text = serde_json::to_string(&req).unwrap();
        assert!(text.contains("claimHashTree"));
        let back: AttestationRequest = serde_json::from_str(&text).unwrap();
        assert_eq!(back, req);
        assert!(back.validate_without_signature());
    }
}
