//! # Network-Attested Claims
//!
//! An attester turns a signed [`AttestationRequest`] into an
//! [`AttestedClaim`] without recomputing anything: the root hash, hash tree
//! and claim-type commitment are the claimer's own. The attester then
//! countersigns the root hash, and may anchor the claim on a ledger
//! contract by signing the contract's signable key.
//!
//! ## Lifecycle
//!
//! `from_request` → `set_attester_signature` → `set_anchor` → `publish`.
//! Redaction (`remove_property`) is allowed at any point after that and
//! keeps `verify_integrity` true.

use std::time::Duration;

use credo_core::Hash;
use credo_crypto::{CommitmentNode, CryptoProvider, EthereumProvider, HashTree};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::claim::Claim;
use crate::commitment::{redact, verify_claim_type_commitment};
use crate::error::ClaimError;
use crate::ledger::{with_timeout, LedgerContract, TxReceipt};
use crate::request::AttestationRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(serialize = "", deserialize = "P: Default"))]
pub struct AttestedClaim<P = EthereumProvider> {
    pub claim: Claim,
    pub root_hash: Hash,
    pub attester_address: Option<String>,
    pub attester_signature: Option<String>,
    /// The contract's signable key for this claim, once anchored.
    pub attested_claim_hash: Option<Hash>,
    /// The attester's signature over `attested_claim_hash`.
    pub attested_claim_signature: Option<String>,
    pub claimer_address: String,
    pub claimer_signature: String,
    pub claim_type_hash: CommitmentNode,
    pub claim_hash_tree: HashTree,
    #[serde(skip)]
    provider: P,
}

impl<P: CryptoProvider> AttestedClaim<P> {
    /// Accept a claimer's signed request.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` if the request is unsigned, has no owner, or does
    /// not validate.
    pub fn from_request(request: AttestationRequest<P>) -> Result<Self, ClaimError> {
        if request.claimer_signature.is_none() || request.claim.owner.is_none() {
            return Err(ClaimError::InvalidRequest(
                "attestation request is unsigned or has no owner".to_string(),
            ));
        }
        if !request.validate() {
            return Err(ClaimError::InvalidRequest(
                "attestation request does not validate".to_string(),
            ));
        }

        let parts = request.into_parts();
        let (Some(claimer_address), Some(claimer_signature)) =
            (parts.claim.owner.clone(), parts.claimer_signature)
        else {
            return Err(ClaimError::InvalidRequest(
                "attestation request is unsigned or has no owner".to_string(),
            ));
        };

        Ok(Self {
            claim: parts.claim,
            root_hash: parts.root_hash,
            attester_address: None,
            attester_signature: None,
            attested_claim_hash: None,
            attested_claim_signature: None,
            claimer_address,
            claimer_signature,
            claim_type_hash: parts.claim_type_hash,
            claim_hash_tree: parts.claim_hash_tree,
            provider: parts.provider,
        })
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Attach the attester's signature over the root hash.
    pub fn set_attester_signature(
        &mut self,
        signature: impl Into<String>,
        attester: impl Into<String>,
    ) -> Result<(), ClaimError> {
        let (signature, attester) = (signature.into(), attester.into());
        if !self
            .provider
            .verify_signature(&signature, &self.root_hash, &attester)
        {
            tracing::warn!(signer = %attester, "attester signature rejected");
            return Err(ClaimError::invalid_signature(&signature, &self.root_hash, &attester));
        }
        self.attester_address = Some(attester);
        self.attester_signature = Some(signature);
        Ok(())
    }

    /// Attach the ledger anchor: the contract's signable key and the
    /// attester's signature over it.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` before the attester has signed, `InvalidSignature`
    /// if the attester did not sign `hash`.
    pub fn set_anchor(&mut self, hash: Hash, signature: impl Into<String>) -> Result<(), ClaimError> {
        let signature = signature.into();
        let attester = self
            .attester_address
            .as_deref()
            .ok_or_else(|| ClaimError::InvalidRequest("claim is not attested yet".to_string()))?;
        if !self.provider.verify_signature(&signature, &hash, attester) {
            tracing::warn!(signer = attester, "anchor signature rejected");
            return Err(ClaimError::invalid_signature(&signature, &hash, attester));
        }
        self.attested_claim_hash = Some(hash);
        self.attested_claim_signature = Some(signature);
        Ok(())
    }

    /// Redact `field`. Calling it twice is harmless.
    pub fn remove_property(&mut self, field: &str) {
        redact(&mut self.claim.properties, &mut self.claim_hash_tree, field);
    }

    pub fn get_property(&self, field: &str) -> Option<&Value> {
        self.claim.properties.get(field)
    }

    /// Disclosed fields re-derive, the claim-type commitment opens, the
    /// claimer is the owner, both signatures hold and the root recomputes.
    pub fn verify_integrity(&self) -> bool {
        self.provider
            .verify_partial_hash_tree(&self.claim_hash_tree, &self.claim.properties)
            && verify_claim_type_commitment(
                &self.provider,
                &self.claim_type_hash,
                &self.claim.claim_type_hash,
            )
            && self.claim.owner.as_deref() == Some(self.claimer_address.as_str())
            && self.provider.verify_signature(
                &self.claimer_signature,
                &self.root_hash,
                &self.claimer_address,
            )
            && self.verify_signature()
            && self.provider.verify_claim_root_hash(
                &self.claim_hash_tree,
                self.claim_type_hash.hash(),
                Some(&self.claimer_address),
                &self.root_hash,
            )
    }

    /// The attester's signature over the root hash. `false` if unsigned.
    pub fn verify_signature(&self) -> bool {
        match (&self.attester_signature, &self.attester_address) {
            (Some(signature), Some(attester)) => {
                self.provider
                    .verify_signature(signature, &self.root_hash, attester)
            }
            _ => false,
        }
    }

    /// The attester's signature over the anchor hash. `false` if unanchored.
    pub fn verify_anchor_integrity(&self) -> bool {
        match (
            &self.attested_claim_signature,
            &self.attested_claim_hash,
            &self.attester_address,
        ) {
            (Some(signature), Some(hash), Some(attester)) => {
                self.provider.verify_signature(signature, hash, attester)
            }
            _ => false,
        }
    }

    /// Store the anchored claim on `contract`.
    pub async fn publish<C>(&self, contract: &C, timeout: Duration) -> Result<TxReceipt, ClaimError>
    where
        C: LedgerContract + ?Sized,
    {
        let (Some(attester), Some(signature)) =
            (&self.attester_address, &self.attested_claim_signature)
        else {
            return Err(ClaimError::InvalidRequest(
                "claim must be attested and anchored before publishing".to_string(),
            ));
        };
        let root = self.root_hash.to_bytes().ok_or_else(|| {
            ClaimError::InvalidRequest(format!("root hash is not hex: {}", self.root_hash))
        })?;

        let receipt = with_timeout(
            timeout,
            contract.set_claim_with_signature(&self.claimer_address, attester, &root, signature),
        )
        .await?;
        tracing::debug!(
            contract = contract.address(),
            tx = %receipt.transaction_hash,
            "attested claim published"
        );
        Ok(receipt)
    }

    /// Check the anchor against `contract`: the attester signed the anchor
    /// hash, the contract derives the same signable key, and the contract
    /// holds the claim. Each call is bounded by `timeout`; any failure is
    /// `false`.
    pub async fn verify_network<C>(&self, contract: &C, timeout: Duration) -> bool
    where
        C: LedgerContract + ?Sized,
    {
        if !self.verify_anchor_integrity() {
            return false;
        }
        let (Some(attester), Some(signature), Some(anchor)) = (
            &self.attester_address,
            &self.attested_claim_signature,
            &self.attested_claim_hash,
        ) else {
            return false;
        };

        let key = with_timeout(
            timeout,
            contract.compute_signable_key(&self.claimer_address, &self.root_hash),
        )
        .await;
        match key {
            Ok(key) if key == *anchor => {}
            Ok(key) => {
                tracing::warn!(expected = %anchor, actual = %key, "signable key mismatch");
                return false;
            }
            Err(e) => {
                tracing::warn!(error = %e, contract = contract.address(), "signable key lookup failed");
                return false;
            }
        }

        match with_timeout(
            timeout,
            contract.verify_claim(&self.claimer_address, attester, signature),
        )
        .await
        {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, contract = contract.address(), "claim lookup failed");
                false
            }
        }
    }
}
