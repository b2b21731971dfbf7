//! # Crypto Provider Abstraction
//!
//! One [`CryptoProvider`] exists per supported ledger ecosystem. A backend
//! supplies three things: its digest primitive (with its own way of binding
//! a nonce), signature verification against its notion of signer identity,
//! and the fixed-layout credential digest. Term hashing, hash trees and
//! root hashes are defined once here on top of those primitives.
//!
//! ## Security Invariants
//!
//! - `verify_signature` never fails; malformed input verifies as `false`.
//! - Root hashes depend only on the *set* of node hashes and the owner, so
//!   they are unaffected by insertion order and by redaction.
//! - Partial verification never asks for the nonce of a field that is not
//!   being disclosed.
//!
//! No code outside a provider may depend on a specific hash or signature
//! family; the claim layer is generic over this trait.

use credo_core::{CanonicalBytes, Hash, Nonce, Properties};
use serde_json::Value;

use crate::blockchain::Blockchain;
use crate::error::CryptoError;
use crate::tree::{CommitmentNode, HashTree};

/// Hashing and signature verification for one ledger ecosystem.
pub trait CryptoProvider: Send + Sync {
    /// The ledger family this provider serves.
    fn blockchain(&self) -> Blockchain;

    /// The backend's digest primitive over `text` bound to `nonce`.
    ///
    /// An empty nonce yields the plain digest of `text`.
    fn digest(&self, text: &str, nonce: &str) -> Hash;

    /// Verify `signature` over `message` by `expected_signer`.
    fn verify_signature(&self, signature: &str, message: &Hash, expected_signer: &str) -> bool;

    /// Digest binding a credential's subject, classification codes and root.
    fn generate_credential_hash(
        &self,
        subject_address: &str,
        kyc_type: u8,
        country_of_residence: u8,
        country_of_id_issuance: u8,
        root_hash: &Hash,
    ) -> Result<Hash, CryptoError>;

    /// Digest a self-attestation signs over.
    ///
    /// Defaults to the credential layout.
    fn generate_attestation_hash(
        &self,
        claimer_address: &str,
        kyc_type: u8,
        country_of_residence: u8,
        country_of_id_issuance: u8,
        root_hash: &Hash,
    ) -> Result<Hash, CryptoError> {
        self.generate_credential_hash(
            claimer_address,
            kyc_type,
            country_of_residence,
            country_of_id_issuance,
            root_hash,
        )
    }

    // ─── Term hashing ───────────────────────────────────────────────────

    /// Hash any JSON term.
    ///
    /// Strings are hashed as-is, other scalars by their JSON text, arrays
    /// and objects by their canonical serialization.
    fn hash(&self, term: &Value) -> Result<Hash, CryptoError> {
        match term {
            Value::Array(_) | Value::Object(_) => {
                let canonical = CanonicalBytes::new(term)?;
                Ok(self.digest(canonical.as_str(), ""))
            }
            scalar => Ok(self.digest(&scalar_text(scalar), "")),
        }
    }

    /// Hash a term blinded by `nonce`, drawing a fresh nonce if none is given.
    fn hash_with_nonce(
        &self,
        term: &Value,
        nonce: Option<Nonce>,
    ) -> Result<CommitmentNode, CryptoError> {
        let nonce = nonce.unwrap_or_else(Nonce::generate);
        let hash = match term {
            Value::Array(_) | Value::Object(_) => {
                let canonical = CanonicalBytes::new(term)?;
                self.digest(&format!("{}{}", nonce.as_str(), canonical.as_str()), "")
            }
            scalar => self.digest(&scalar_text(scalar), nonce.as_str()),
        };
        Ok(CommitmentNode::Disclosed { hash, nonce })
    }

    // ─── Hash trees ─────────────────────────────────────────────────────

    /// The text committed to for one field: the canonical form of
    /// `{field: value}`, so the field name is bound into the hash.
    fn build_hashable_tree_value(&self, field: &str, value: &Value) -> Result<String, CryptoError> {
        let mut wrapper = serde_json::Map::new();
        wrapper.insert(field.to_string(), value.clone());
        let canonical = CanonicalBytes::new(&Value::Object(wrapper))?;
        Ok(canonical.as_str().to_string())
    }

    /// Commit to every field with a fresh nonce.
    fn build_hash_tree(&self, properties: &Properties) -> Result<HashTree, CryptoError> {
        let mut tree = HashTree::new();
        for (field, value) in properties {
            let hashable = self.build_hashable_tree_value(field, value)?;
            let node = self.hash_with_nonce(&Value::String(hashable), None)?;
            tree.insert(field.clone(), node);
        }
        Ok(tree)
    }

    /// Digest over the sorted node hashes followed by the owner.
    ///
    /// A missing owner contributes nothing.
    fn calculate_root_hash(&self, tree: &HashTree, owner: Option<&str>) -> Hash {
        root_over(self, tree.sorted_hashes(), owner)
    }

    /// Root hash of a claim: the tree's node hashes together with the
    /// claim-type commitment, then the owner.
    fn calculate_claim_root_hash(
        &self,
        tree: &HashTree,
        claim_type_hash: &Hash,
        owner: Option<&str>,
    ) -> Hash {
        let mut hashes = tree.sorted_hashes();
        hashes.push(claim_type_hash);
        hashes.sort();
        root_over(self, hashes, owner)
    }

    /// Strict verification: identical key sets and every node recomputes.
    ///
    /// A redacted node fails, since its value cannot be re-derived.
    fn verify_hash_tree(&self, tree: &HashTree, properties: &Properties) -> bool {
        if tree.len() != properties.len() || !properties.keys().all(|k| tree.contains(k)) {
            return false;
        }
        properties.iter().all(|(field, value)| match tree.get(field) {
            Some(CommitmentNode::Disclosed { hash, nonce }) => {
                recompute(self, field, value, nonce).as_ref() == Some(hash)
            }
            _ => false,
        })
    }

    /// Verification after redaction: only fields still present are checked.
    fn verify_partial_hash_tree(&self, tree: &HashTree, properties: &Properties) -> bool {
        properties.iter().all(|(field, value)| match tree.get(field) {
            None => false,
            Some(CommitmentNode::Redacted { .. }) => true,
            Some(CommitmentNode::Disclosed { hash, nonce }) => {
                recompute(self, field, value, nonce).as_ref() == Some(hash)
            }
        })
    }

    fn verify_root_hash(&self, tree: &HashTree, owner: Option<&str>, expected: &Hash) -> bool {
        self.calculate_root_hash(tree, owner) == *expected
    }

    fn verify_claim_root_hash(
        &self,
        tree: &HashTree,
        claim_type_hash: &Hash,
        owner: Option<&str>,
        expected: &Hash,
    ) -> bool {
        self.calculate_claim_root_hash(tree, claim_type_hash, owner) == *expected
    }
}

/// Re-derive a field's commitment hash from its value and stored nonce.
fn recompute<P: CryptoProvider + ?Sized>(
    provider: &P,
    field: &str,
    value: &Value,
    nonce: &Nonce,
) -> Option<Hash> {
    let hashable = provider.build_hashable_tree_value(field, value).ok()?;
    match provider.hash_with_nonce(&Value::String(hashable), Some(nonce.clone())) {
        Ok(CommitmentNode::Disclosed { hash, .. }) => Some(hash),
        _ => None,
    }
}

fn root_over<P: CryptoProvider + ?Sized>(
    provider: &P,
    hashes: Vec<&Hash>,
    owner: Option<&str>,
) -> Hash {
    let mut hashable: String = hashes.iter().map(|h| h.as_str()).collect();
    hashable.push_str(owner.unwrap_or_default());
    provider.digest(&hashable, "")
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
