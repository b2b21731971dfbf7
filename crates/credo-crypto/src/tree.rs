//! # Hash Trees — One-Level Field Commitments
//!
//! A hash tree maps each field of a property bag to a [`CommitmentNode`].
//! The node's hash commits to `{field: value}` blinded by a nonce. Holding
//! the nonce lets anyone with the value re-derive the hash; dropping it
//! hides the value for good while the hash keeps the root commitment intact.
//!
//! ## Invariants
//!
//! - The key set of a tree never changes after it is built.
//! - A node only ever moves from `Disclosed` to `Redacted`, never back.
//! - Node hashes are never altered, so a root hash computed at build time
//!   stays valid across any number of redactions.

use std::collections::BTreeMap;

use credo_core::{Hash, Nonce};
use serde::{Deserialize, Serialize};

/// Commitment to a single field.
///
/// Serializes as `{"hash": .., "nonce": ..}` when disclosed and
/// `{"hash": ..}` once redacted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommitmentNode {
    /// The nonce is still present; the field can be re-verified.
    Disclosed { hash: Hash, nonce: Nonce },
    /// The nonce was dropped with the field's value.
    Redacted { hash: Hash },
}

impl CommitmentNode {
    pub fn hash(&self) -> &Hash {
        match self {
            Self::Disclosed { hash, .. } | Self::Redacted { hash } => hash,
        }
    }

    pub fn nonce(&self) -> Option<&Nonce> {
        match self {
            Self::Disclosed { nonce, .. } => Some(nonce),
            Self::Redacted { .. } => None,
        }
    }

    pub fn is_redacted(&self) -> bool {
        matches!(self, Self::Redacted { .. })
    }

    /// Drop the nonce, keeping the hash.
    pub fn redact(&mut self) {
        if let Self::Disclosed { hash, .. } = self {
            *self = Self::Redacted { hash: hash.clone() };
        }
    }
}

/// Field name to commitment node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashTree(BTreeMap<String, CommitmentNode>);

impl HashTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, field: impl Into<String>, node: CommitmentNode) {
        self.0.insert(field.into(), node);
    }

    pub fn get(&self, field: &str) -> Option<&CommitmentNode> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CommitmentNode)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Every node hash, ascending.
    pub fn sorted_hashes(&self) -> Vec<&Hash> {
        let mut hashes: Vec<&Hash> = self.0.values().map(CommitmentNode::hash).collect();
        hashes.sort();
        hashes
    }

    /// Drop the nonce of `field`. Returns whether a nonce was removed.
    ///
    /// Calling this on an already redacted or unknown field is a no-op.
    pub fn redact(&mut self, field: &str) -> bool {
        match self.0.get_mut(field) {
            Some(node) if !node.is_redacted() => {
                node.redact();
                true
            }
            _ => false,
        }
    }
}

impl FromIterator<(String, CommitmentNode)> for HashTree {
    fn from_iter<I: IntoIterator<Item = (String, CommitmentNode)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
