//! # Ledger Contract
//!
//! Network-attested claims are anchored on an attestation contract. The
//! claim layer only needs three calls from it, captured by
//! [`LedgerContract`]. Every call may suspend and may fail transiently;
//! callers bound each one with a timeout.
//!
//! [`InMemoryLedger`] is a deterministic in-process contract for tests and
//! local development. Its signable key is Keccak-256 over the owner's
//! address bytes followed by the root hash bytes, and it only stores a claim
//! whose signature recovers to the named attester.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use credo_core::Hash;
use credo_crypto::ethereum::{keccak256, parse_address};
use credo_crypto::{CryptoProvider, EthereumProvider};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::config::LedgerConfig;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The contract could not be reached.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    /// The contract refused the call.
    #[error("ledger rejected call: {0}")]
    Rejected(String),

    #[error("ledger call timed out after {0:?}")]
    Timeout(Duration),
}

/// Receipt of a write to the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub transaction_hash: Hash,
    /// The key the claim was stored under.
    pub signable_key: Hash,
}

/// The attestation contract calls the claim layer consumes.
#[async_trait]
pub trait LedgerContract: Send + Sync {
    /// Address the contract is deployed at.
    fn address(&self) -> &str;

    /// The key an attester signs to anchor `root_hash` for `owner`.
    async fn compute_signable_key(&self, owner: &str, root_hash: &Hash)
        -> Result<Hash, LedgerError>;

    /// Whether a claim by `owner`, anchored by `attester` with `signature`,
    /// is stored.
    async fn verify_claim(
        &self,
        owner: &str,
        attester: &str,
        signature: &str,
    ) -> Result<bool, LedgerError>;

    /// Store an anchored claim.
    async fn set_claim_with_signature(
        &self,
        owner: &str,
        attester: &str,
        root_hash: &[u8],
        signature: &str,
    ) -> Result<TxReceipt, LedgerError>;
}

/// Run a contract call under `timeout`.
pub async fn with_timeout<T, F>(timeout: Duration, call: F) -> Result<T, LedgerError>
where
    F: std::future::Future<Output = Result<T, LedgerError>>,
{
    tokio::time::timeout(timeout, call)
        .await
        .map_err(|_| LedgerError::Timeout(timeout))?
}

#[derive(Debug, Clone)]
struct StoredClaim {
    signable_key: Hash,
    signature: String,
}

/// In-process attestation contract.
#[derive(Debug)]
pub struct InMemoryLedger {
    address: String,
    claims: RwLock<HashMap<(String, String), StoredClaim>>,
    latency: Duration,
    online: bool,
}

impl InMemoryLedger {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            claims: RwLock::new(HashMap::new()),
            latency: Duration::ZERO,
            online: true,
        }
    }

    pub fn from_config(config: &LedgerConfig) -> Self {
        Self::new(config.contract_address.clone())
    }

    /// Delay every call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// A contract that fails every call with `Unavailable`.
    pub fn offline(mut self) -> Self {
        self.online = false;
        self
    }

    pub async fn stored_claims(&self) -> usize {
        self.claims.read().await.len()
    }

    async fn round_trip(&self) -> Result<(), LedgerError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.online {
            Ok(())
        } else {
            Err(LedgerError::Unavailable(self.address.clone()))
        }
    }

    fn signable_key(owner: &str, root_hash: &[u8]) -> Result<Hash, LedgerError> {
        let owner = parse_address(owner).map_err(|e| LedgerError::Rejected(e.to_string()))?;
        if root_hash.len() != 32 {
            return Err(LedgerError::Rejected(format!(
                "root hash must be 32 bytes, got {}",
                root_hash.len()
            )));
        }
        let mut packed = Vec::with_capacity(52);
        packed.extend_from_slice(&owner);
        packed.extend_from_slice(root_hash);
        Ok(Hash::prefixed_hex(&keccak256(&packed)))
    }

    fn key(owner: &str, attester: &str) -> (String, String) {
        (owner.to_ascii_lowercase(), attester.to_ascii_lowercase())
    }
}

#[async_trait]
impl LedgerContract for InMemoryLedger {
    fn address(&self) -> &str {
        &self.address
    }

    async fn compute_signable_key(
        &self,
        owner: &str,
        root_hash: &Hash,
    ) -> Result<Hash, LedgerError> {
        self.round_trip().await?;
        let root = root_hash
            .to_bytes()
            .ok_or_else(|| LedgerError::Rejected(format!("root hash is not hex: {root_hash}")))?;
        Self::signable_key(owner, &root)
    }

    async fn verify_claim(
        &self,
        owner: &str,
        attester: &str,
        signature: &str,
    ) -> Result<bool, LedgerError> {
        self.round_trip().await?;
        let claims = self.claims.read().await;
        Ok(claims
            .get(&Self::key(owner, attester))
            .is_some_and(|stored| {
                stored.signature.eq_ignore_ascii_case(signature)
                    && EthereumProvider.verify_signature(signature, &stored.signable_key, attester)
            }))
    }

    async fn set_claim_with_signature(
        &self,
        owner: &str,
        attester: &str,
        root_hash: &[u8],
        signature: &str,
    ) -> Result<TxReceipt, LedgerError> {
        self.round_trip().await?;
        let signable_key = Self::signable_key(owner, root_hash)?;
        if !EthereumProvider.verify_signature(signature, &signable_key, attester) {
            return Err(LedgerError::Rejected(
                "signature does not match attester".to_string(),
            ));
        }

        let transaction_hash = Hash::prefixed_hex(&keccak256(
            format!("{signable_key}{signature}").as_bytes(),
        ));
        self.claims.write().await.insert(
            Self::key(owner, attester),
            StoredClaim {
                signable_key: signable_key.clone(),
                signature: signature.to_string(),
            },
        );
        tracing::debug!(owner, attester, key = %signable_key, "claim stored");

        Ok(TxReceipt {
            transaction_hash,
            signable_key,
        })
    }
}
