//! # Solana Provider
//!
//! SHA-256 digests rendered as `0x`-prefixed hex, with the nonce appended
//! after the data. Signers are identified by their raw Ed25519 public key.

use credo_core::Hash;
use sha2::{Digest, Sha256};

use crate::blockchain::Blockchain;
use crate::ed25519::verify_hash_signature;
use crate::error::CryptoError;
use crate::provider::CryptoProvider;

/// Crypto provider for Solana credentials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolanaProvider;

impl CryptoProvider for SolanaProvider {
    fn blockchain(&self) -> Blockchain {
        Blockchain::Solana
    }

    fn digest(&self, text: &str, nonce: &str) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        hasher.update(nonce.as_bytes());
        Hash::prefixed_hex(&hasher.finalize())
    }

    fn verify_signature(&self, signature: &str, message: &Hash, expected_signer: &str) -> bool {
        verify_hash_signature(signature, message, expected_signer)
    }

    /// SHA-256 over the plain concatenation of the five values, integers in
    /// decimal.
    fn generate_credential_hash(
        &self,
        subject_address: &str,
        kyc_type: u8,
        country_of_residence: u8,
        country_of_id_issuance: u8,
        root_hash: &Hash,
    ) -> Result<Hash, CryptoError> {
        let text = format!(
            "{subject_address}{kyc_type}{country_of_residence}{country_of_id_issuance}{root_hash}"
        );
        Ok(self.digest(&text, ""))
    }
}
