//! # Cardano Provider
//!
//! BLAKE2b-256 digests rendered as bare lowercase hex, with the nonce
//! appended after the data. Signers are identified by their raw Ed25519
//! public key.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use credo_core::Hash;

use crate::blockchain::Blockchain;
use crate::ed25519::verify_hash_signature;
use crate::error::CryptoError;
use crate::provider::CryptoProvider;

type Blake2b256 = Blake2b<U32>;

/// Crypto provider for Cardano credentials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardanoProvider;

impl CryptoProvider for CardanoProvider {
    fn blockchain(&self) -> Blockchain {
        Blockchain::Cardano
    }

    fn digest(&self, text: &str, nonce: &str) -> Hash {
        let mut hasher = Blake2b256::new();
        hasher.update(text.as_bytes());
        hasher.update(nonce.as_bytes());
        Hash::bare_hex(&hasher.finalize())
    }

    fn verify_signature(&self, signature: &str, message: &Hash, expected_signer: &str) -> bool {
        verify_hash_signature(signature, message, expected_signer)
    }

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
