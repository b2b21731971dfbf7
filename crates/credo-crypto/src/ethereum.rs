//! # Ethereum Provider
//!
//! Keccak-256 digests rendered as `0x`-prefixed hex, with the nonce packed
//! *before* the data. Signers are identified by their 20-byte address,
//! which is recovered from a 65-byte `r ‖ s ‖ v` secp256k1 signature over
//! the EIP-191 personal-message digest of the signed hash.
//!
//! ## Signed Bytes
//!
//! A hash given as `0x`-hex is signed as its decoded digest bytes, the way
//! wallets sign `arrayify(hash)`. Any other text is signed as UTF-8.
//!
//! ## Packed Layouts
//!
//! - Credential digest: `address(20) ‖ u8 ‖ u8 ‖ u8 ‖ bytes32`.
//! - Self-attestation digest: `string ‖ u8 ‖ u8 ‖ u8 ‖ string`.

use credo_core::Hash;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use sha3::{Digest, Keccak256};

use crate::blockchain::Blockchain;
use crate::error::CryptoError;
use crate::provider::CryptoProvider;

/// Crypto provider for Ethereum credentials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EthereumProvider;

impl CryptoProvider for EthereumProvider {
    fn blockchain(&self) -> Blockchain {
        Blockchain::Ethereum
    }

    fn digest(&self, text: &str, nonce: &str) -> Hash {
        let mut hasher = Keccak256::new();
        hasher.update(nonce.as_bytes());
        hasher.update(text.as_bytes());
        Hash::prefixed_hex(&hasher.finalize())
    }

    fn verify_signature(&self, signature: &str, message: &Hash, expected_signer: &str) -> bool {
        match recover_address(signature, message) {
            Ok(recovered) => recovered.eq_ignore_ascii_case(expected_signer.trim()),
            Err(e) => {
                tracing::debug!(error = %e, "ethereum signature could not be recovered");
                false
            }
        }
    }

    fn generate_credential_hash(
        &self,
        subject_address: &str,
        kyc_type: u8,
        country_of_residence: u8,
        country_of_id_issuance: u8,
        root_hash: &Hash,
    ) -> Result<Hash, CryptoError> {
        let address = parse_address(subject_address)?;
        let root = root_hash
            .to_bytes()
            .and_then(|b| <[u8; 32]>::try_from(b.as_slice()).ok())
            .ok_or_else(|| CryptoError::InvalidDigest(root_hash.to_string()))?;

        let mut packed = Vec::with_capacity(20 + 3 + 32);
        packed.extend_from_slice(&address);
        packed.extend_from_slice(&[kyc_type, country_of_residence, country_of_id_issuance]);
        packed.extend_from_slice(&root);
        Ok(Hash::prefixed_hex(&keccak256(&packed)))
    }

    fn generate_attestation_hash(
        &self,
        claimer_address: &str,
        kyc_type: u8,
        country_of_residence: u8,
        country_of_id_issuance: u8,
        root_hash: &Hash,
    ) -> Result<Hash, CryptoError> {
        let mut packed = Vec::new();
        packed.extend_from_slice(claimer_address.as_bytes());
        packed.extend_from_slice(&[kyc_type, country_of_residence, country_of_id_issuance]);
        packed.extend_from_slice(root_hash.as_str().as_bytes());
        Ok(Hash::prefixed_hex(&keccak256(&packed)))
    }
}

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// The bytes a wallet actually signs for `message`.
pub fn signable_bytes(message: &Hash) -> Vec<u8> {
    let text = message.as_str();
    match text.strip_prefix("0x").map(hex::decode) {
        Some(Ok(bytes)) => bytes,
        _ => text.as_bytes().to_vec(),
    }
}

/// EIP-191 personal-message digest:
/// `keccak256("\x19Ethereum Signed Message:\n" ‖ len ‖ message)`.
pub fn personal_message_digest(message: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(format!("\x19Ethereum Signed Message:\n{}", message.len()).as_bytes());
    hasher.update(message);
    hasher.finalize().into()
}

/// Parse a `0x`-prefixed 20-byte address. Checksum casing is not enforced.
pub fn parse_address(address: &str) -> Result<[u8; 20], CryptoError> {
    let digits = address
        .trim()
        .strip_prefix("0x")
        .ok_or_else(|| CryptoError::InvalidAddress(address.to_string()))?;
    let bytes = hex::decode(digits).map_err(|_| CryptoError::InvalidAddress(address.to_string()))?;
    <[u8; 20]>::try_from(bytes.as_slice())
        .map_err(|_| CryptoError::InvalidAddress(address.to_string()))
}

/// EIP-55 mixed-case checksum encoding of an address.
pub fn to_checksum_address(address: &[u8; 20]) -> String {
    let lower = hex::encode(address);
    let hash = keccak256(lower.as_bytes());
    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = (hash[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0f;
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn address_of(key: &VerifyingKey) -> [u8; 20] {
    let point = key.as_affine().to_encoded_point(false);
    // Skip the 0x04 uncompressed-point tag.
    let hash = keccak256(&point.as_bytes()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

/// Recover the checksummed address that produced `signature` over `message`.
pub fn recover_address(signature: &str, message: &Hash) -> Result<String, CryptoError> {
    let raw = signature.trim();
    let bytes = hex::decode(raw.strip_prefix("0x").unwrap_or(raw))
        .map_err(|e| CryptoError::InvalidSignatureEncoding(format!("not hex: {e}")))?;
    if bytes.len() != 65 {
        return Err(CryptoError::InvalidSignatureEncoding(format!(
            "expected 65 bytes, got {}",
            bytes.len()
        )));
    }

    let sig = Signature::from_slice(&bytes[..64])
        .map_err(|e| CryptoError::InvalidSignatureEncoding(e.to_string()))?;
    let v = match bytes[64] {
        27 | 28 => bytes[64] - 27,
        0 | 1 => bytes[64],
        other => {
            return Err(CryptoError::InvalidSignatureEncoding(format!(
                "invalid recovery byte {other}"
            )))
        }
    };
    let recovery_id = RecoveryId::from_byte(v)
        .ok_or_else(|| CryptoError::InvalidSignatureEncoding(format!("invalid recovery id {v}")))?;

    let digest = personal_message_digest(&signable_bytes(message));
    let key = VerifyingKey::recover_from_prehash(&digest, &sig, recovery_id)
        .map_err(|e| CryptoError::InvalidSignatureEncoding(e.to_string()))?;
    Ok(to_checksum_address(&address_of(&key)))
}

// ---------------------------------------------------------------------------
// EthereumWallet
// ---------------------------------------------------------------------------

/// A secp256k1 key able to produce personal-message signatures.
///
/// Used by issuers and tests; verification never consults it.
pub struct EthereumWallet {
    signing_key: SigningKey,
}

impl EthereumWallet {
    /// Generate a new random wallet from the OS CSPRNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut rand::rngs::OsRng),
        }
    }

    /// Load a wallet from a raw 32-byte private key.
    pub fn from_private_key(bytes: &[u8; 32]) -> Result<Self, CryptoError> {
        let signing_key = SigningKey::from_slice(bytes)
            .map_err(|e| CryptoError::InvalidPublicKey(format!("invalid private key: {e}")))?;
        Ok(Self { signing_key })
    }

    /// The wallet's EIP-55 checksummed address.
    pub fn address(&self) -> String {
        to_checksum_address(&address_of(self.signing_key.verifying_key()))
    }

    /// Sign `message` as a personal message, returning `0x` + `r ‖ s ‖ v`
    /// with `v` in {27, 28}.
    pub fn sign_hash(&self, message: &Hash) -> Result<String, CryptoError> {
        let digest = personal_message_digest(&signable_bytes(message));
        let (sig, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(&digest)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;

        let mut out = Vec::with_capacity(65);
        out.extend_from_slice(&sig.to_bytes());
        out.push(recovery_id.to_byte() + 27);
        Ok(format!("0x{}", hex::encode(out)))
    }
}

impl std::fmt::Debug for EthereumWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EthereumWallet({})", self.address())
    }
}
