//! # Ed25519 Signing and Verification
//!
//! Key handling shared by the Solana and Cardano providers. On both ledgers
//! the signer identity is the raw 32-byte public key, so verification is a
//! direct verify-with-key rather than address recovery.
//!
//! ## Security Invariant
//!
//! - The signed message is the UTF-8 text of a [`Hash`], exactly as it is
//!   stored on the credential. Signing the decoded digest bytes instead
//!   would produce signatures no verifier accepts.
//! - Private keys are never serialized or logged. `Ed25519KeyPair` does
//!   not implement `Serialize` or expose the private key bytes.
//!
//! ## Serde
//!
//! - Public keys serialize/deserialize as hex-encoded strings.
//! - Signatures serialize/deserialize as hex-encoded strings.

use credo_core::Hash;
use ed25519_dalek::{Signer, Verifier};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CryptoError;

/// An Ed25519 public key (32 bytes).
///
/// Serializes as a hex-encoded string; the hex form is what credentials
/// carry as signer identity.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey([u8; 32]);

/// An Ed25519 signature (64 bytes). Serializes as a hex-encoded string.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Ed25519Signature([u8; 64]);

/// An Ed25519 key pair for issuers and tests.
///
/// Does not implement `Serialize`.
pub struct Ed25519KeyPair {
    signing_key: ed25519_dalek::SigningKey,
}

// ---------------------------------------------------------------------------
// Ed25519PublicKey impls
// ---------------------------------------------------------------------------

impl Ed25519PublicKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render the public key as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a public key from a 64-character hex string.
    pub fn from_hex(text: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(text.trim())
            .map_err(|e| CryptoError::InvalidPublicKey(format!("not hex: {e}")))?;
        let arr: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            CryptoError::InvalidPublicKey(format!("expected 32 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(arr))
    }

    /// Convert to an `ed25519_dalek::VerifyingKey`, checking the point.
    pub fn to_verifying_key(&self) -> Result<ed25519_dalek::VerifyingKey, CryptoError> {
        ed25519_dalek::VerifyingKey::from_bytes(&self.0)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))
    }
}

impl Serialize for Ed25519PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Ed25519PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_hex(&text).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519PublicKey({}...)", hex::encode(&self.0[..4]))
    }
}

impl std::fmt::Display for Ed25519PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// Ed25519Signature impls
// ---------------------------------------------------------------------------

impl Ed25519Signature {
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Render the signature as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a signature from a 128-character hex string.
    pub fn from_hex(text: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(text.trim())
            .map_err(|e| CryptoError::InvalidSignatureEncoding(format!("not hex: {e}")))?;
        let arr: [u8; 64] = bytes.as_slice().try_into().map_err(|_| {
            CryptoError::InvalidSignatureEncoding(format!(
                "expected 64 bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }
}

impl Serialize for Ed25519Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Ed25519Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_hex(&text).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519Signature({}...)", hex::encode(&self.0[..4]))
    }
}

impl std::fmt::Display for Ed25519Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// Ed25519KeyPair impls
// ---------------------------------------------------------------------------

impl Ed25519KeyPair {
    /// Generate a new random key pair from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        Self {
            signing_key: ed25519_dalek::SigningKey::generate(&mut csprng),
        }
    }

    /// Create a key pair from a raw 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: ed25519_dalek::SigningKey::from_bytes(seed),
        }
    }

    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a digest the way Solana and Cardano verifiers expect: over the
    /// UTF-8 bytes of its text.
    pub fn sign_hash(&self, message: &Hash) -> Ed25519Signature {
        self.sign_bytes(message.as_str().as_bytes())
    }

    pub fn sign_bytes(&self, message: &[u8]) -> Ed25519Signature {
        Ed25519Signature(self.signing_key.sign(message).to_bytes())
    }
}

impl std::fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519KeyPair(<private>)")
    }
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Verify an Ed25519 signature over raw bytes.
pub fn verify(
    message: &[u8],
    signature: &Ed25519Signature,
    public_key: &Ed25519PublicKey,
) -> Result<(), CryptoError> {
    let vk = public_key.to_verifying_key()?;
    let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    vk.verify(message, &sig)
        .map_err(|e| CryptoError::InvalidSignatureEncoding(format!("verification failed: {e}")))
}

/// Verify hex-encoded signature text over a digest's text, by a hex public
/// key. Any decoding or verification failure is `false`.
pub fn verify_hash_signature(signature: &str, message: &Hash, public_key: &str) -> bool {
    let (Ok(sig), Ok(pk)) = (
        Ed25519Signature::from_hex(signature),
        Ed25519PublicKey::from_hex(public_key),
    ) else {
        return false;
    };
    verify(message.as_str().as_bytes(), &sig, &pk).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify_hash_text() {
        let kp = Ed25519KeyPair::generate();
        let message = Hash::new("0x1234abcd");
        let sig = kp.sign_hash(&message);
        assert!(verify_hash_signature(
            &sig.to_hex(),
            &message,
            &kp.public_key().to_hex()
        ));
    }

    #[test]
    fn signature_covers_text_not_digest_bytes() {
        let kp = Ed25519KeyPair::generate();
        let message = Hash::new("0x1234abcd");
        let over_bytes = kp.sign_bytes(&[0x12, 0x34, 0xab, 0xcd]);
        assert!(!verify_hash_signature(
            &over_bytes.to_hex(),
            &message,
            &kp.public_key().to_hex()
        ));
    }

    #[test]
    fn wrong_key_fails() {
        let kp1 = Ed25519KeyPair::generate();
        let kp2 = Ed25519KeyPair::generate();
        let message = Hash::new("abcd");
        let sig = kp1.sign_hash(&message);
        assert!(!verify_hash_signature(&sig.to_hex(), &message, &kp2.public_key().to_hex()));
    }

    #[test]
    fn wrong_message_fails() {
        let kp = Ed25519KeyPair::generate();
        let sig = kp.sign_hash(&Hash::new("original"));
        assert!(!verify_hash_signature(
            &sig.to_hex(),
            &Hash::new("tampered"),
            &kp.public_key().to_hex()
        ));
    }

    #[test]
    fn malformed_inputs_verify_false() {
        let kp = Ed25519KeyPair::generate();
        let message = Hash::new("abcd");
        let sig = kp.sign_hash(&message).to_hex();
        let pk = kp.public_key().to_hex();
        assert!(!verify_hash_signature("not-hex", &message, &pk));
        assert!(!verify_hash_signature(&sig[..64], &message, &pk));
        assert!(!verify_hash_signature(&sig, &message, "aabb"));
        assert!(!verify_hash_signature(&sig, &message, &"zz".repeat(32)));
    }

    #[test]
    fn deterministic_from_seed() {
        let seed = [42u8; 32];
        let kp1 = Ed25519KeyPair::from_seed(&seed);
        let kp2 = Ed25519KeyPair::from_seed(&seed);
        assert_eq!(kp1.public_key(), kp2.public_key());
        let message = Hash::new("deterministic");
        assert_eq!(kp1.sign_hash(&message), kp2.sign_hash(&message));
    }

    #[test]
    fn hex_forms_have_expected_lengths() {
        let kp = Ed25519KeyPair::generate();
        assert_eq!(kp.public_key().to_hex().len(), 64);
        assert_eq!(kp.sign_hash(&Hash::new("x")).to_hex().len(), 128);
        let pk = Ed25519PublicKey::from_hex(&kp.public_key().to_hex()).unwrap();
        assert_eq!(pk, kp.public_key());
    }

    #[test]
    fn public_key_serde_is_hex_string() {
        let kp = Ed25519KeyPair::generate();
        let json = serde_json::to_string(&kp.public_key()).unwrap();
        assert_eq!(json.len(), 64 + 2);
        let back: Ed25519PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, kp.public_key());
    }

    #[test]
    fn invalid_hex_is_rejected() {
        assert!(matches!(
            Ed25519PublicKey::from_hex("aabb"),
            Err(CryptoError::InvalidPublicKey(_))
        ));
        assert!(matches!(
            Ed25519Signature::from_hex("not-hex"),
            Err(CryptoError::InvalidSignatureEncoding(_))
        ));
    }

    #[test]
    fn debug_does_not_leak_private_key() {
        let kp = Ed25519KeyPair::generate();
        assert_eq!(format!("{kp:?}"), "Ed25519KeyPair(<private>)");
        let debug = format!("{:?}", kp.public_key());
        assert!(debug.starts_with("Ed25519PublicKey("));
        assert!(debug.ends_with("...)"));
    }
}
