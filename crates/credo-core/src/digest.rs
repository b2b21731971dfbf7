//! # Digests and Nonces
//!
//! `Hash` is the textual digest every commitment is expressed in. Its
//! encoding belongs to the backend that produced it (`0x`-prefixed hex for
//! Ethereum and Solana, bare hex for Cardano). Root hashes sort and
//! concatenate these strings, so two hashes are equal only if their text is.
//!
//! `Nonce` is the per-field blinding value. A fresh nonce carries 128 bits
//! from the operating system CSPRNG; verification paths supply the stored one.

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Number of random bytes in a freshly generated nonce.
pub const NONCE_BYTES: usize = 16;

/// A digest in its backend's native textual encoding.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hash(String);

impl Hash {
    /// Wrap digest text produced by a crypto backend.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The `0x`-prefixed lowercase hex form of raw digest bytes.
    pub fn prefixed_hex(bytes: &[u8]) -> Self {
        Self(format!("0x{}", hex::encode(bytes)))
    }

    /// The bare lowercase hex form of raw digest bytes.
    pub fn bare_hex(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the hex digits (with or without `0x`) back to bytes.
    ///
    /// Returns `None` if the text is not hex.
    pub fn to_bytes(&self) -> Option<Vec<u8>> {
        let digits = self.0.strip_prefix("0x").unwrap_or(&self.0);
        hex::decode(digits).ok()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Hash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Hash {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Hash {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Blinding value mixed into a field commitment.
///
/// Nonces are only ever compared and hashed as text, so a caller-supplied
/// nonce of any form verifies as long as it matches what was committed.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Nonce(String);

impl Nonce {
    /// Draw a fresh nonce from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; NONCE_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Use a known nonce, e.g. when re-deriving a stored commitment.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// A nonce is the only secret protecting a disclosed field from dictionary
// attacks on its hash.
impl std::fmt::Debug for Nonce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Nonce([REDACTED])")
    }
}

impl std::fmt::Display for Nonce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Nonce {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_nonce_is_128_bits_of_hex() {
        let nonce = Nonce::generate();
        assert_eq!(nonce.as_str().len(), NONCE_BYTES * 2);
        assert!(nonce.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generated_nonces_differ() {
        assert_ne!(Nonce::generate(), Nonce::generate());
    }

    #[test]
    fn nonce_debug_is_redacted() {
        let nonce = Nonce::new("deadbeef");
        assert!(!format!("{nonce:?}").contains("deadbeef"));
        assert_eq!(nonce.to_string(), "deadbeef");
    }

    #[test]
    fn hash_hex_forms() {
        let bytes = [0xab, 0x01];
        assert_eq!(Hash::prefixed_hex(&bytes).as_str(), "0xab01");
        assert_eq!(Hash::bare_hex(&bytes).as_str(), "ab01");
    }

    #[test]
    fn hash_to_bytes_accepts_both_prefixes() {
        assert_eq!(Hash::new("0xab01").to_bytes(), Some(vec![0xab, 0x01]));
        assert_eq!(Hash::new("ab01").to_bytes(), Some(vec![0xab, 0x01]));
        assert_eq!(Hash::new("not hex").to_bytes(), None);
    }

    #[test]
    fn hashes_sort_by_text() {
        let mut hashes = vec![Hash::new("0xff"), Hash::new("0x0a"), Hash::new("0xb0")];
        hashes.sort();
        let text: Vec<&str> = hashes.iter().map(Hash::as_str).collect();
        assert_eq!(text, vec!["0x0a", "0xb0", "0xff"]);
    }

    #[test]
    fn serde_is_transparent() {
        let json = serde_json::to_string(&Hash::new("0x12")).unwrap();
        assert_eq!(json, "\"0x12\"");
        let nonce: Nonce = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(nonce.as_str(), "abc");
    }
}
