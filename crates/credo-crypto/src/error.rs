//! # Cryptographic Error Types
//!
//! Structured errors for hashing, key parsing and signing in `credo-crypto`.
//! Signature *verification* never returns these: providers answer `false`
//! for anything they cannot verify.

use credo_core::CanonicalizationError;
use thiserror::Error;

/// Errors from cryptographic operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// A term could not be turned into hashable text.
    #[error("invalid hashing: {0}")]
    InvalidHashing(#[from] CanonicalizationError),

    /// An address could not be parsed for a packed digest.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// A digest is not in the shape a packed layout requires.
    #[error("invalid digest: {0}")]
    InvalidDigest(String),

    /// Public key bytes are malformed or not on the curve.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Signature text is not in the backend's expected encoding.
    #[error("invalid signature encoding: {0}")]
    InvalidSignatureEncoding(String),

    /// The signing backend refused to sign.
    #[error("signing failed: {0}")]
    SigningFailed(String),
}
