//! # Error Types
//!
//! Errors raised by the foundational layer. Higher crates wrap these with
//! `#[from]` so callers can match on the original lookup failure.

use thiserror::Error;

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// A lookup into one of the classification tables missed, or a code fell
/// outside the single-byte range embedded in signed digests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassificationError {
    /// The KYC level is not present in the append-only level table.
    #[error("unsupported KYC type: {0}")]
    UnsupportedKycType(String),

    /// The country code has no assigned tier.
    #[error("unsupported country: {0}")]
    UnsupportedCountry(String),

    /// A classification code must fit in 0..=254.
    #[error("classification byte out of range: {0} (expected 0..=254)")]
    InvalidByte(u64),
}
