//! # Claim Error Taxonomy
//!
//! [`ClaimError`] is the error every lifecycle operation returns. Lower
//! layers convert in with `#[from]`, so a caller can still match on the
//! original schema, classification or crypto failure.
//!
//! Everything except [`ClaimError::InvariantViolation`] is a rejection of
//! caller input. An invariant violation means the builder produced an
//! entity that fails its own integrity check, which is a bug.

use credo_core::ClassificationError;
use credo_crypto::CryptoError;
use credo_schema::SchemaError;
use thiserror::Error;

use crate::ledger::LedgerError;

#[derive(Error, Debug)]
pub enum ClaimError {
    /// Schema composition failed, or the properties do not conform.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A KYC level or country has no code.
    #[error(transparent)]
    Classification(#[from] ClassificationError),

    /// Hashing or digest packing failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("invalid signature found: signature {signature}, message {message}, signer {signer}")]
    InvalidSignature {
        signature: String,
        message: String,
        signer: String,
    },

    /// Attestation preconditions are not met.
    #[error("invalid attestation request: {0}")]
    InvalidRequest(String),

    #[error("builder invariant violated: {0}")]
    InvariantViolation(String),

    #[error("missing required property: {0}")]
    MissingProperty(String),

    #[error("property bag is empty")]
    EmptyProperties,

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl ClaimError {
    pub(crate) fn invalid_signature(
        signature: &str,
        message: impl ToString,
        signer: &str,
    ) -> Self {
        Self::InvalidSignature {
            signature: signature.to_string(),
            message: message.to_string(),
            signer: signer.to_string(),
        }
    }
}
