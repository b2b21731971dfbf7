//! # credo-claims — Claim and Credential Lifecycle
//!
//! Composes the schema registry, the hash-tree engine and the crypto
//! providers into build, sign, redact and verify flows:
//!
//! - **Claim types** (`claim_type.rs`): fingerprints of a field shape,
//!   built from a KYC level or an explicit pseudo-schema.
//! - **Claims and requests** (`claim.rs`, `request.rs`): a claimer commits
//!   to a claim and signs its root hash.
//! - **Attested claims** (`attested.rs`): an attester countersigns a
//!   request, anchors it on a ledger contract and verifies the anchor.
//! - **Self-attested claims** (`self_attested.rs`): an attester signs a
//!   digest that also binds the KYC type and country tiers.
//! - **Credentials** (`credential.rs`): issuer-signed, redactable
//!   statements about a subject wallet.
//! - **Ledger** (`ledger.rs`): the contract calls anchoring relies on, and
//!   an in-memory contract.
//!
//! ## Security Invariant
//!
//! Every entity is generic over [`credo_crypto::CryptoProvider`]; nothing
//! here depends on a specific hash or signature family. Root hashes are
//! computed once at build and only ever re-checked, so redaction never
//! invalidates a signature.
//!
//! ## Crate Policy
//!
//! - Builders check their own output and fail with
//!   [`ClaimError::InvariantViolation`] rather than return an entity that
//!   does not verify.
//! - `verify_*` methods return `bool`; only builders and setters fail.
//! - Only ledger calls are async, and each runs under a caller timeout.

pub mod attested;
pub mod claim;
pub mod claim_type;
mod commitment;
pub mod config;
pub mod credential;
pub mod error;
pub mod ledger;
pub mod request;
pub mod self_attested;

pub use attested::AttestedClaim;
pub use claim::Claim;
pub use claim_type::ClaimType;
pub use config::{BuildPolicy, ConfigError, ExtraPropertyPolicy, LedgerConfig, Network};
pub use credential::Credential;
pub use error::ClaimError;
pub use ledger::{InMemoryLedger, LedgerContract, LedgerError, TxReceipt};
pub use request::AttestationRequest;
pub use self_attested::SelfAttestedClaim;
