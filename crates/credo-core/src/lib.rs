//! # credo-core — Foundational Types for Selective-Disclosure Credentials
//!
//! This crate is the leaf of the credo workspace. It defines the value
//! types every commitment is built from and the classification tables
//! embedded in signed credentials. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** Every structured value that gets hashed
//!    flows through [`CanonicalBytes::new()`], which deep-sorts object keys
//!    *and* array elements before RFC 8785 serialization. Two values that
//!    differ only in key or element order hash identically.
//!
//! 2. **String-backed digests.** [`Hash`] carries the digest in the native
//!    textual encoding of the backend that produced it. Root hashes sort
//!    and concatenate these strings, so the encoding is part of the
//!    commitment.
//!
//! 3. **Append-only tables.** [`KycType`] codes are positions in a
//!    versioned constant list. Codes already embedded in issued credentials
//!    must keep their meaning forever; the list only grows.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `credo-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod classification;
pub mod country;
pub mod digest;
pub mod error;
pub mod kyc;
pub mod property;

// Re-export primary types for ergonomic imports.
pub use canonical::{deep_sort, deep_sort_array, deep_sort_object, CanonicalBytes};
pub use classification::ClassificationByte;
pub use country::CountryTier;
pub use digest::{Hash, Nonce};
pub use error::{CanonicalizationError, ClassificationError};
pub use kyc::{canonicalize_level, KycType, SUPPORTED_KYC_LEVELS};
pub use property::{is_property_value, properties_from_value, Properties};

/// Property key holding the subject's wallet address (the owner identifier).
pub const WALLET_ADDRESS_KEY: &str = "wallet_address";

/// Property key holding the country of residence.
pub const COUNTRY_OF_RESIDENCE_KEY: &str = "residential_address_country";

/// Property key holding the country that issued the identity document.
pub const COUNTRY_OF_ID_ISSUANCE_KEY: &str = "identification_document_country";
