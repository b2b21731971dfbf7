//! # credo-crypto — Commitments and Crypto Providers
//!
//! Provides the commitment engine and its per-ledger backends:
//!
//! - **Hash trees** ([`HashTree`], [`CommitmentNode`]): one commitment per
//!   field, redactable without disturbing the root hash.
//! - **[`CryptoProvider`]**: the capability set every backend implements.
//!   Tree construction, verification and root hashing are provided methods
//!   built on a backend's digest primitive.
//! - **Backends**: [`EthereumProvider`] (Keccak-256, secp256k1 address
//!   recovery), [`SolanaProvider`] (SHA-256, Ed25519),
//!   [`CardanoProvider`] (BLAKE2b-256, Ed25519).
//! - **Signing helpers** ([`EthereumWallet`], [`Ed25519KeyPair`]) for
//!   issuers and tests.
//!
//! ## Crate Policy
//!
//! - Depends only on `credo-core` internally.
//! - No mocking of cryptographic operations in tests. All tests use real
//!   Keccak-256, SHA-256, BLAKE2b, secp256k1 and Ed25519.
//! - Signature verification returns `bool` and never panics.

pub mod blockchain;
pub mod cardano;
pub mod ed25519;
pub mod error;
pub mod ethereum;
pub mod provider;
pub mod solana;
pub mod tree;

pub use blockchain::Blockchain;
pub use cardano::CardanoProvider;
pub use ed25519::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
pub use error::CryptoError;
pub use ethereum::{EthereumProvider, EthereumWallet};
pub use provider::CryptoProvider;
pub use solana::SolanaProvider;
pub use tree::{CommitmentNode, HashTree};
