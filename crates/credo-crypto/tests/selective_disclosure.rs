//! End-to-end commitment flow on every backend: commit, sign, redact,
//! then verify what remains.

use credo_core::{Hash, Properties};
use credo_crypto::{
    CardanoProvider, CryptoProvider, Ed25519KeyPair, EthereumProvider, EthereumWallet,
    SolanaProvider,
};
use serde_json::json;

fn bag(owner: &str) -> Properties {
    let mut props = Properties::new();
    props.insert("full_name".into(), json!("JOHN CITIZEN"));
    props.insert("residential_address_country".into(), json!("NZ"));
    props.insert("place_of_birth".into(), json!(null));
    props.insert("wallet_address".into(), json!(owner));
    props
}

fn disclose_and_verify<P: CryptoProvider>(
    provider: &P,
    owner: &str,
    sign: impl Fn(&Hash) -> String,
) {
    let mut props = bag(owner);
    let mut tree = provider.build_hash_tree(&props).unwrap();
    let root = provider.calculate_root_hash(&tree, Some(owner));
    let digest = provider
        .generate_credential_hash(owner, 1, 2, 2, &root)
        .unwrap();
    let signature = sign(&digest);
    assert!(provider.verify_signature(&signature, &digest, owner));

    tree.redact("full_name");
    props.remove("full_name");

    assert!(provider.verify_partial_hash_tree(&tree, &props));
    assert!(provider.verify_root_hash(&tree, Some(owner), &root));
    let again = provider
        .generate_credential_hash(owner, 1, 2, 2, &provider.calculate_root_hash(&tree, Some(owner)))
        .unwrap();
    assert!(provider.verify_signature(&signature, &again, owner));
}

#[test]
fn ethereum_selective_disclosure() {
    let wallet = EthereumWallet::generate();
    let owner = wallet.address();
    disclose_and_verify(&EthereumProvider, &owner, |h| wallet.sign_hash(h).unwrap());
}

#[test]
fn solana_selective_disclosure() {
    let kp = Ed25519KeyPair::generate();
    let owner = kp.public_key().to_hex();
    disclose_and_verify(&SolanaProvider, &owner, |h| kp.sign_hash(h).to_hex());
}

#[test]
fn cardano_selective_disclosure() {
    let kp = Ed25519KeyPair::generate();
    let owner = kp.public_key().to_hex();
    disclose_and_verify(&CardanoProvider, &owner, |h| kp.sign_hash(h).to_hex());
}

#[test]
fn persisted_tree_keeps_nonces_only_for_disclosed_fields() {
    let provider = EthereumProvider;
    let mut props = bag("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
    let mut tree = provider.build_hash_tree(&props).unwrap();
    tree.redact("full_name");
    props.remove("full_name");

    let persisted = serde_json::to_value(&tree).unwrap();
    assert!(persisted["full_name"].get("nonce").is_none());
    assert!(persisted["full_name"].get("hash").is_some());
    assert!(persisted["wallet_address"].get("nonce").is_some());

    let restored: credo_crypto::HashTree = serde_json::from_value(persisted).unwrap();
    assert!(provider.verify_partial_hash_tree(&restored, &props));
}
