//! Claim → request → attestation → ledger anchor, against the in-memory
//! contract.

use std::time::Duration;

use credo_claims::{
    AttestationRequest, AttestedClaim, Claim, ClaimError, ClaimType, InMemoryLedger,
    LedgerConfig, LedgerContract, LedgerError, Network, SelfAttestedClaim,
};
use credo_core::{properties_from_value, Properties};
use credo_crypto::{EthereumProvider, EthereumWallet};
use serde_json::json;

const LEVEL: &str = "plus+liveness+wallet";

fn properties(wallet: &str) -> Properties {
    properties_from_value(json!({
        "liveness": true,
        "full_name": "JOHN CITIZEN",
        "date_of_birth": "1990-01-01",
        "place_of_birth": null,
        "residential_address": "1 Main St",
        "residential_address_country": "NZ",
        "identification_document_country": "NZ",
        "identification_document_number": "A123",
        "identification_document_type": "passport",
        "wallet_address": wallet,
        "wallet_currency": "ETH"
    }))
    .unwrap()
}

fn signed_request(claimer: &EthereumWallet) -> AttestationRequest {
    let claim_type = ClaimType::build(&EthereumProvider, LEVEL).unwrap();
    let claim = Claim::new(
        &claim_type,
        properties(&claimer.address()),
        Some(claimer.address()),
    )
    .unwrap();
    let mut request = AttestationRequest::from_claim(EthereumProvider, claim).unwrap();
    let signature = claimer.sign_hash(&request.root_hash).unwrap();
    request.set_claimer_signature(signature).unwrap();
    request
}

async fn anchored_claim(
    ledger: &InMemoryLedger,
    claimer: &EthereumWallet,
    attester: &EthereumWallet,
) -> AttestedClaim {
    let mut attested = AttestedClaim::from_request(signed_request(claimer)).unwrap();
    let signature = attester.sign_hash(&attested.root_hash).unwrap();
    attested
        .set_attester_signature(signature, attester.address())
        .unwrap();

    let key = ledger
        .compute_signable_key(&attested.claimer_address, &attested.root_hash)
        .await
        .unwrap();
    let anchor_signature = attester.sign_hash(&key).unwrap();
    attested.set_anchor(key, anchor_signature).unwrap();
    attested
}

fn config() -> LedgerConfig {
    LedgerConfig::for_network(Network::Ropsten).with_timeout(Duration::from_secs(2))
}

#[tokio::test]
async fn publish_then_verify_network() {
    let config = config();
    let ledger = InMemoryLedger::from_config(&config);
    let claimer = EthereumWallet::generate();
    let attester = EthereumWallet::generate();
    let attested = anchored_claim(&ledger, &claimer, &attester).await;

    assert!(attested.verify_integrity());
    assert!(attested.verify_anchor_integrity());
    assert!(!attested.verify_network(&ledger, config.timeout).await);

    let receipt = attested.publish(&ledger, config.timeout).await.unwrap();
    assert_eq!(Some(&receipt.signable_key), attested.attested_claim_hash.as_ref());
    assert!(attested.verify_network(&ledger, config.timeout).await);
}

#[tokio::test]
async fn redaction_does_not_affect_the_anchor() {
    let config = config();
    let ledger = InMemoryLedger::from_config(&config);
    let claimer = EthereumWallet::generate();
    let attester = EthereumWallet::generate();
    let mut attested = anchored_claim(&ledger, &claimer, &attester).await;
    attested.publish(&ledger, config.timeout).await.unwrap();

    attested.remove_property("date_of_birth");
    attested.remove_property("identification_document_number");
    assert!(attested.verify_integrity());
    assert!(attested.verify_network(&ledger, config.timeout).await);
}

#[tokio::test]
async fn dyn_contract_is_accepted() {
    let config = config();
    let ledger = InMemoryLedger::from_config(&config);
    let claimer = EthereumWallet::generate();
    let attester = EthereumWallet::generate();
    let attested = anchored_claim(&ledger, &claimer, &attester).await;

    let contract: &dyn LedgerContract = &ledger;
    attested.publish(contract, config.timeout).await.unwrap();
    assert!(attested.verify_network(contract, config.timeout).await);
}

#[tokio::test]
async fn unanchored_claim_cannot_publish() {
    let ledger = InMemoryLedger::from_config(&config());
    let claimer = EthereumWallet::generate();
    let attested = AttestedClaim::from_request(signed_request(&claimer)).unwrap();
    assert!(matches!(
        attested.publish(&ledger, Duration::from_secs(1)).await,
        Err(ClaimError::InvalidRequest(_))
    ));
    assert!(!attested.verify_network(&ledger, Duration::from_secs(1)).await);
}

#[tokio::test]
async fn anchor_from_another_contract_fails_network_check() {
    let config = config();
    let ledger = InMemoryLedger::from_config(&config);
    let claimer = EthereumWallet::generate();
    let attester = EthereumWallet::generate();
    let mut attested = anchored_claim(&ledger, &claimer, &attester).await;
    attested.publish(&ledger, config.timeout).await.unwrap();

    // A key the contract would never derive for this claim, signed properly.
    let foreign = credo_core::Hash::from(
        "0x2222222222222222222222222222222222222222222222222222222222222222",
    );
    let signature = attester.sign_hash(&foreign).unwrap();
    attested.set_anchor(foreign, signature).unwrap();
    assert!(attested.verify_anchor_integrity());
    assert!(!attested.verify_network(&ledger, config.timeout).await);
}

#[tokio::test]
async fn unreachable_or_slow_contract_is_false_not_fatal() {
    let claimer = EthereumWallet::generate();
    let attester = EthereumWallet::generate();
    let healthy = InMemoryLedger::from_config(&config());
    let attested = anchored_claim(&healthy, &claimer, &attester).await;
    attested.publish(&healthy, Duration::from_secs(2)).await.unwrap();

    let offline = InMemoryLedger::from_config(&config()).offline();
    assert!(!attested.verify_network(&offline, Duration::from_secs(2)).await);
    assert!(matches!(
        attested.publish(&offline, Duration::from_secs(2)).await,
        Err(ClaimError::Ledger(LedgerError::Unavailable(_)))
    ));

    let slow = InMemoryLedger::from_config(&config()).with_latency(Duration::from_millis(500));
    assert!(!attested.verify_network(&slow, Duration::from_millis(10)).await);
    assert!(matches!(
        attested.publish(&slow, Duration::from_millis(10)).await,
        Err(ClaimError::Ledger(LedgerError::Timeout(_)))
    ));
}

#[test]
fn self_attestation_flow() {
    let claimer = EthereumWallet::generate();
    let attester = EthereumWallet::generate();

    let claim_type = ClaimType::build(&EthereumProvider, LEVEL).unwrap();
    let claim = Claim::new(
        &claim_type,
        properties(&claimer.address()),
        Some(claimer.address()),
    )
    .unwrap();
    let request = AttestationRequest::from_claim(EthereumProvider, claim).unwrap();
    assert!(request.validate_without_signature());

    let mut sac = SelfAttestedClaim::from_request(request, attester.address(), "wallet+liveness+plus")
        .unwrap();
    assert_eq!(sac.country_of_residence.get(), 2);
    assert_eq!(sac.kyc_type.get(), 1);

    let hash = sac.generate_hash().unwrap();
    sac.set_signature(attester.sign_hash(&hash).unwrap()).unwrap();
    sac.remove_property("full_name");
    assert!(sac.verify_integrity());
    assert!(sac.verify_signature());
}
