//! Self-attested claims: an attester vouches for a request directly,
//! without a claimer signature or a ledger anchor. The signed digest
//! includes the KYC type and both country tiers, so the classification is
//! part of what is attested.

use credo_core::{
    ClassificationByte, CountryTier, Hash, KycType, Properties, COUNTRY_OF_ID_ISSUANCE_KEY,
    COUNTRY_OF_RESIDENCE_KEY,
};
use credo_crypto::{CommitmentNode, CryptoProvider, EthereumProvider, HashTree};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::claim::Claim;
use crate::claim_type::ClaimType;
use crate::commitment::{redact, string_property, verify_claim_type_commitment};
use crate::error::ClaimError;
use crate::request::AttestationRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(serialize = "", deserialize = "P: Default"))]
pub struct SelfAttestedClaim<P = EthereumProvider> {
    pub claim: Claim,
    pub claim_type_hash: CommitmentNode,
    pub claim_hash_tree: HashTree,
    pub root_hash: Hash,
    pub claimer_address: String,
    pub attester_address: String,
    pub attester_signature: Option<String>,
    #[serde(rename = "countryOfIDIssuance")]
    pub country_of_id_issuance: ClassificationByte,
    pub country_of_residence: ClassificationByte,
    pub kyc_type: ClassificationByte,
    #[serde(skip)]
    provider: P,
}

impl<P: CryptoProvider> SelfAttestedClaim<P> {
    /// Accept a request for `level` on behalf of `attester_address`.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` if the request has no owner, does not validate, or
    /// was not made against the claim type of `level`. Classification
    /// failures pass through.
    pub fn from_request(
        request: AttestationRequest<P>,
        attester_address: impl Into<String>,
        level: &str,
    ) -> Result<Self, ClaimError> {
        if request.claim.owner.is_none() || !request.validate_without_signature() {
            return Err(ClaimError::InvalidRequest(
                "attestation request has no owner or does not validate".to_string(),
            ));
        }

        let expected = ClaimType::build(request.provider(), level)?;
        if expected.hash != request.claim.claim_type_hash {
            return Err(ClaimError::InvalidRequest(format!(
                "claim type does not match level {level}"
            )));
        }

        let properties = &request.claim.properties;
        let country_of_id_issuance = country_tier(properties, COUNTRY_OF_ID_ISSUANCE_KEY)?;
        let country_of_residence = country_tier(properties, COUNTRY_OF_RESIDENCE_KEY)?;
        let kyc_type = KycType::from_level(level)?.to_byte();

        let parts = request.into_parts();
        let claimer_address = parts
            .claim
            .owner
            .clone()
            .ok_or_else(|| ClaimError::InvalidRequest("claim has no owner".to_string()))?;

        Ok(Self {
            claim: parts.claim,
            claim_type_hash: parts.claim_type_hash,
            claim_hash_tree: parts.claim_hash_tree,
            root_hash: parts.root_hash,
            claimer_address,
            attester_address: attester_address.into(),
            attester_signature: None,
            country_of_id_issuance,
            country_of_residence,
            kyc_type,
            provider: parts.provider,
        })
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The digest the attester signs.
    pub fn generate_hash(&self) -> Result<Hash, ClaimError> {
        Ok(self.provider.generate_attestation_hash(
            &self.claimer_address,
            self.kyc_type.get(),
            self.country_of_residence.get(),
            self.country_of_id_issuance.get(),
            &self.root_hash,
        )?)
    }

    /// Attach the attester's signature over [`Self::generate_hash`].
    pub fn set_signature(&mut self, signature: impl Into<String>) -> Result<(), ClaimError> {
        let signature = signature.into();
        let hash = self.generate_hash()?;
        if !self
            .provider
            .verify_signature(&signature, &hash, &self.attester_address)
        {
            tracing::warn!(signer = %self.attester_address, "self-attestation signature rejected");
            return Err(ClaimError::invalid_signature(
                &signature,
                &hash,
                &self.attester_address,
            ));
        }
        self.attester_signature = Some(signature);
        Ok(())
    }

    pub fn remove_property(&mut self, field: &str) {
        redact(&mut self.claim.properties, &mut self.claim_hash_tree, field);
    }

    pub fn get_property(&self, field: &str) -> Option<&Value> {
        self.claim.properties.get(field)
    }

    pub fn verify_integrity(&self) -> bool {
        self.provider
            .verify_partial_hash_tree(&self.claim_hash_tree, &self.claim.properties)
            && verify_claim_type_commitment(
                &self.provider,
                &self.claim_type_hash,
                &self.claim.claim_type_hash,
            )
            && self.claim.owner.as_deref() == Some(self.claimer_address.as_str())
            && self.provider.verify_claim_root_hash(
                &self.claim_hash_tree,
                self.claim_type_hash.hash(),
                Some(&self.claimer_address),
                &self.root_hash,
            )
    }

    /// `false` until signed.
    pub fn verify_signature(&self) -> bool {
        let Some(signature) = &self.attester_signature else {
            return false;
        };
        match self.generate_hash() {
            Ok(hash) => self
                .provider
                .verify_signature(signature, &hash, &self.attester_address),
            Err(e) => {
                tracing::debug!(error = %e, "self-attestation digest unavailable");
                false
            }
        }
    }
}

fn country_tier(properties: &Properties, key: &str) -> Result<ClassificationByte, ClaimError> {
    let code = string_property(properties, key)
        .ok_or_else(|| ClaimError::MissingProperty(key.to_string()))?;
    Ok(CountryTier::from_country(code)?.to_byte())
}

#[cfg(test)]
mod tests {
    use super::*;
    use credo_crypto::{Ed25519KeyPair, EthereumWallet, SolanaProvider};
    use serde_json::json;

    const LEVEL: &str = "plus+liveness+wallet";

    fn props(owner: &str) -> Properties {
        credo_core::properties_from_value(json!({
            "liveness": true,
            "full_name": "JOHN CITIZEN",
            "date_of_birth": "1990-01-01",
            "place_of_birth": null,
            "residential_address": "1 Main St",
            "residential_address_country": "NZ",
            "identification_document_country": "DE",
            "identification_document_number": "A123",
            "identification_document_type": "passport",
            "wallet_address": owner,
            "wallet_currency": "ETH"
        }))
        .unwrap()
    }

    fn request<P: CryptoProvider + Copy>(provider: P, owner: &str, level: &str) -> AttestationRequest<P> {
        let ct = ClaimType::build(&provider, level).unwrap();
        let claim = Claim::new(&ct, props(owner), Some(owner.to_string())).unwrap();
        AttestationRequest::from_claim(provider, claim).unwrap()
    }

    #[test]
    fn classification_is_derived() {
        let claimer = EthereumWallet::generate();
        let attester = EthereumWallet::generate();
        let sac = SelfAttestedClaim::from_request(
            request(EthereumProvider, &claimer.address(), LEVEL),
            attester.address(),
            LEVEL,
        )
        .unwrap();
        assert_eq!(sac.country_of_residence.get(), 2);
        assert_eq!(sac.country_of_id_issuance.get(), 1);
        assert_eq!(sac.kyc_type.get(), 1);
        assert!(sac.verify_integrity());
        assert!(!sac.verify_signature());
    }

    #[test]
    fn ethereum_signature_round_trip() {
        let claimer = EthereumWallet::generate();
        let attester = EthereumWallet::generate();
        let mut sac = SelfAttestedClaim::from_request(
            request(EthereumProvider, &claimer.address(), LEVEL),
            attester.address(),
            LEVEL,
        )
        .unwrap();
        let hash = sac.generate_hash().unwrap();
        assert_ne!(hash, sac.root_hash);
        sac.set_signature(attester.sign_hash(&hash).unwrap()).unwrap();
        assert!(sac.verify_signature());

        sac.remove_property("full_name");
        assert!(sac.verify_integrity());
        assert!(sac.verify_signature());
    }

    #[test]
    fn solana_signature_round_trip() {
        let claimer = Ed25519KeyPair::generate();
        let attester = Ed25519KeyPair::generate();
        let owner = claimer.public_key().to_hex();
        let mut sac = SelfAttestedClaim::from_request(
            request(SolanaProvider, &owner, LEVEL),
            attester.public_key().to_hex(),
            LEVEL,
        )
        .unwrap();
        let hash = sac.generate_hash().unwrap();
        sac.set_signature(attester.sign_hash(&hash).to_hex()).unwrap();
        assert!(sac.verify_signature());
    }

    #[test]
    fn level_must_match_claim_type() {
        let claimer = EthereumWallet::generate();
        let result = SelfAttestedClaim::from_request(
            request(EthereumProvider, &claimer.address(), LEVEL),
            "0x0000000000000000000000000000000000000001",
            "plus+selfie+wallet",
        );
        assert!(matches!(result, Err(ClaimError::InvalidRequest(_))));
    }

    #[test]
    fn ownerless_request_is_refused() {
        let ct = ClaimType::build(&EthereumProvider, LEVEL).unwrap();
        let claim = Claim::new(&ct, props("0x0000000000000000000000000000000000000002"), None).unwrap();
        let request = AttestationRequest::from_claim(EthereumProvider, claim).unwrap();
        assert!(matches!(
            SelfAttestedClaim::from_request(request, "0x01", LEVEL),
            Err(ClaimError::InvalidRequest(_))
        ));
    }

    #[test]
    fn wrong_attester_signature_is_refused() {
        let claimer = EthereumWallet::generate();
        let attester = EthereumWallet::generate();
        let mut sac = SelfAttestedClaim::from_request(
            request(EthereumProvider, &claimer.address(), LEVEL),
            attester.address(),
            LEVEL,
        )
        .unwrap();
        let sig = claimer.sign_hash(&sac.generate_hash().unwrap()).unwrap();
        assert!(sac.set_signature(sig).is_err());
        assert!(sac.attester_signature.is_none());
    }

    #[test]
    fn serializes_classification_as_bytes() {
        let claimer = EthereumWallet::generate();
        let sac = SelfAttestedClaim::from_request(
            request(EthereumProvider, &claimer.address(), LEVEL),
            "0x0000000000000000000000000000000000000001",
            LEVEL,
        )
        .unwrap();
        let value = serde_json::to_value(&sac).unwrap();
        assert_eq!(value["countryOfResidence"], json!(2));
        assert_eq!(value["countryOfIDIssuance"], json!(1));
        assert_eq!(value["kycType"], json!(1));
        let back: SelfAttestedClaim = serde_json::from_value(value).unwrap();
        assert_eq!(back, sac);
    }
}
