//! # Credentials
//!
//! A [`Credential`] is an issuer-signed, redactable statement about a
//! subject wallet. Building one composes the level's schema, admits the
//! property bag, commits to every field, derives the classification codes
//! and checks its own integrity before returning.
//!
//! ## Security Invariants
//!
//! - The root hash covers every field hash and the subject address, and is
//!   never recomputed after build. Redaction drops a value and its nonce
//!   but keeps the hash, so the root and the issuer's signature stay valid.
//! - The issuer signs [`Credential::generate_hash`], which binds subject,
//!   KYC type, both country tiers and the root hash.
//! - `verify_*` methods answer `false` instead of failing.

use credo_core::{
    ClassificationByte, CountryTier, Hash, KycType, Properties, COUNTRY_OF_ID_ISSUANCE_KEY,
    COUNTRY_OF_RESIDENCE_KEY, WALLET_ADDRESS_KEY,
};
use credo_crypto::{
    Blockchain, CardanoProvider, CryptoProvider, EthereumProvider, HashTree, SolanaProvider,
};
use credo_schema::compose;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::commitment::{admit, redact, string_property};
use crate::config::BuildPolicy;
use crate::error::ClaimError;

/// An issuer-signed, redactable credential.
///
/// Deserializing checks the stored `blockchain` code against `P`, so a
/// credential only loads under the provider it was built with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "CredentialRecord")]
#[serde(bound(serialize = "", deserialize = "P: CryptoProvider + Default"))]
pub struct Credential<P = EthereumProvider> {
    pub properties: Properties,
    pub hash_tree: HashTree,
    pub root_hash: Hash,
    pub subject_address: String,
    pub issuer_address: Option<String>,
    pub issuer_signature: Option<String>,
    #[serde(rename = "countryOfIDIssuance")]
    pub country_of_id_issuance: ClassificationByte,
    pub country_of_residence: ClassificationByte,
    pub kyc_type: ClassificationByte,
    pub blockchain: Blockchain,
    #[serde(skip)]
    provider: P,
}

/// Serialized form of a [`Credential`], before its provider is checked.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialRecord {
    properties: Properties,
    hash_tree: HashTree,
    root_hash: Hash,
    subject_address: String,
    issuer_address: Option<String>,
    issuer_signature: Option<String>,
    #[serde(rename = "countryOfIDIssuance")]
    country_of_id_issuance: ClassificationByte,
    country_of_residence: ClassificationByte,
    kyc_type: ClassificationByte,
    blockchain: Blockchain,
}

impl<P: CryptoProvider + Default> TryFrom<CredentialRecord> for Credential<P> {
    type Error = ClaimError;

    fn try_from(record: CredentialRecord) -> Result<Self, Self::Error> {
        let provider = P::default();
        if record.blockchain != provider.blockchain() {
            return Err(ClaimError::InvariantViolation(format!(
                "{} credential cannot load under the {} provider",
                record.blockchain,
                provider.blockchain()
            )));
        }
        Ok(Self {
            properties: record.properties,
            hash_tree: record.hash_tree,
            root_hash: record.root_hash,
            subject_address: record.subject_address,
            issuer_address: record.issuer_address,
            issuer_signature: record.issuer_signature,
            country_of_id_issuance: record.country_of_id_issuance,
            country_of_residence: record.country_of_residence,
            kyc_type: record.kyc_type,
            blockchain: record.blockchain,
            provider,
        })
    }
}

impl Credential<EthereumProvider> {
    pub fn ethereum(properties: Properties, level: &str) -> Result<Self, ClaimError> {
        Self::build(EthereumProvider, properties, level)
    }
}

impl Credential<SolanaProvider> {
    pub fn solana(properties: Properties, level: &str) -> Result<Self, ClaimError> {
        Self::build(SolanaProvider, properties, level)
    }
}

impl Credential<CardanoProvider> {
    pub fn cardano(properties: Properties, level: &str) -> Result<Self, ClaimError> {
        Self::build(CardanoProvider, properties, level)
    }
}

impl<P: CryptoProvider> Credential<P> {
    /// Build an unsigned credential with the default [`BuildPolicy`].
    pub fn build(provider: P, properties: Properties, level: &str) -> Result<Self, ClaimError> {
        Self::build_with_policy(provider, properties, level, &BuildPolicy::default())
    }

    /// Build an unsigned credential.
    ///
    /// # Errors
    ///
    /// - `MissingProperty` if there is no `wallet_address`, or no country
    ///   for either tier.
    /// - `Schema` if the level is unknown or the bag does not conform.
    /// - `Classification` if the level or a country has no code.
    /// - `InvariantViolation` if the result fails its own integrity check.
    pub fn build_with_policy(
        provider: P,
        properties: Properties,
        level: &str,
        policy: &BuildPolicy,
    ) -> Result<Self, ClaimError> {
        let subject_address = string_property(&properties, WALLET_ADDRESS_KEY)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ClaimError::MissingProperty(WALLET_ADDRESS_KEY.to_string()))?;

        let schema = compose(level)?;
        let properties = admit(&schema, properties, policy)?;

        let hash_tree = provider.build_hash_tree(&properties)?;
        let root_hash = provider.calculate_root_hash(&hash_tree, Some(&subject_address));

        let country_of_id_issuance = country_tier(&properties, COUNTRY_OF_ID_ISSUANCE_KEY)?;
        let country_of_residence = country_tier(&properties, COUNTRY_OF_RESIDENCE_KEY)?;
        let kyc_type = KycType::from_level(level)?.to_byte();

        let credential = Self {
            properties,
            hash_tree,
            root_hash,
            subject_address,
            issuer_address: None,
            issuer_signature: None,
            country_of_id_issuance,
            country_of_residence,
            kyc_type,
            blockchain: provider.blockchain(),
            provider,
        };

        if !credential.verify_integrity() {
            tracing::warn!(root = %credential.root_hash, "credential failed its build self-check");
            return Err(ClaimError::InvariantViolation(format!(
                "credential {} does not verify after build",
                credential.root_hash
            )));
        }
        tracing::debug!(
            blockchain = %credential.blockchain,
            level,
            fields = credential.properties.len(),
            "credential built"
        );
        Ok(credential)
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The digest the issuer signs.
    pub fn generate_hash(&self) -> Result<Hash, ClaimError> {
        Ok(self.provider.generate_credential_hash(
            &self.subject_address,
            self.kyc_type.get(),
            self.country_of_residence.get(),
            self.country_of_id_issuance.get(),
            &self.root_hash,
        )?)
    }

    /// Attach `signer`'s signature over [`Self::generate_hash`].
    ///
    /// Nothing is stored unless the signature verifies.
    pub fn set_signature(
        &mut self,
        signature: impl Into<String>,
        signer: impl Into<String>,
    ) -> Result<(), ClaimError> {
        let (signature, signer) = (signature.into(), signer.into());
        let hash = self.generate_hash()?;
        if !self.provider.verify_signature(&signature, &hash, &signer) {
            tracing::warn!(signer = %signer, "issuer signature rejected");
            return Err(ClaimError::invalid_signature(&signature, &hash, &signer));
        }
        tracing::debug!(signer = %signer, "issuer signature attached");
        self.issuer_address = Some(signer);
        self.issuer_signature = Some(signature);
        Ok(())
    }

    /// Redact `field`. Calling it twice is harmless.
    pub fn remove_property(&mut self, field: &str) {
        redact(&mut self.properties, &mut self.hash_tree, field);
    }

    pub fn get_property(&self, field: &str) -> Option<&Value> {
        self.properties.get(field)
    }

    /// Disclosed fields re-derive, the root recomputes, and a disclosed
    /// wallet address is the subject.
    pub fn verify_integrity(&self) -> bool {
        let subject_consistent = match self.properties.get(WALLET_ADDRESS_KEY) {
            None => true,
            Some(value) => value.as_str() == Some(self.subject_address.as_str()),
        };
        subject_consistent
            && self
                .provider
                .verify_partial_hash_tree(&self.hash_tree, &self.properties)
            && self
                .provider
                .verify_root_hash(&self.hash_tree, Some(&self.subject_address), &self.root_hash)
    }

    /// `false` until signed.
    pub fn verify_signature(&self) -> bool {
        let (Some(signature), Some(issuer)) = (&self.issuer_signature, &self.issuer_address) else {
            return false;
        };
        match self.generate_hash() {
            Ok(hash) => self.provider.verify_signature(signature, &hash, issuer),
            Err(e) => {
                tracing::debug!(error = %e, "credential digest unavailable");
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
    use credo_core::ClassificationError;
    use credo_crypto::{Ed25519KeyPair, EthereumWallet};
    use serde_json::json;

    const LEVEL: &str = "plus+liveness+wallet";

    fn props(wallet: &str) -> Properties {
        credo_core::properties_from_value(json!({
            "liveness": true,
            "full_name": "JOHN CITIZEN",
            "date_of_birth": "1990-01-01",
            "place_of_birth": "Wellington",
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

    #[test]
    fn missing_wallet_is_rejected() {
        let mut p = props("0x0000000000000000000000000000000000000001");
        p.remove(WALLET_ADDRESS_KEY);
        assert!(matches!(
            Credential::ethereum(p, LEVEL),
            Err(ClaimError::MissingProperty(k)) if k == WALLET_ADDRESS_KEY
        ));
    }

    #[test]
    fn unsupported_country_is_rejected() {
        let mut p = props("0x0000000000000000000000000000000000000001");
        p.insert(COUNTRY_OF_RESIDENCE_KEY.into(), json!("XX"));
        assert!(matches!(
            Credential::ethereum(p, LEVEL),
            Err(ClaimError::Classification(ClassificationError::UnsupportedCountry(c))) if c == "XX"
        ));
    }

    #[test]
    fn unsupported_level_is_rejected() {
        let p = props("0x0000000000000000000000000000000000000001");
        // Composes, but is not in the KYC table.
        assert!(matches!(
            Credential::ethereum(p, "plus+wallet"),
            Err(ClaimError::Classification(ClassificationError::UnsupportedKycType(_)))
        ));
    }

    #[test]
    fn extras_are_pruned_by_default() {
        let mut p = props("0x0000000000000000000000000000000000000001");
        p.insert("favourite_colour".into(), json!("blue"));
        let credential = Credential::ethereum(p.clone(), LEVEL).unwrap();
        assert!(credential.get_property("favourite_colour").is_none());
        assert!(!credential.hash_tree.contains("favourite_colour"));

        let strict = Credential::build_with_policy(EthereumProvider, p, LEVEL, &BuildPolicy::strict());
        assert!(matches!(strict, Err(ClaimError::Schema(_))));
    }

    #[test]
    fn classification_codes() {
        let credential = Credential::ethereum(props("0x0000000000000000000000000000000000000001"), LEVEL).unwrap();
        assert_eq!(credential.country_of_residence.get(), 2);
        assert_eq!(credential.country_of_id_issuance.get(), 2);
        assert_eq!(credential.kyc_type.get(), 1);
        assert_eq!(credential.blockchain, Blockchain::Ethereum);
    }

    #[test]
    fn ethereum_sign_verify() {
        let issuer = EthereumWallet::generate();
        let subject = EthereumWallet::generate();
        let mut credential = Credential::ethereum(props(&subject.address()), LEVEL).unwrap();
        assert!(!credential.verify_signature());

        let hash = credential.generate_hash().unwrap();
        credential
            .set_signature(issuer.sign_hash(&hash).unwrap(), issuer.address())
            .unwrap();
        assert!(credential.verify_signature());
    }

    #[test]
    fn signature_by_other_key_is_refused() {
        let issuer = EthereumWallet::generate();
        let other = EthereumWallet::generate();
        let mut credential =
            Credential::ethereum(props("0x0000000000000000000000000000000000000001"), LEVEL).unwrap();
        let hash = credential.generate_hash().unwrap();
        let err = credential
            .set_signature(other.sign_hash(&hash).unwrap(), issuer.address())
            .unwrap_err();
        assert!(matches!(err, ClaimError::InvalidSignature { .. }));
        assert!(credential.issuer_signature.is_none());
    }

    #[test]
    fn cardano_sign_verify() {
        let issuer = Ed25519KeyPair::generate();
        let subject = Ed25519KeyPair::generate().public_key().to_hex();
        let mut credential = Credential::cardano(props(&subject), LEVEL).unwrap();
        assert_eq!(credential.blockchain, Blockchain::Cardano);
        let hash = credential.generate_hash().unwrap();
        credential
            .set_signature(issuer.sign_hash(&hash).to_hex(), issuer.public_key().to_hex())
            .unwrap();
        assert!(credential.verify_signature());
    }

    #[test]
    fn tampered_subject_breaks_integrity() {
        let mut credential =
            Credential::ethereum(props("0x0000000000000000000000000000000000000001"), LEVEL).unwrap();
        credential.subject_address = "0x0000000000000000000000000000000000000002".into();
        assert!(!credential.verify_integrity());
    }

    #[test]
    fn tampered_value_breaks_integrity() {
        let mut credential =
            Credential::ethereum(props("0x0000000000000000000000000000000000000001"), LEVEL).unwrap();
        credential
            .properties
            .insert("full_name".into(), json!("JANE CITIZEN"));
        assert!(!credential.verify_integrity());
    }

    #[test]
    fn redacted_wallet_still_verifies() {
        let mut credential =
            Credential::ethereum(props("0x0000000000000000000000000000000000000001"), LEVEL).unwrap();
        credential.remove_property(WALLET_ADDRESS_KEY);
        assert!(credential.verify_integrity());
    }

    #[test]
    fn serde_round_trip() {
        let credential =
            Credential::solana(props("0x0000000000000000000000000000000000000001"), LEVEL).unwrap();
        let value = serde_json::to_value(&credential).unwrap();
        assert_eq!(value["blockchain"], json!(3));
        assert!(value.get("hashTree").is_some());
        let back: Credential<SolanaProvider> = serde_json::from_value(value).unwrap();
        assert_eq!(back, credential);
        assert!(back.verify_integrity());
    }

    #[test]
    fn foreign_blockchain_is_refused_on_load() {
        let credential =
            Credential::solana(props("0x0000000000000000000000000000000000000001"), LEVEL).unwrap();
        let value = serde_json::to_value(&credential).unwrap();

        let err = serde_json::from_value::<Credential>(value.clone()).unwrap_err();
        assert!(err.to_string().contains("solana"), "{err}");
        assert!(serde_json::from_value::<Credential<CardanoProvider>>(value.clone()).is_err());
        assert!(serde_json::from_value::<Credential<SolanaProvider>>(value).is_ok());
    }
}
