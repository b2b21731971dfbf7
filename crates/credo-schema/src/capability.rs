//! # Capability Fragments
//!
//! Each KYC capability contributes a fixed set of fields. A level is the
//! `+`-joined list of capabilities it covers, and its schema is the sorted
//! merge of their fragments.

use credo_core::kyc::canonicalize_level;

use crate::schema::{JsonType, PropertySpec, Schema};
use crate::validate::SchemaError;

/// A known capability fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    Accreditation,
    Basic,
    Liveness,
    Plus,
    Selfie,
    Sow,
    Wallet,
}

impl Capability {
    pub const ALL: [Capability; 7] = [
        Self::Accreditation,
        Self::Basic,
        Self::Liveness,
        Self::Plus,
        Self::Selfie,
        Self::Sow,
        Self::Wallet,
    ];

    /// Parse a level fragment. `wallet-eth` is an alias of `wallet`.
    pub fn from_fragment(fragment: &str) -> Option<Self> {
        match fragment {
            "accreditation" => Some(Self::Accreditation),
            "basic" => Some(Self::Basic),
            "liveness" => Some(Self::Liveness),
            "plus" => Some(Self::Plus),
            "selfie" => Some(Self::Selfie),
            "sow" => Some(Self::Sow),
            "wallet" | "wallet-eth" => Some(Self::Wallet),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accreditation => "accreditation",
            Self::Basic => "basic",
            Self::Liveness => "liveness",
            Self::Plus => "plus",
            Self::Selfie => "selfie",
            Self::Sow => "sow",
            Self::Wallet => "wallet",
        }
    }

    /// The fields this capability contributes.
    pub fn schema(&self) -> Schema {
        use JsonType::{Boolean, String as Str};

        match self {
            Self::Liveness => fragment(&[("liveness", one(Boolean))], &["liveness"]),
            Self::Basic => fragment(
                &[
                    ("residential_address_country", one(Str)),
                    ("date_of_birth", one(Str)),
                    ("full_name", one(Str)),
                    ("identification_document_country", one(Str)),
                    ("identification_document_number", one(Str)),
                    ("identification_document_type", one(Str)),
                ],
                &[
                    "residential_address_country",
                    "date_of_birth",
                    "full_name",
                    "identification_document_type",
                    "identification_document_number",
                ],
            ),
            Self::Plus => fragment(
                &[
                    ("place_of_birth", nullable(Str)),
                    ("residential_address", one(Str)),
                    ("residential_address_country", one(Str)),
                    ("date_of_birth", one(Str)),
                    ("full_name", one(Str)),
                    ("identification_document_country", one(Str)),
                    ("identification_document_number", one(Str)),
                    ("identification_document_type", one(Str)),
                ],
                &[
                    "residential_address",
                    "residential_address_country",
                    "date_of_birth",
                    "full_name",
                    "identification_document_type",
                    "identification_document_number",
                    "identification_document_country",
                ],
            ),
            Self::Wallet => fragment(
                &[("wallet_address", one(Str)), ("wallet_currency", one(Str))],
                &["wallet_currency", "wallet_address"],
            ),
            // A selfie adds a proof file, not fields.
            Self::Selfie => Schema::default(),
            Self::Sow => fragment(
                &[
                    ("sow_estimated_net_worth_currency", one(Str)),
                    ("sow_estimated_net_worth_value", one(Str)),
                    ("sow_type", one(Str)),
                ],
                &[
                    "sow_type",
                    "sow_estimated_net_worth_value",
                    "sow_estimated_net_worth_currency",
                ],
            ),
            Self::Accreditation => fragment(&[("accredited_investor", nullable(Boolean))], &[]),
        }
    }
}

fn one(ty: JsonType) -> PropertySpec {
    PropertySpec::new(ty)
}

fn nullable(ty: JsonType) -> PropertySpec {
    PropertySpec::union(&[ty, JsonType::Null])
}

fn fragment(fields: &[(&str, PropertySpec)], required: &[&str]) -> Schema {
    Schema {
        properties: fields
            .iter()
            .map(|(name, spec)| (name.to_string(), spec.clone()))
            .collect(),
        required: required.iter().map(|s| s.to_string()).collect(),
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compose the schema for a `+`-joined level.
///
/// Fragments are merged in sorted order, so the result does not depend on
/// how the level was written.
///
/// # Errors
///
/// `UnsupportedKycLevel` if any fragment is unknown or the composition
/// declares no fields at all.
pub fn compose(level: &str) -> Result<Schema, SchemaError> {
    let canonical = canonicalize_level(level);
    let mut schema = Schema::default();
    for name in canonical.split('+').filter(|f| !f.is_empty()) {
        let capability = Capability::from_fragment(name)
            .ok_or_else(|| SchemaError::UnsupportedKycLevel(level.to_string()))?;
        schema.merge(&capability.schema());
    }
    if schema.is_empty() {
        return Err(SchemaError::UnsupportedKycLevel(level.to_string()));
    }
    Ok(schema)
}
