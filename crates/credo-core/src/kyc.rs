//! # KYC Types — Append-Only Level Encoding
//!
//! A KYC level is a `+`-joined set of capability fragments, such as
//! `plus+liveness+wallet`. Signed credentials carry the level as a one-byte
//! code: one plus the level's position in [`SUPPORTED_KYC_LEVELS`].
//!
//! ## Security Invariant
//!
//! Codes are embedded in issued credentials and verified forever after.
//! The table may only grow at the end. Reordering, removing or editing an
//! existing entry silently changes the meaning of every credential issued
//! under that code. `tests::existing_codes_are_stable` pins every entry.
//!
//! Levels are compared in canonical form (fragments sorted, then joined),
//! so `wallet+plus+liveness` and `plus+liveness+wallet` are the same level.

use serde::{Deserialize, Serialize};

use crate::classification::ClassificationByte;
use crate::error::ClassificationError;

/// Supported levels in canonical form. Append only.
pub const SUPPORTED_KYC_LEVELS: &[&str] = &[
    "liveness+plus+wallet",
    "liveness+plus+sow+wallet",
    "plus+selfie+wallet",
    "plus+selfie+sow+wallet",
    "accreditation+liveness+plus+wallet",
    "accreditation+liveness+plus+sow+wallet",
    "accreditation+plus+selfie+wallet",
    "accreditation+plus+selfie+sow+wallet",
];

/// Sort a level's fragments so that fragment order does not matter.
///
/// Empty fragments (from `a++b` or a trailing `+`) are dropped.
pub fn canonicalize_level(level: &str) -> String {
    let mut fragments: Vec<&str> = level
        .split('+')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect();
    fragments.sort_unstable();
    fragments.join("+")
}

/// A 1-based code into [`SUPPORTED_KYC_LEVELS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KycType(u8);

impl KycType {
    /// Encode a level.
    ///
    /// # Errors
    ///
    /// `UnsupportedKycType` if the canonical level is not in the table.
    pub fn from_level(level: &str) -> Result<Self, ClassificationError> {
        let canonical = canonicalize_level(level);
        SUPPORTED_KYC_LEVELS
            .iter()
            .position(|l| *l == canonical)
            .and_then(|idx| u8::try_from(idx + 1).ok())
            .map(Self)
            .ok_or_else(|| ClassificationError::UnsupportedKycType(level.to_string()))
    }

    /// Non-failing existence check.
    pub fn is_supported(level: &str) -> bool {
        Self::from_level(level).is_ok()
    }

    /// The canonical level this code stands for.
    pub fn level(self) -> Option<&'static str> {
        SUPPORTED_KYC_LEVELS
            .get(usize::from(self.0).checked_sub(1)?)
            .copied()
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn to_byte(self) -> ClassificationByte {
        ClassificationByte::from_table(self.0)
    }
}

impl std::fmt::Display for KycType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
