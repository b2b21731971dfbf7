//! Single-byte classification codes.
//!
//! Signed digests pack the KYC type and both country tiers as `uint8`, and
//! `255` is reserved, so every code is checked against `0..=254` before it
//! reaches a digest.

use serde::{Deserialize, Serialize};

use crate::error::ClassificationError;

/// A classification code in the range `0..=254`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u8")]
pub struct ClassificationByte(u8);

impl ClassificationByte {
    /// Largest permitted code.
    pub const MAX: u8 = 254;

    pub fn new(value: u64) -> Result<Self, ClassificationError> {
        match u8::try_from(value) {
            Ok(b) if b <= Self::MAX => Ok(Self(b)),
            _ => Err(ClassificationError::InvalidByte(value)),
        }
    }

    /// Codes taken from the static tables, which never exceed `MAX`.
    pub(crate) fn from_table(value: u8) -> Self {
        debug_assert!(value <= Self::MAX);
        Self(value.min(Self::MAX))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u64> for ClassificationByte {
    type Error = ClassificationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClassificationByte> for u8 {
    fn from(b: ClassificationByte) -> Self {
        b.0
    }
}

impl std::fmt::Display for ClassificationByte {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
