//! Ledger ecosystems a credential can be issued for.

use serde::{Deserialize, Serialize};

/// The ledger family a credential's digests and signatures belong to.
///
/// Serialized as its numeric code, which is stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Blockchain {
    Ethereum = 1,
    Cardano = 2,
    Solana = 3,
}

impl Blockchain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ethereum => "ethereum",
            Self::Cardano => "cardano",
            Self::Solana => "solana",
        }
    }
}

impl From<Blockchain> for u8 {
    fn from(b: Blockchain) -> Self {
        b as u8
    }
}

impl TryFrom<u8> for Blockchain {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Ethereum),
            2 => Ok(Self::Cardano),
            3 => Ok(Self::Solana),
            other => Err(format!("unknown blockchain code {other}")),
        }
    }
}

impl std::fmt::Display for Blockchain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(u8::from(Blockchain::Ethereum), 1);
        assert_eq!(u8::from(Blockchain::Cardano), 2);
        assert_eq!(u8::from(Blockchain::Solana), 3);
    }

    #[test]
    fn serializes_as_number() {
        assert_eq!(serde_json::to_string(&Blockchain::Solana).unwrap(), "3");
        let b: Blockchain = serde_json::from_str("2").unwrap();
        assert_eq!(b, Blockchain::Cardano);
        assert!(serde_json::from_str::<Blockchain>("9").is_err());
    }
}
