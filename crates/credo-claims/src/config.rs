//! Ledger and build configuration.
//!
//! [`LedgerConfig`] locates the attestation contract. It can be built
//! explicitly or loaded from the environment. [`BuildPolicy`] decides how
//! builders treat properties the schema does not declare and whether an
//! empty property bag is acceptable.

use std::time::Duration;

/// Networks with a known attestation contract deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    Ropsten,
    Mainnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ropsten => "ropsten",
            Self::Mainnet => "mainnet",
        }
    }

    /// Address of the attestation contract deployed on this network.
    pub fn contract_address(&self) -> &'static str {
        match self {
            Self::Ropsten => "0x3FDC8245C0D167Ff3d8369615975cA2D8b391732",
            Self::Mainnet => "0x1A5FA65E50d503a29Ec57cD102f2e7970a6963BB",
        }
    }
}

impl std::str::FromStr for Network {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ropsten" => Ok(Self::Ropsten),
            "mainnet" => Ok(Self::Mainnet),
            _ => Err(ConfigError::UnknownNetwork(s.to_string())),
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default timeout for a single contract call.
pub const DEFAULT_LEDGER_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the attestation contract lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub network: Option<Network>,
    pub contract_address: String,
    /// Applied to each contract call individually.
    pub timeout: Duration,
}

impl LedgerConfig {
    /// Configuration for a network's well-known deployment.
    pub fn for_network(network: Network) -> Self {
        Self {
            network: Some(network),
            contract_address: network.contract_address().to_string(),
            timeout: DEFAULT_LEDGER_TIMEOUT,
        }
    }

    /// Configuration for a contract at an explicit address.
    pub fn at_address(address: impl Into<String>) -> Self {
        Self {
            network: None,
            contract_address: address.into(),
            timeout: DEFAULT_LEDGER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `CREDO_LEDGER_NETWORK`: `ropsten` or `mainnet`
    /// - `CREDO_CONTRACT_ADDRESS`: overrides the network's deployment
    /// - `CREDO_LEDGER_TIMEOUT_SECS` (default: 30)
    ///
    /// At least one of the first two is required.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let network = lookup("CREDO_LEDGER_NETWORK")
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse::<Network>())
            .transpose()?;

        let contract_address = lookup("CREDO_CONTRACT_ADDRESS")
            .filter(|s| !s.trim().is_empty())
            .or_else(|| network.map(|n| n.contract_address().to_string()))
            .ok_or(ConfigError::MissingContract)?;

        let timeout = match lookup("CREDO_LEDGER_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidTimeout(raw))?,
            None => DEFAULT_LEDGER_TIMEOUT,
        };

        Ok(Self {
            network,
            contract_address,
            timeout,
        })
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("either CREDO_CONTRACT_ADDRESS or CREDO_LEDGER_NETWORK is required")]
    MissingContract,
    #[error("unknown ledger network: {0}")]
    UnknownNetwork(String),
    #[error("invalid ledger timeout: {0}")]
    InvalidTimeout(String),
}

/// Treatment of properties the schema does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtraPropertyPolicy {
    /// Validate leniently, then drop undeclared keys.
    #[default]
    Prune,
    /// Undeclared keys are a property mismatch.
    Reject,
}

/// How builders admit a property bag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildPolicy {
    pub extra_properties: ExtraPropertyPolicy,
    /// Accept a bag that is empty after pruning. Its tree is empty and its
    /// root hash covers the owner alone.
    pub allow_empty_properties: bool,
}

impl BuildPolicy {
    pub fn strict() -> Self {
        Self {
            extra_properties: ExtraPropertyPolicy::Reject,
            allow_empty_properties: false,
        }
    }

    pub fn allowing_empty(mut self) -> Self {
        self.allow_empty_properties = true;
        self
    }
}
