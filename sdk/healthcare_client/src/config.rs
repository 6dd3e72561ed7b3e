//! Client configuration.
//!
//! The contract id is configuration, not code: it is read from JSON or from
//! `HEALTHCARE_*` environment variables and validated before use.

use serde::{Deserialize, Serialize};

use crate::address::ContractId;
use crate::errors::ClientError;

pub const DEFAULT_NETWORK_PASSPHRASE: &str = "Standalone Network ; February 2017";
pub const DEFAULT_LEDGER_CLOSE_SECONDS: u64 = 5;

pub const ENV_CONTRACT_ID: &str = "HEALTHCARE_CONTRACT_ID";
pub const ENV_NETWORK_PASSPHRASE: &str = "HEALTHCARE_NETWORK_PASSPHRASE";
pub const ENV_LEDGER_CLOSE_SECONDS: &str = "HEALTHCARE_LEDGER_CLOSE_SECONDS";

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Strkey of the deployed records contract.
    pub contract_id: String,
    #[serde(default = "default_network_passphrase")]
    pub network_passphrase: String,
    #[serde(default = "default_ledger_close_seconds")]
    pub ledger_close_seconds: u64,
}

fn default_network_passphrase() -> String {
    DEFAULT_NETWORK_PASSPHRASE.to_string()
}

fn default_ledger_close_seconds() -> u64 {
    DEFAULT_LEDGER_CLOSE_SECONDS
}

impl ClientConfig {
    pub fn new(contract_id: impl Into<String>) -> Self {
        Self {
            contract_id: contract_id.into(),
            network_passphrase: default_network_passphrase(),
            ledger_close_seconds: DEFAULT_LEDGER_CLOSE_SECONDS,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ClientError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| ClientError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from a variable lookup, applying defaults for
    /// everything except the contract id.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let contract_id = lookup(ENV_CONTRACT_ID)
            .ok_or_else(|| ClientError::Config(format!("{ENV_CONTRACT_ID} is not set")))?;
        let mut config = Self::new(contract_id);
        if let Some(passphrase) = lookup(ENV_NETWORK_PASSPHRASE) {
            config.network_passphrase = passphrase;
        }
        if let Some(raw) = lookup(ENV_LEDGER_CLOSE_SECONDS) {
            config.ledger_close_seconds = raw.trim().parse().map_err(|_| {
                ClientError::Config(format!("{ENV_LEDGER_CLOSE_SECONDS} must be an integer"))
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        self.contract_id()?;
        if self.network_passphrase.trim().is_empty() {
            return Err(ClientError::Config("network passphrase is empty".into()));
        }
        if self.ledger_close_seconds == 0 {
            return Err(ClientError::Config(
                "ledger close time must be at least one second".into(),
            ));
        }
        Ok(())
    }

    pub fn contract_id(&self) -> Result<ContractId, ClientError> {
        ContractId::parse(&self.contract_id)
            .map_err(|err| ClientError::Config(format!("contract id: {err}")))
    }
}
