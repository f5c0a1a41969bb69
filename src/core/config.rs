use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::errors::BridgeError;

/// Ledger network configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub name: String,
    pub rpc_url: String,
    pub chain_id: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: "localnet".to_string(),
            rpc_url: "http://127.0.0.1:8545".to_string(),
            chain_id: 31337,
        }
    }
}

/// The deployed TrashCoin contract to bind against.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractConfig {
    /// Contract address; must be set to the deployed address.
    #[serde(default)]
    pub address: String,
}

/// Where the signing key material comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignerConfig {
    /// Environment variable holding a 32-byte hex private key.
    #[serde(default = "SignerConfig::default_key_env")]
    pub key_env: String,
    /// Fallback: file containing the hex private key.
    #[serde(default)]
    pub key_file: Option<PathBuf>,
}

impl SignerConfig {
    fn default_key_env() -> String {
        "TRASHCOIN_PRIVATE_KEY".to_string()
    }
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self { key_env: Self::default_key_env(), key_file: None }
    }
}

/// Receipt polling parameters for confirmation waits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmationConfig {
    #[serde(default = "ConfirmationConfig::default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "ConfirmationConfig::default_max_attempts")]
    pub max_attempts: u32,
}

impl ConfirmationConfig {
    fn default_poll_interval_ms() -> u64 {
        2_000
    }
    fn default_max_attempts() -> u32 {
        60
    }
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: Self::default_poll_interval_ms(),
            max_attempts: Self::default_max_attempts(),
        }
    }
}

/// Bridge configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub contract: ContractConfig,
    #[serde(default)]
    pub signer: SignerConfig,
    #[serde(default)]
    pub confirmation: ConfirmationConfig,
}

impl BridgeConfig {
    /// Load configuration from a toml file, then apply environment overrides
    /// (TRASHCOIN_RPC_URL, TRASHCOIN_CONTRACT).
    pub fn load(path: &Path) -> Result<Self, BridgeError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: BridgeConfig = toml::from_str(&content)?;
        config.apply_env_overrides();
        info!(
            network = %config.network.name,
            rpc_url = %config.network.rpc_url,
            "Loaded bridge configuration"
        );
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("TRASHCOIN_RPC_URL") {
            self.network.rpc_url = url;
        }
        if let Ok(addr) = std::env::var("TRASHCOIN_CONTRACT") {
            self.contract.address = addr;
        }
    }

    /// Default configuration with environment overrides applied. Used when no
    /// config file is present.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = BridgeConfig::default();
        assert_eq!(cfg.network.chain_id, 31337);
        assert_eq!(cfg.network.rpc_url, "http://127.0.0.1:8545");
        assert!(cfg.contract.address.is_empty());
        assert_eq!(cfg.signer.key_env, "TRASHCOIN_PRIVATE_KEY");
        assert_eq!(cfg.confirmation.poll_interval_ms, 2_000);
        assert_eq!(cfg.confirmation.max_attempts, 60);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let cfg: BridgeConfig = toml::from_str(
            r#"
            [contract]
            address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.contract.address, "0x5FbDB2315678afecb367f032d93F642f64180aa3");
        assert_eq!(cfg.network.name, "localnet");
        assert_eq!(cfg.confirmation.max_attempts, 60);
    }
}
