use ethers::signers::{LocalWallet, Signer};
use tracing::debug;

use crate::core::config::SignerConfig;
use crate::core::errors::BridgeError;

/// Load the user's signing agent from the environment described by the
/// signer configuration. The env var is checked first, then the key file.
/// Absence of both is the blocking environment-missing case.
pub fn load_signing_agent(config: &SignerConfig, chain_id: u64) -> Result<LocalWallet, BridgeError> {
    let key_hex = match std::env::var(&config.key_env) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => match &config.key_file {
            Some(path) => std::fs::read_to_string(path).map_err(|e| {
                BridgeError::WalletUnavailable(format!(
                    "could not read key file {}: {}",
                    path.display(),
                    e
                ))
            })?,
            None => {
                return Err(BridgeError::WalletUnavailable(format!(
                    "no signing key found; set {} or configure signer.key_file",
                    config.key_env
                )))
            }
        },
    };

    let wallet = wallet_from_hex_key(key_hex.trim())?.with_chain_id(chain_id);
    debug!(address = %format!("{:?}", wallet.address()), "Signing agent loaded");
    Ok(wallet)
}

/// Build a wallet from a 32-byte hex private key. Do NOT log key material.
fn wallet_from_hex_key(key_hex: &str) -> Result<LocalWallet, BridgeError> {
    let normalized = key_hex.strip_prefix("0x").or_else(|| key_hex.strip_prefix("0X")).unwrap_or(key_hex);
    if normalized.len() != 64 {
        return Err(BridgeError::WalletUnavailable(
            "signing key must be 64 hex chars (32 bytes)".to_string(),
        ));
    }
    let bytes = hex::decode(normalized)
        .map_err(|e| BridgeError::WalletUnavailable(format!("signing key is not valid hex: {}", e)))?;
    LocalWallet::from_bytes(&bytes)
        .map_err(|e| BridgeError::WalletUnavailable(format!("invalid signing key: {}", e)))
}
