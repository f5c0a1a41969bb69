use std::fmt;

/// Custom error type for bridge operations.
#[derive(Debug)]
pub enum BridgeError {
    /// No signing agent available in the environment.
    WalletUnavailable(String),
    /// Configuration-related errors.
    ConfigError(String),
    /// Input validation errors.
    ValidationError(String),
    /// JSON-RPC / transport errors.
    RpcError(String),
    /// Errors reported by the contract itself (revert reasons).
    ContractError(String),
    /// A submitted call was mined but did not succeed.
    ConfirmationFailed(String),
    /// A submitted call was not confirmed within the polling attempt limit.
    ConfirmationTimeout(String),
    /// An operation was rejected because another one is still pending.
    Busy(String),
    /// Internal errors.
    InternalError(String),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::WalletUnavailable(msg) => write!(f, "Wallet unavailable: {}", msg),
            BridgeError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            BridgeError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            BridgeError::RpcError(msg) => write!(f, "RPC error: {}", msg),
            BridgeError::ContractError(msg) => write!(f, "Contract error: {}", msg),
            BridgeError::ConfirmationFailed(msg) => write!(f, "Confirmation failed: {}", msg),
            BridgeError::ConfirmationTimeout(msg) => write!(f, "Confirmation timed out: {}", msg),
            BridgeError::Busy(msg) => write!(f, "Operation already in progress: {}", msg),
            BridgeError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for BridgeError {}

impl BridgeError {
    /// The inner message without the variant prefix. Used when composing
    /// user-facing notices, so the most specific text available is shown.
    pub fn detail(&self) -> &str {
        match self {
            BridgeError::WalletUnavailable(msg)
            | BridgeError::ConfigError(msg)
            | BridgeError::ValidationError(msg)
            | BridgeError::RpcError(msg)
            | BridgeError::ContractError(msg)
            | BridgeError::ConfirmationFailed(msg)
            | BridgeError::ConfirmationTimeout(msg)
            | BridgeError::Busy(msg)
            | BridgeError::InternalError(msg) => msg,
        }
    }

    /// Blocking errors stop the whole session, not just one operation.
    pub fn is_blocking(&self) -> bool {
        matches!(self, BridgeError::WalletUnavailable(_) | BridgeError::ConfigError(_))
    }
}

impl From<std::io::Error> for BridgeError {
    fn from(err: std::io::Error) -> Self {
        BridgeError::ConfigError(err.to_string())
    }
}

impl From<toml::de::Error> for BridgeError {
    fn from(err: toml::de::Error) -> Self {
        BridgeError::ConfigError(err.to_string())
    }
}
