use async_trait::async_trait;
use ethers::types::U256;
use serde::{Deserialize, Serialize};

use crate::core::errors::BridgeError;

/// Handle for a submitted state-changing call, identified by its
/// transaction hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmittedCall {
    pub tx_hash: String,
}

/// Status of a submitted call as reported by the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CallStatus {
    Pending,
    Confirmed,
    Failed,
    Unknown,
}

/// Token metadata read from the contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Interface to the remote token ledger. Everything the bridge session does
/// against the deployed contract goes through this trait, which keeps the
/// session testable against a recording fake.
#[async_trait]
pub trait TokenLedger: Send + Sync {
    /// Read the token balance of an account.
    async fn balance_of(&self, account: &str) -> Result<U256, BridgeError>;

    /// Submit a verify-and-mint call crediting `recipient` with `quantity`
    /// tokens for the given waste category.
    async fn verify_and_mint(
        &self,
        recipient: &str,
        quantity: u128,
        category: &str,
    ) -> Result<SubmittedCall, BridgeError>;

    /// Submit a redeem (burn) call for the caller's own tokens.
    async fn redeem(&self, quantity: u128) -> Result<SubmittedCall, BridgeError>;

    /// Submit a plain token transfer.
    async fn transfer(&self, to: &str, quantity: u128) -> Result<SubmittedCall, BridgeError>;

    /// Grant the verifier role to an account.
    async fn add_verifier(&self, account: &str) -> Result<SubmittedCall, BridgeError>;

    /// Revoke the verifier role from an account.
    async fn remove_verifier(&self, account: &str) -> Result<SubmittedCall, BridgeError>;

    /// Read name/symbol/decimals in one go.
    async fn token_metadata(&self) -> Result<TokenMetadata, BridgeError>;

    /// Block until the submitted call is confirmed by the ledger, or fail
    /// with the most specific error available.
    async fn await_confirmation(&self, call: &SubmittedCall) -> Result<(), BridgeError>;
}
