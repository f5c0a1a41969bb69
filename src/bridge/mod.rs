//! The Wallet-Contract Bridge: one session object owning the signing
//! connection, the contract binding, and the display surface.
//!
//! The session can only be built from an established ledger connection, so
//! "binding before connection" is unrepresentable. State-changing operations
//! run under a single-flight guard; a second invocation while one is pending
//! is rejected instead of interleaving.

pub mod surface;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use crate::blockchain::{ContractClient, SubmittedCall, TokenLedger, TokenMetadata};
use crate::core::config::BridgeConfig;
use crate::core::errors::BridgeError;
use crate::core::validation::{validate_category, validate_ledger_address, validate_quantity};

pub use surface::{Surface, TerminalSurface};

/// A connected bridge session.
pub struct BridgeSession<L: TokenLedger> {
    ledger: L,
    account: String,
    surface: Arc<dyn Surface>,
    in_flight: AtomicBool,
}

/// Releases the session's single-flight guard when the operation finishes.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl BridgeSession<ContractClient> {
    /// Connect the user's wallet and bind the contract. On success the
    /// account panel is rendered and one balance refresh is performed.
    /// A missing signing agent produces a blocking notice and constructs
    /// nothing; any other failure produces a generic connection notice.
    pub async fn connect(
        config: &BridgeConfig,
        surface: Arc<dyn Surface>,
    ) -> Result<Self, BridgeError> {
        let ledger = match ContractClient::connect(config).await {
            Ok(ledger) => ledger,
            Err(err) => {
                if err.is_blocking() {
                    surface.notify(&err.to_string());
                } else {
                    warn!(error = %err, "Wallet connection failed");
                    surface.notify("Could not connect wallet.");
                }
                return Err(err);
            }
        };
        let account = ledger.account_display();
        info!(account = %account, network = %ledger.network_name(), "Wallet connected");
        let session = Self::with_ledger(ledger, account, surface);
        session.surface.show_account(&session.account);
        session.refresh_balance().await;
        Ok(session)
    }
}

impl<L: TokenLedger> BridgeSession<L> {
    /// Assemble a session from an already-established ledger connection.
    pub fn with_ledger(ledger: L, account: String, surface: Arc<dyn Surface>) -> Self {
        Self { ledger, account, surface, in_flight: AtomicBool::new(false) }
    }

    /// The authorized account address.
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Re-read the account balance and render it. Read failures are logged
    /// and the displayed value is left as of the last successful read; no
    /// user-facing notice is produced.
    pub async fn refresh_balance(&self) {
        match self.ledger.balance_of(&self.account).await {
            Ok(balance) => self.surface.show_balance(&balance.to_string()),
            Err(err) => warn!(error = %err, "Balance refresh failed"),
        }
    }

    /// Validate the three mint inputs in order (address, quantity,
    /// category), then submit verifyAndMint, await confirmation, report and
    /// refresh the balance once.
    pub async fn verify_and_mint(
        &self,
        recipient: &str,
        quantity: &str,
        category: &str,
    ) -> Result<(), BridgeError> {
        let recipient = recipient.trim();
        if let Err(err) = validate_ledger_address(recipient) {
            self.surface.notify(err.detail());
            return Err(err);
        }
        let quantity = match validate_quantity(quantity) {
            Ok(q) => q,
            Err(err) => {
                self.surface.notify(err.detail());
                return Err(err);
            }
        };
        let category = match validate_category(category) {
            Ok(c) => c.to_string(),
            Err(err) => {
                self.surface.notify(err.detail());
                return Err(err);
            }
        };

        let _guard = self.begin("verify-and-mint")?;
        match self.submit_mint(recipient, quantity, &category).await {
            Ok(()) => {
                self.surface.notify("Verification recorded and tokens minted.");
                self.refresh_balance().await;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "verify-and-mint failed");
                self.surface.notify(&format!("Transaction failed: {}", err.detail()));
                Err(err)
            }
        }
    }

    async fn submit_mint(
        &self,
        recipient: &str,
        quantity: u128,
        category: &str,
    ) -> Result<(), BridgeError> {
        let call = self.ledger.verify_and_mint(recipient, quantity, category).await?;
        self.confirm(&call).await
    }

    /// Validate the quantity, then submit redeem, await confirmation,
    /// report and refresh the balance once.
    pub async fn redeem_tokens(&self, quantity: &str) -> Result<(), BridgeError> {
        let quantity = match validate_quantity(quantity) {
            Ok(q) => q,
            Err(err) => {
                self.surface.notify(err.detail());
                return Err(err);
            }
        };

        let _guard = self.begin("redeem")?;
        let result = match self.ledger.redeem(quantity).await {
            Ok(call) => self.confirm(&call).await,
            Err(err) => Err(err),
        };
        match result {
            Ok(()) => {
                self.surface.notify("Tokens redeemed.");
                self.refresh_balance().await;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "redeem failed");
                self.surface.notify(&format!("Redeem failed: {}", err.detail()));
                Err(err)
            }
        }
    }

    /// Transfer tokens to another account.
    pub async fn transfer_tokens(&self, to: &str, quantity: &str) -> Result<(), BridgeError> {
        let to = to.trim();
        if let Err(err) = validate_ledger_address(to) {
            self.surface.notify(err.detail());
            return Err(err);
        }
        let quantity = match validate_quantity(quantity) {
            Ok(q) => q,
            Err(err) => {
                self.surface.notify(err.detail());
                return Err(err);
            }
        };

        let _guard = self.begin("transfer")?;
        let result = match self.ledger.transfer(to, quantity).await {
            Ok(call) => self.confirm(&call).await,
            Err(err) => Err(err),
        };
        match result {
            Ok(()) => {
                self.surface.notify("Tokens transferred.");
                self.refresh_balance().await;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "transfer failed");
                self.surface.notify(&format!("Transfer failed: {}", err.detail()));
                Err(err)
            }
        }
    }

    /// Grant the verifier role to an account. Does not touch the balance
    /// display.
    pub async fn add_verifier(&self, address: &str) -> Result<(), BridgeError> {
        self.verifier_role_call(address, true).await
    }

    /// Revoke the verifier role from an account.
    pub async fn remove_verifier(&self, address: &str) -> Result<(), BridgeError> {
        self.verifier_role_call(address, false).await
    }

    async fn verifier_role_call(&self, address: &str, grant: bool) -> Result<(), BridgeError> {
        let address = address.trim();
        if let Err(err) = validate_ledger_address(address) {
            self.surface.notify(err.detail());
            return Err(err);
        }

        let op = if grant { "add-verifier" } else { "remove-verifier" };
        let _guard = self.begin(op)?;
        let submitted = if grant {
            self.ledger.add_verifier(address).await
        } else {
            self.ledger.remove_verifier(address).await
        };
        let result = match submitted {
            Ok(call) => self.confirm(&call).await,
            Err(err) => Err(err),
        };
        match result {
            Ok(()) => {
                self.surface
                    .notify(if grant { "Verifier added." } else { "Verifier removed." });
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, op, "verifier role call failed");
                self.surface.notify(&format!("Transaction failed: {}", err.detail()));
                Err(err)
            }
        }
    }

    /// Read and report token name/symbol/decimals.
    pub async fn token_info(&self) -> Result<TokenMetadata, BridgeError> {
        match self.ledger.token_metadata().await {
            Ok(meta) => {
                self.surface.notify(&format!(
                    "Token: {} ({}), {} decimals",
                    meta.name, meta.symbol, meta.decimals
                ));
                Ok(meta)
            }
            Err(err) => {
                self.surface.notify(&format!("Could not read token details: {}", err.detail()));
                Err(err)
            }
        }
    }

    async fn confirm(&self, call: &SubmittedCall) -> Result<(), BridgeError> {
        self.ledger.await_confirmation(call).await
    }

    fn begin(&self, op: &str) -> Result<InFlightGuard<'_>, BridgeError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            self.surface.notify("Please wait, another operation is still pending.");
            return Err(BridgeError::Busy(op.to_string()));
        }
        Ok(InFlightGuard(&self.in_flight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ethers::types::U256;
    use std::sync::Mutex;

    struct NullLedger;

    #[async_trait]
    impl TokenLedger for NullLedger {
        async fn balance_of(&self, _account: &str) -> Result<U256, BridgeError> {
            Err(BridgeError::RpcError("offline".into()))
        }
        async fn verify_and_mint(
            &self,
            _recipient: &str,
            _quantity: u128,
            _category: &str,
        ) -> Result<SubmittedCall, BridgeError> {
            Err(BridgeError::RpcError("offline".into()))
        }
        async fn redeem(&self, _quantity: u128) -> Result<SubmittedCall, BridgeError> {
            Err(BridgeError::RpcError("offline".into()))
        }
        async fn transfer(&self, _to: &str, _quantity: u128) -> Result<SubmittedCall, BridgeError> {
            Err(BridgeError::RpcError("offline".into()))
        }
        async fn add_verifier(&self, _account: &str) -> Result<SubmittedCall, BridgeError> {
            Err(BridgeError::RpcError("offline".into()))
        }
        async fn remove_verifier(&self, _account: &str) -> Result<SubmittedCall, BridgeError> {
            Err(BridgeError::RpcError("offline".into()))
        }
        async fn token_metadata(&self) -> Result<TokenMetadata, BridgeError> {
            Err(BridgeError::RpcError("offline".into()))
        }
        async fn await_confirmation(&self, _call: &SubmittedCall) -> Result<(), BridgeError> {
            Err(BridgeError::RpcError("offline".into()))
        }
    }

    #[derive(Default)]
    struct RecordingSurface {
        notices: Mutex<Vec<String>>,
    }

    impl Surface for RecordingSurface {
        fn show_account(&self, _address: &str) {}
        fn show_balance(&self, _balance: &str) {}
        fn notify(&self, notice: &str) {
            self.notices.lock().unwrap().push(notice.to_string());
        }
    }

    fn session() -> BridgeSession<NullLedger> {
        BridgeSession::with_ledger(
            NullLedger,
            "0x742d35Cc6634C0532925a3b844Bc454e4438f44e".to_string(),
            Arc::new(RecordingSurface::default()),
        )
    }

    #[test]
    fn test_in_flight_guard_is_exclusive_and_releases() {
        let s = session();
        let guard = s.begin("first").expect("first acquisition succeeds");
        match s.begin("second") {
            Err(BridgeError::Busy(op)) => assert_eq!(op, "second"),
            other => panic!("expected Busy, got {:?}", other.map(|_| ())),
        }
        drop(guard);
        assert!(s.begin("third").is_ok());
    }

    #[tokio::test]
    async fn test_validation_runs_before_guard() {
        let s = session();
        let _guard = s.begin("held").unwrap();
        // invalid input is still reported while an operation is pending
        let err = s.verify_and_mint("nope", "5", "plastic").await.unwrap_err();
        assert!(matches!(err, BridgeError::ValidationError(_)));
    }
}
