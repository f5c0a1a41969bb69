use async_trait::async_trait;
use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{
        transaction::eip2718::TypedTransaction, Address, Bytes, Eip1559TransactionRequest,
        NameOrAddress, H256, U256, U64,
    },
    utils::to_checksum,
};
use std::{str::FromStr, time::Duration};
use tracing::{debug, info, warn};

use super::descriptor::{
    ADD_VERIFIER, BALANCE_OF, DECIMALS, NAME, REDEEM, REMOVE_VERIFIER, SYMBOL, TRANSFER,
    VERIFY_AND_MINT,
};
use super::traits::{CallStatus, SubmittedCall, TokenLedger, TokenMetadata};
use crate::core::abi;
use crate::core::config::{BridgeConfig, ConfirmationConfig};
use crate::core::errors::BridgeError;
use crate::core::signer::load_signing_agent;

/// The live Contract Binding: a signing connection to the JSON-RPC node plus
/// the fixed contract address. Immutable after construction.
pub struct ContractClient {
    client: SignerMiddleware<Provider<Http>, LocalWallet>,
    contract: Address,
    account: Address,
    network_name: String,
    chain_id: u64,
    confirmation: ConfirmationConfig,
}

impl ContractClient {
    /// Establish the connection: signing agent first (its absence is the
    /// blocking environment-missing case and must construct nothing), then
    /// the provider, then the binding.
    pub async fn connect(config: &BridgeConfig) -> Result<Self, BridgeError> {
        let wallet = load_signing_agent(&config.signer, config.network.chain_id)?;

        let contract = parse_contract_address(&config.contract.address)?;

        let rpc_url = config.network.rpc_url.trim();
        let parsed_url = reqwest::Url::parse(rpc_url).map_err(|e| {
            BridgeError::ConfigError(format!(
                "invalid RPC URL '{}': {}; check config.toml or TRASHCOIN_RPC_URL",
                rpc_url, e
            ))
        })?;

        info!("Connecting to ledger at {}", parsed_url);
        // Short request timeout; allow proxy environment vars.
        let mut builder = reqwest::Client::builder().timeout(Duration::from_secs(10));
        if let Ok(proxy) = std::env::var("HTTPS_PROXY").or_else(|_| std::env::var("HTTP_PROXY")) {
            if let Ok(p) = reqwest::Proxy::all(proxy) {
                builder = builder.proxy(p);
            }
        }
        let http_client = builder
            .build()
            .map_err(|e| BridgeError::InternalError(format!("failed to build HTTP client: {}", e)))?;

        let provider = Provider::new(Http::new_with_client(parsed_url.clone(), http_client));

        let chain_id = provider
            .get_chainid()
            .await
            .map_err(|e| {
                BridgeError::RpcError(format!(
                    "failed to get chain ID from {}: {}; this might be a network issue, firewall, or an invalid RPC URL",
                    parsed_url, e
                ))
            })?
            .as_u64();

        if config.network.chain_id != chain_id {
            warn!(
                configured = config.network.chain_id,
                reported = chain_id,
                "Chain ID mismatch; signing with the node-reported chain ID"
            );
        }
        let wallet = wallet.with_chain_id(chain_id);
        let account = wallet.address();
        let network_name = network_name_for_chain(chain_id);

        info!("Connected to {} (Chain ID: {})", network_name, chain_id);

        Ok(Self {
            client: SignerMiddleware::new(provider, wallet),
            contract,
            account,
            network_name,
            chain_id,
            confirmation: config.confirmation.clone(),
        })
    }

    /// Build a binding from already-constructed parts. Useful for tests that
    /// never touch a live node.
    pub fn from_parts(
        provider: Provider<Http>,
        wallet: LocalWallet,
        contract: Address,
        confirmation: ConfirmationConfig,
    ) -> Self {
        let chain_id = wallet.chain_id();
        let account = wallet.address();
        Self {
            client: SignerMiddleware::new(provider, wallet),
            contract,
            account,
            network_name: network_name_for_chain(chain_id),
            chain_id,
            confirmation,
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn network_name(&self) -> &str {
        &self.network_name
    }

    pub fn contract_address(&self) -> String {
        to_checksum(&self.contract, None)
    }

    /// The authorized account address, EIP-55 checksummed for display.
    pub fn account_display(&self) -> String {
        to_checksum(&self.account, None)
    }

    async fn call_read(&self, data: Vec<u8>, op: &str) -> Result<Bytes, BridgeError> {
        debug!(op, "Read call");
        let tx = Eip1559TransactionRequest {
            from: Some(self.account),
            to: Some(NameOrAddress::Address(self.contract)),
            data: Some(Bytes::from(data)),
            ..Default::default()
        };
        let typed: TypedTransaction = tx.into();
        self.client.call(&typed, None).await.map_err(|e| remote_error(op, e))
    }

    async fn submit(&self, data: Vec<u8>, op: &str) -> Result<SubmittedCall, BridgeError> {
        let gas_price = self
            .client
            .get_gas_price()
            .await
            .map_err(|e| BridgeError::RpcError(format!("failed to get gas price: {}", e)))?;
        let nonce = self
            .client
            .get_transaction_count(self.account, None)
            .await
            .map_err(|e| BridgeError::RpcError(format!("failed to get nonce: {}", e)))?;
        debug!(op, "submit: gas_price = 0x{:x}, nonce = 0x{:x}", gas_price, nonce);

        // EIP-1559 fee settings derived from the gas price, as a fallback
        // when the node gives no fee history.
        let max_fee_per_gas = gas_price.saturating_mul(U256::from(2u64));
        let max_priority_fee_per_gas =
            (gas_price / U256::from(10u64)).max(U256::from(1_000_000_000u64)); // >= 1 gwei

        let mut tx = Eip1559TransactionRequest {
            from: Some(self.account),
            to: Some(NameOrAddress::Address(self.contract)),
            data: Some(Bytes::from(data)),
            nonce: Some(nonce),
            max_fee_per_gas: Some(max_fee_per_gas),
            max_priority_fee_per_gas: Some(max_priority_fee_per_gas),
            ..Default::default()
        };

        let typed: TypedTransaction = tx.clone().into();
        let gas = match self.client.estimate_gas(&typed, None).await {
            // leave headroom over the estimate
            Ok(estimate) => estimate.saturating_mul(U256::from(12u64)) / U256::from(10u64),
            Err(e) => {
                // An estimation revert means the call itself would fail;
                // surface the reason instead of submitting a doomed call.
                let text = e.to_string();
                if let Some(reason) = extract_revert_reason(&text) {
                    return Err(BridgeError::ContractError(reason));
                }
                warn!(op, error = %text, "Gas estimation unavailable, using fallback limit");
                U256::from(200_000u64)
            }
        };
        tx.gas = Some(gas);

        let pending = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(|e| remote_error(op, e))?;

        let tx_hash = format!("0x{}", hex::encode(pending.tx_hash().as_bytes()));
        info!(op, tx_hash = %tx_hash, "Call submitted");
        Ok(SubmittedCall { tx_hash })
    }

    async fn call_status(&self, tx_hash: &str) -> Result<CallStatus, BridgeError> {
        let tx_hash = H256::from_str(tx_hash).map_err(|e| {
            BridgeError::InternalError(format!("invalid transaction hash: {}", e))
        })?;

        match self.client.get_transaction_receipt(tx_hash).await {
            Ok(Some(receipt)) => {
                if receipt.status == Some(U64::from(1)) {
                    Ok(CallStatus::Confirmed)
                } else {
                    Ok(CallStatus::Failed)
                }
            }
            Ok(None) => match self.client.get_transaction(tx_hash).await {
                Ok(Some(_)) => Ok(CallStatus::Pending),
                Ok(None) => Ok(CallStatus::Unknown),
                Err(e) => Err(BridgeError::RpcError(format!(
                    "failed to get transaction details for {}: {}",
                    tx_hash, e
                ))),
            },
            Err(e) => Err(BridgeError::RpcError(format!(
                "failed to get transaction receipt: {}",
                e
            ))),
        }
    }
}

#[async_trait]
impl TokenLedger for ContractClient {
    async fn balance_of(&self, account: &str) -> Result<U256, BridgeError> {
        let word = abi::word_from_address(account)?;
        let data = abi::encode_static(BALANCE_OF.selector(), &[word]);
        let out = self.call_read(data, BALANCE_OF.name).await?;
        abi::decode_uint(&out)
    }

    async fn verify_and_mint(
        &self,
        recipient: &str,
        quantity: u128,
        category: &str,
    ) -> Result<SubmittedCall, BridgeError> {
        info!(recipient, quantity, category, "Submitting verify-and-mint");
        let words = [abi::word_from_address(recipient)?, abi::word_from_u128(quantity)];
        let data = abi::encode_with_trailing_string(VERIFY_AND_MINT.selector(), &words, category);
        self.submit(data, VERIFY_AND_MINT.name).await
    }

    async fn redeem(&self, quantity: u128) -> Result<SubmittedCall, BridgeError> {
        info!(quantity, "Submitting redeem");
        let data = abi::encode_static(REDEEM.selector(), &[abi::word_from_u128(quantity)]);
        self.submit(data, REDEEM.name).await
    }

    async fn transfer(&self, to: &str, quantity: u128) -> Result<SubmittedCall, BridgeError> {
        info!(to, quantity, "Submitting transfer");
        let words = [abi::word_from_address(to)?, abi::word_from_u128(quantity)];
        let data = abi::encode_static(TRANSFER.selector(), &words);
        self.submit(data, TRANSFER.name).await
    }

    async fn add_verifier(&self, account: &str) -> Result<SubmittedCall, BridgeError> {
        info!(account, "Submitting add-verifier");
        let data =
            abi::encode_static(ADD_VERIFIER.selector(), &[abi::word_from_address(account)?]);
        self.submit(data, ADD_VERIFIER.name).await
    }

    async fn remove_verifier(&self, account: &str) -> Result<SubmittedCall, BridgeError> {
        info!(account, "Submitting remove-verifier");
        let data =
            abi::encode_static(REMOVE_VERIFIER.selector(), &[abi::word_from_address(account)?]);
        self.submit(data, REMOVE_VERIFIER.name).await
    }

    async fn token_metadata(&self) -> Result<TokenMetadata, BridgeError> {
        let name_out = self.call_read(abi::encode_static(NAME.selector(), &[]), NAME.name).await?;
        let symbol_out =
            self.call_read(abi::encode_static(SYMBOL.selector(), &[]), SYMBOL.name).await?;
        let decimals_out =
            self.call_read(abi::encode_static(DECIMALS.selector(), &[]), DECIMALS.name).await?;

        let decimals_word = abi::decode_uint(&decimals_out)?;
        if decimals_word > U256::from(u8::MAX) {
            return Err(BridgeError::RpcError(format!(
                "contract reports an out-of-range decimals value: {}",
                decimals_word
            )));
        }

        Ok(TokenMetadata {
            name: abi::decode_string(&name_out)?,
            symbol: abi::decode_string(&symbol_out)?,
            decimals: decimals_word.as_u64() as u8,
        })
    }

    async fn await_confirmation(&self, call: &SubmittedCall) -> Result<(), BridgeError> {
        let interval = Duration::from_millis(self.confirmation.poll_interval_ms);
        for attempt in 1..=self.confirmation.max_attempts {
            match self.call_status(&call.tx_hash).await? {
                CallStatus::Confirmed => {
                    info!(tx_hash = %call.tx_hash, "Call confirmed");
                    return Ok(());
                }
                CallStatus::Failed => {
                    return Err(BridgeError::ConfirmationFailed(format!(
                        "call {} was mined but reverted",
                        call.tx_hash
                    )))
                }
                CallStatus::Pending | CallStatus::Unknown => {
                    debug!(tx_hash = %call.tx_hash, attempt, "Awaiting confirmation");
                }
            }
            tokio::time::sleep(interval).await;
        }
        Err(BridgeError::ConfirmationTimeout(format!(
            "call {} not confirmed after {} attempts",
            call.tx_hash, self.confirmation.max_attempts
        )))
    }
}

fn parse_contract_address(address: &str) -> Result<Address, BridgeError> {
    if address.trim().is_empty() {
        return Err(BridgeError::ConfigError(
            "contract.address is not configured; set it to the deployed TrashCoin address"
                .to_string(),
        ));
    }
    Address::from_str(address.trim())
        .map_err(|e| BridgeError::ConfigError(format!("invalid contract address: {}", e)))
}

fn network_name_for_chain(chain_id: u64) -> String {
    match chain_id {
        1 => "ethereum".to_string(),
        11155111 => "sepolia".to_string(),
        137 => "polygon".to_string(),
        56 => "bsc".to_string(),
        31337 => "localnet".to_string(),
        _ => format!("ethereum-{}", chain_id),
    }
}

/// Map a provider error to the most specific bridge error available: a
/// decoded revert reason wins over generic transport text.
fn remote_error(op: &str, err: impl std::fmt::Display) -> BridgeError {
    let text = err.to_string();
    match extract_revert_reason(&text) {
        Some(reason) => BridgeError::ContractError(reason),
        None => BridgeError::RpcError(format!("{}: {}", op, text)),
    }
}

fn extract_revert_reason(text: &str) -> Option<String> {
    for marker in ["execution reverted: ", "reverted with reason string '"] {
        if let Some(start) = text.find(marker) {
            let tail = &text[start + marker.len()..];
            let end = tail.find(&['\'', '"', '\n', '('][..]).unwrap_or(tail.len());
            let reason = tail[..end].trim().trim_end_matches(',');
            if !reason.is_empty() {
                return Some(reason.to_string());
            }
        }
    }
    if text.contains("execution reverted") {
        return Some("execution reverted".to_string());
    }
    None
}
