// tests/connect_tests.rs
// The environment-missing path of connect(): no key material means one
// blocking notice and no constructed session. The signing agent is checked
// before any network access, so these run offline.

use serial_test::serial;
use std::sync::{Arc, Mutex};

use trashcoin_bridge::{BridgeConfig, BridgeError, BridgeSession, Surface};

#[derive(Default)]
struct RecordingSurface {
    accounts: Mutex<Vec<String>>,
    balances: Mutex<Vec<String>>,
    notices: Mutex<Vec<String>>,
}

impl Surface for RecordingSurface {
    fn show_account(&self, address: &str) {
        self.accounts.lock().unwrap().push(address.to_string());
    }
    fn show_balance(&self, balance: &str) {
        self.balances.lock().unwrap().push(balance.to_string());
    }
    fn notify(&self, notice: &str) {
        self.notices.lock().unwrap().push(notice.to_string());
    }
}

#[tokio::test]
#[serial]
async fn connect_without_key_material_notifies_once_and_builds_nothing() {
    let mut config = BridgeConfig::default();
    config.signer.key_env = "TRASHCOIN_CONNECT_TEST_UNSET_KEY".to_string();
    std::env::remove_var(&config.signer.key_env);
    config.contract.address = "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string();

    let surface = Arc::new(RecordingSurface::default());
    let result = BridgeSession::connect(&config, surface.clone()).await;

    match result {
        Err(BridgeError::WalletUnavailable(msg)) => {
            assert!(msg.contains("TRASHCOIN_CONNECT_TEST_UNSET_KEY"))
        }
        Err(other) => panic!("expected WalletUnavailable, got {}", other),
        Ok(_) => panic!("connect must not succeed without key material"),
    }

    let notices = surface.notices.lock().unwrap();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].starts_with("Wallet unavailable:"));
    assert!(surface.accounts.lock().unwrap().is_empty());
    assert!(surface.balances.lock().unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn connect_with_key_but_unconfigured_contract_is_a_config_error() {
    let mut config = BridgeConfig::default();
    config.signer.key_env = "TRASHCOIN_CONNECT_TEST_SET_KEY".to_string();
    std::env::set_var(
        &config.signer.key_env,
        "1111111111111111111111111111111111111111111111111111111111111111",
    );

    let surface = Arc::new(RecordingSurface::default());
    let result = BridgeSession::connect(&config, surface.clone()).await;
    std::env::remove_var("TRASHCOIN_CONNECT_TEST_SET_KEY");

    match result {
        Err(BridgeError::ConfigError(msg)) => assert!(msg.contains("contract.address")),
        Err(other) => panic!("expected ConfigError, got {}", other),
        Ok(_) => panic!("connect must not succeed without a contract address"),
    }
    // blocking errors are surfaced verbatim
    let notices = surface.notices.lock().unwrap();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].contains("contract.address"));
}
