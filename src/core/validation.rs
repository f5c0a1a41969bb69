use once_cell::sync::Lazy;
use regex::Regex;
use sha3::{Digest, Keccak256};

use crate::core::errors::BridgeError;

static ADDRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("Hardcoded regex should always compile")
});

/// Validates a ledger address (20-byte hex, 0x-prefixed).
pub fn validate_ledger_address(address: &str) -> Result<(), BridgeError> {
    if !address.starts_with("0x") || address.len() != 42 {
        return Err(BridgeError::ValidationError(
            "please enter a valid ledger address (0x-prefixed, 40 hex digits)".to_string(),
        ));
    }
    if !ADDRESS_RE.is_match(address) {
        return Err(BridgeError::ValidationError(
            "ledger address contains non-hex characters".to_string(),
        ));
    }
    // EIP-55: if mixed-case, enforce checksum. All-lower or all-upper acceptable for compatibility.
    let body = &address[2..];
    let is_all_lower = body.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase());
    let is_all_upper = body.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase());
    if is_all_lower || is_all_upper {
        return Ok(());
    }
    if !is_eip55_checksum_valid(address) {
        return Err(BridgeError::ValidationError(
            "ledger address has an invalid EIP-55 checksum".to_string(),
        ));
    }
    Ok(())
}

fn is_eip55_checksum_valid(addr: &str) -> bool {
    if addr.len() != 42 || !addr.starts_with("0x") {
        return false;
    }
    let body = &addr[2..];
    let lower = body.to_lowercase();
    let mut keccak = Keccak256::new();
    keccak.update(lower.as_bytes());
    let hash = keccak.finalize();
    for (i, ch) in body.chars().enumerate() {
        let nibble = (hash[i / 2] >> (4 * (1 - (i % 2)))) & 0x0f;
        match ch {
            'a'..='f' => {
                if nibble >= 8 {
                    return false;
                }
            }
            'A'..='F' => {
                if nibble < 8 {
                    return false;
                }
            }
            _ => {}
        }
    }
    true
}

/// Validates a token quantity: a strictly positive whole number of items.
/// No decimals, no sign, no exponent.
pub fn validate_quantity(quantity: &str) -> Result<u128, BridgeError> {
    let quantity = quantity.trim();
    if quantity.is_empty() || !quantity.chars().all(|c| c.is_ascii_digit()) {
        return Err(BridgeError::ValidationError(
            "please enter a valid number of items".to_string(),
        ));
    }
    let value: u128 = quantity.parse().map_err(|_| {
        BridgeError::ValidationError("quantity exceeds the supported range".to_string())
    })?;
    if value == 0 {
        return Err(BridgeError::ValidationError(
            "quantity must be greater than zero".to_string(),
        ));
    }
    Ok(value)
}

/// Validates a waste category label: non-empty after trimming.
pub fn validate_category(category: &str) -> Result<&str, BridgeError> {
    let category = category.trim();
    if category.is_empty() {
        return Err(BridgeError::ValidationError(
            "please specify the waste category".to_string(),
        ));
    }
    Ok(category)
}
