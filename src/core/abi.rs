use ethers::types::U256;
use sha3::{Digest, Keccak256};

use crate::core::errors::BridgeError;

/// Compute the first 4 bytes (function selector) from a canonical signature
/// string, e.g. "verifyAndMint(address,uint256,string)".
pub fn selector_from_signature(signature: &str) -> [u8; 4] {
    let mut keccak = Keccak256::new();
    keccak.update(signature.as_bytes());
    let out = keccak.finalize();
    [out[0], out[1], out[2], out[3]]
}

/// Encode a ledger address (20-byte hex, with or without 0x) into a 32-byte ABI word (left-padded).
pub fn word_from_address(addr_hex: &str) -> Result<[u8; 32], BridgeError> {
    let addr = addr_hex.strip_prefix("0x").unwrap_or(addr_hex);
    if addr.len() != 40 || !addr.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(BridgeError::ValidationError("invalid address hex for calldata".to_string()));
    }
    let mut out = [0u8; 32];
    for i in 0..20 {
        out[12 + i] = u8::from_str_radix(&addr[2 * i..2 * i + 2], 16)
            .map_err(|_| BridgeError::ValidationError("invalid hex in address".to_string()))?;
    }
    Ok(out)
}

/// Encode an unsigned integer into a 32-byte big-endian ABI word.
pub fn word_from_u128(value: u128) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[16..].copy_from_slice(&value.to_be_bytes());
    out
}

/// Pack a selector and static ABI words contiguously into calldata.
pub fn encode_static(selector: [u8; 4], words: &[[u8; 32]]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + 32 * words.len());
    out.extend_from_slice(&selector);
    for w in words {
        out.extend_from_slice(w);
    }
    out
}

/// Pack calldata for a call whose last parameter is a dynamic string: the
/// head holds the static words plus the string's tail offset, the tail holds
/// the length word and the string bytes right-padded to a 32-byte boundary.
pub fn encode_with_trailing_string(
    selector: [u8; 4],
    static_words: &[[u8; 32]],
    s: &str,
) -> Vec<u8> {
    let head_words = static_words.len() + 1;
    let tail_padded = s.len().div_ceil(32) * 32;
    let mut out = Vec::with_capacity(4 + 32 * head_words + 32 + tail_padded);
    out.extend_from_slice(&selector);
    for w in static_words {
        out.extend_from_slice(w);
    }
    out.extend_from_slice(&word_from_u128((32 * head_words) as u128));
    out.extend_from_slice(&word_from_u128(s.len() as u128));
    out.extend_from_slice(s.as_bytes());
    out.resize(out.len() + (tail_padded - s.len()), 0);
    out
}

/// Decode a single uint256 return word.
pub fn decode_uint(data: &[u8]) -> Result<U256, BridgeError> {
    if data.len() < 32 {
        return Err(BridgeError::RpcError(format!(
            "return data too short for uint256 ({} bytes)",
            data.len()
        )));
    }
    Ok(U256::from_big_endian(&data[..32]))
}

/// Decode a single dynamic string return value (offset word, length word, bytes).
pub fn decode_string(data: &[u8]) -> Result<String, BridgeError> {
    let truncated = || BridgeError::RpcError("string return data truncated".to_string());
    let word = decode_uint(data)?;
    if word > U256::from(data.len()) {
        return Err(truncated());
    }
    let offset = word.as_usize();
    if data.len() < offset + 32 {
        return Err(truncated());
    }
    let word = decode_uint(&data[offset..])?;
    if word > U256::from(data.len()) {
        return Err(truncated());
    }
    let len = word.as_usize();
    let start = offset + 32;
    if data.len() < start + len {
        return Err(BridgeError::RpcError("string return data truncated".to_string()));
    }
    String::from_utf8(data[start..start + len].to_vec())
        .map_err(|_| BridgeError::RpcError("string return data is not valid UTF-8".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_from_signature() {
        // transfer(address,uint256) -> a9059cbb
        let sel = selector_from_signature("transfer(address,uint256)");
        assert_eq!(sel, [0xa9, 0x05, 0x9c, 0xbb]);
        // balanceOf(address) -> 70a08231
        let sel = selector_from_signature("balanceOf(address)");
        assert_eq!(sel, [0x70, 0xa0, 0x82, 0x31]);
        // decimals() -> 313ce567
        let sel = selector_from_signature("decimals()");
        assert_eq!(sel, [0x31, 0x3c, 0xe5, 0x67]);
    }

    #[test]
    fn test_word_from_address_padding() {
        let word = word_from_address("0x1111111111111111111111111111111111111111").unwrap();
        assert!(word[..12].iter().all(|&b| b == 0));
        assert!(word[12..].iter().all(|&b| b == 0x11));
        // without 0x
        let word2 = word_from_address("1111111111111111111111111111111111111111").unwrap();
        assert_eq!(word, word2);
    }

    #[test]
    fn test_word_from_address_rejects_bad_hex() {
        assert!(word_from_address("0x12").is_err());
        assert!(word_from_address("0xZZ11111111111111111111111111111111111111").is_err());
    }

    #[test]
    fn test_word_from_u128() {
        let word = word_from_u128(42);
        assert!(word[..31].iter().all(|&b| b == 0));
        assert_eq!(word[31], 42);
        let word = word_from_u128(u128::MAX);
        assert!(word[..16].iter().all(|&b| b == 0));
        assert!(word[16..].iter().all(|&b| b == 0xff));
    }

    #[test]
    fn test_encode_static() {
        let selector = selector_from_signature("redeem(uint256)");
        let amt = word_from_u128(1000);
        let data = encode_static(selector, &[amt]);
        assert_eq!(data.len(), 4 + 32);
        assert_eq!(&data[0..4], &selector);
        assert_eq!(&data[4..36], &amt);
    }

    #[test]
    fn test_encode_with_trailing_string_layout() {
        let selector = selector_from_signature("verifyAndMint(address,uint256,string)");
        let addr = word_from_address("0x2222222222222222222222222222222222222222").unwrap();
        let qty = word_from_u128(5);
        let data = encode_with_trailing_string(selector, &[addr, qty], "plastic");
        // selector + 3 head words + length word + one padded tail word
        assert_eq!(data.len(), 4 + 3 * 32 + 32 + 32);
        assert_eq!(&data[0..4], &selector);
        assert_eq!(&data[4..36], &addr);
        assert_eq!(&data[36..68], &qty);
        // offset points past the three head words
        assert_eq!(decode_uint(&data[68..]).unwrap(), U256::from(96));
        // length word then the bytes, zero padded
        assert_eq!(decode_uint(&data[100..]).unwrap(), U256::from(7));
        assert_eq!(&data[132..139], b"plastic");
        assert!(data[139..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_encode_with_trailing_string_exact_word() {
        // 32-byte label needs no extra padding word
        let label = "a".repeat(32);
        let data = encode_with_trailing_string([0u8; 4], &[], &label);
        assert_eq!(data.len(), 4 + 32 + 32 + 32);
    }

    #[test]
    fn test_decode_uint() {
        let mut buf = [0u8; 32];
        buf[31] = 7;
        assert_eq!(decode_uint(&buf).unwrap(), U256::from(7));
        assert!(decode_uint(&buf[..16]).is_err());
    }

    #[test]
    fn test_decode_string() {
        // offset 0x20, length 9, "TrashCoin" padded
        let mut buf = Vec::new();
        buf.extend_from_slice(&word_from_u128(32));
        buf.extend_from_slice(&word_from_u128(9));
        buf.extend_from_slice(b"TrashCoin");
        buf.resize(96, 0);
        assert_eq!(decode_string(&buf).unwrap(), "TrashCoin");
    }

    #[test]
    fn test_decode_string_truncated() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&word_from_u128(32));
        buf.extend_from_slice(&word_from_u128(64));
        buf.extend_from_slice(b"short");
        assert!(decode_string(&buf).is_err());
    }
}
