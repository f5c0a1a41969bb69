//! Static interface descriptor for the deployed TrashCoin contract.
//!
//! The descriptor lists the canonical function signatures the deployed
//! program accepts; selectors are derived from these strings at the call
//! site instead of being hand-pasted, so the two cannot drift apart.

use crate::core::abi::selector_from_signature;

/// One callable function of the remote contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Function {
    pub name: &'static str,
    pub signature: &'static str,
}

impl Function {
    pub fn selector(&self) -> [u8; 4] {
        selector_from_signature(self.signature)
    }
}

pub const VERIFY_AND_MINT: Function =
    Function { name: "verifyAndMint", signature: "verifyAndMint(address,uint256,string)" };
pub const REDEEM: Function = Function { name: "redeem", signature: "redeem(uint256)" };
pub const BALANCE_OF: Function = Function { name: "balanceOf", signature: "balanceOf(address)" };
pub const TRANSFER: Function =
    Function { name: "transfer", signature: "transfer(address,uint256)" };
pub const ADD_VERIFIER: Function =
    Function { name: "addVerifier", signature: "addVerifier(address)" };
pub const REMOVE_VERIFIER: Function =
    Function { name: "removeVerifier", signature: "removeVerifier(address)" };
pub const NAME: Function = Function { name: "name", signature: "name()" };
pub const SYMBOL: Function = Function { name: "symbol", signature: "symbol()" };
pub const DECIMALS: Function = Function { name: "decimals", signature: "decimals()" };

/// Every function of the deployed contract this client may call.
pub const DESCRIPTOR: &[Function] = &[
    VERIFY_AND_MINT,
    REDEEM,
    BALANCE_OF,
    TRANSFER,
    ADD_VERIFIER,
    REMOVE_VERIFIER,
    NAME,
    SYMBOL,
    DECIMALS,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_is_complete_and_consistent() {
        assert_eq!(DESCRIPTOR.len(), 9);
        for f in DESCRIPTOR {
            assert!(f.signature.starts_with(f.name), "{} vs {}", f.name, f.signature);
            assert_eq!(f.selector(), selector_from_signature(f.signature));
        }
    }

    #[test]
    fn test_known_selectors() {
        assert_eq!(BALANCE_OF.selector(), [0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(TRANSFER.selector(), [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(NAME.selector(), [0x06, 0xfd, 0xde, 0x03]);
        assert_eq!(SYMBOL.selector(), [0x95, 0xd8, 0x9b, 0x41]);
        assert_eq!(DECIMALS.selector(), [0x31, 0x3c, 0xe5, 0x67]);
    }

    #[test]
    fn test_selectors_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for f in DESCRIPTOR {
            assert!(seen.insert(f.selector()), "duplicate selector for {}", f.name);
        }
    }
}
