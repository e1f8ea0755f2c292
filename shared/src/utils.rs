//! # Shared Utility Functions
//!
//! Canister id helpers.
//!
//! ## Usage
//!
//! ```rust
//! use shared::utils::canister_id;
//!
//! assert_eq!(canister_id(2).to_text(), "ryjl3-tyaaa-aaaaa-aaaba-cai");
//! ```

use candid::Principal;

/// Id of the canister with sequence number `index` on its subnet.
///
/// Canister ids are the big-endian index followed by the `0x01 0x01` class
/// suffix, e.g. index `2` is the ICP ledger `ryjl3-tyaaa-aaaaa-aaaba-cai`.
pub fn canister_id(index: u64) -> Principal {
    let mut bytes = [0u8; 10];
    bytes[..8].copy_from_slice(&index.to_be_bytes());
    bytes[8] = 0x01;
    bytes[9] = 0x01;
    Principal::from_slice(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canister_id() {
        assert_eq!(canister_id(2).to_text(), "ryjl3-tyaaa-aaaaa-aaaba-cai");
        assert_eq!(canister_id(0x3a0).to_text(), "iznzw-lyaaa-aaaaa-aaoqa-cai");
    }

    #[test]
    fn test_principal_text() {
        for text in ["aaaaa-aa", "2vxsx-fae", "ryjl3-tyaaa-aaaaa-aaaba-cai"] {
            assert_eq!(Principal::from_text(text).unwrap().to_text(), text);
        }
        assert_eq!(Principal::from_text("2vxsx-fae").unwrap(), Principal::anonymous());

        for text in ["ryjl3-tyaaa-aaaaa-aaaba-caj", "ryjl3tyaaaaaaaaaaabacai", "ryjl3-tyaaa-aaaaa-aaaba-ca!", ""] {
            assert!(Principal::from_text(text).is_err(), "{text}");
        }
    }

    #[test]
    fn test_canister_ids_are_distinct() {
        assert_ne!(canister_id(0x3a0), canister_id(0x3a1));
        assert_ne!(canister_id(0), Principal::anonymous());
    }
}
