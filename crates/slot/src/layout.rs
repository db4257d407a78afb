//! Storage key derivation for `mapping(address => uint256)` balance tables.
//!
//! A mapping declared at base slot `p` keeps the entry for key `k` at `keccak256(k . p)` when
//! compiled by solc and at `keccak256(p . k)` when compiled by vyper, where both operands are
//! left-padded to 32 bytes.

use std::fmt::{self, Display};

use alloy::{
    primitives::{keccak256, Address, B256, U256},
    sol_types::SolValue,
};
use serde::{Deserialize, Serialize};

/// The compiler convention used to place mapping entries in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingLayout {
    /// `keccak256(pad32(key) ++ pad32(slot))`
    Solidity,
    /// `keccak256(pad32(slot) ++ pad32(key))`
    Vyper,
}

impl MappingLayout {
    /// The order in which layouts are tried at each base slot.
    pub const ORDER: [MappingLayout; 2] = [MappingLayout::Solidity, MappingLayout::Vyper];

    /// The storage key of `holder`'s entry in a mapping declared at `slot`.
    pub fn storage_key(self, holder: Address, slot: u64) -> B256 {
        match self {
            MappingLayout::Solidity => solidity_key(holder, slot),
            MappingLayout::Vyper => vyper_key(holder, slot),
        }
    }
}

impl Display for MappingLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingLayout::Solidity => write!(f, "solidity"),
            MappingLayout::Vyper => write!(f, "vyper"),
        }
    }
}

/// Encode a slot index as a 32-byte big-endian word.
///
/// ```
/// use slotscan_slot::layout::encode_slot;
///
/// assert_eq!(encode_slot(1).0[31], 1);
/// assert!(encode_slot(1).0[..31].iter().all(|b| *b == 0));
/// ```
pub fn encode_slot(slot: u64) -> B256 {
    B256::from(U256::from(slot).to_be_bytes::<32>())
}

/// Encode a balance the way it sits in storage: a 32-byte big-endian word.
pub fn encode_word(value: U256) -> B256 {
    B256::from(value.to_be_bytes::<32>())
}

/// Decode a 32-byte big-endian storage word.
pub fn decode_word(word: B256) -> U256 {
    U256::from_be_bytes(word.0)
}

/// `keccak256(pad32(holder) ++ pad32(slot))`
pub fn solidity_key(holder: Address, slot: u64) -> B256 {
    keccak256((holder, U256::from(slot)).abi_encode())
}

/// `keccak256(pad32(slot) ++ pad32(holder))`
pub fn vyper_key(holder: Address, slot: u64) -> B256 {
    keccak256((U256::from(slot), holder).abi_encode())
}
