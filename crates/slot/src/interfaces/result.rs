use alloy::primitives::{Address, U256};
use colored::Colorize;
use serde::Serialize;
use slotscan_common::utils::hex::ToLowerHex;

use crate::{error::Error, search::SlotMatch};

/// Result of a successful find operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FindResult {
    /// The token that was inspected
    pub token: Address,
    /// The contract whose storage was probed
    pub storage: Address,
    /// The address whose balance was looked up
    pub holder: Address,
    /// `balanceOf(holder)` as reported by the token
    pub balance: U256,
    /// Where the balance was found
    pub slot: SlotMatch,
}

impl FindResult {
    /// Prints a human-readable summary of the result
    pub fn display(&self) {
        println!("{}", "balance mapping found".bold().green());
        println!("  {:<12}{}", "token:", self.token.to_lower_hex());
        if self.storage != self.token {
            println!("  {:<12}{}", "storage:", self.storage.to_lower_hex());
        }
        println!("  {:<12}{}", "holder:", self.holder.to_lower_hex());
        println!("  {:<12}{}", "balance:", self.balance);
        println!("  {:<12}{}", "slot:", self.slot.base_slot.to_string().bold());
        println!("  {:<12}{}", "layout:", self.slot.layout.to_string().bold());
        println!("  {:<12}{}", "key:", self.slot.storage_key.to_lower_hex().dimmed());
    }

    /// Converts the result to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Eyre(eyre::eyre!("failed to serialize result: {e}")))
    }
}
