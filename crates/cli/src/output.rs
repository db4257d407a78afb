use colored::Colorize;
use slotscan_common::utils::hex::ToLowerHex;
use slotscan_core::{slotscan_holder::HolderMatch, slotscan_slot::FindResult};

use crate::error::Error;

/// print a located balance mapping, either as a summary or as JSON
pub(crate) fn print_find_result(result: &FindResult, json: bool) -> Result<(), Error> {
    if json {
        println!("{}", result.to_json()?);
    } else {
        result.display();
    }

    Ok(())
}

/// print a found token holder, either as a summary or as JSON
pub(crate) fn print_holder_match(found: &HolderMatch, json: bool) -> Result<(), Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(found)?);
        return Ok(());
    }

    println!("{}", "holder found".bold().green());
    println!("  {:<12}{}", "holder:", found.holder.to_lower_hex());
    println!("  {:<12}{}", "balance:", found.balance);
    if let Some(block_number) = found.block_number {
        println!("  {:<12}{}", "block:", block_number);
    }

    Ok(())
}
