use alloy::primitives::Address;
use eyre::{bail, eyre, Result};

use crate::constants::ADDRESS_REGEX;

/// Parse a user-supplied address.
///
/// The input must be `0x` followed by 40 hex digits. Mixed-case input is treated as
/// EIP-55 checksummed and rejected if the checksum does not match; all-lowercase and
/// all-uppercase input is accepted as-is.
///
/// ```
/// use slotscan_common::ether::address::parse_address;
///
/// assert!(parse_address("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045").is_ok());
/// assert!(parse_address("0xd8da6bf26964af9d7eed9e03e53415d37aa96045").is_ok());
/// assert!(parse_address("0xd8DA6BF26964aF9D7eEd9e03E53415D37aA96045").is_err());
/// assert!(parse_address("d8da6bf26964af9d7eed9e03e53415d37aa96045").is_err());
/// ```
pub fn parse_address(input: &str) -> Result<Address> {
    let input = input.trim();
    if !ADDRESS_REGEX.is_match(input).unwrap_or(false) {
        bail!("'{input}' is not a valid address");
    }

    let digits = &input[2..];
    let mixed_case = digits.chars().any(|c| c.is_ascii_lowercase()) &&
        digits.chars().any(|c| c.is_ascii_uppercase());

    if mixed_case {
        Address::parse_checksummed(input, None)
            .map_err(|e| eyre!("'{input}' has an invalid checksum: {e}"))
    } else {
        input.parse::<Address>().map_err(|e| eyre!("'{input}' is not a valid address: {e}"))
    }
}
