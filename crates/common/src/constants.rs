use fancy_regex::Regex;
use lazy_static::lazy_static;

/// Number of blocks scanned per `eth_getLogs` request when looking for a token holder.
pub const DEFAULT_WINDOW_SIZE: u64 = 100;

/// How far below the chain head the holder search may look before giving up.
pub const DEFAULT_MAX_LOOKBACK: u64 = 100_000;

/// Highest base slot index probed by default. Real-world tokens keep their balance
/// mapping well below this.
pub const DEFAULT_MAX_SLOT: u64 = 100;

lazy_static! {
    /// The following regex is used to validate ethereum addresses
    pub static ref ADDRESS_REGEX: Regex =
        Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("failed to compile regex");

    /// The following regex is used to validate chain ids
    pub static ref CHAIN_ID_REGEX: Regex =
        Regex::new(r"^[0-9]+$").expect("failed to compile regex");
}
