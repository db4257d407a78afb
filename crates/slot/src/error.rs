use alloy::primitives::Address;

/// Error type for the Slot Module
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A user-supplied address could not be parsed
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    /// Neither a chain nor an RPC URL was supplied
    #[error("No network selected: pass --chain or --rpc-url, or set rpc_url in the config")]
    NoNetwork,
    /// No token address was supplied
    #[error("No token address supplied")]
    NoToken,
    /// The holder has nothing to look for
    #[error("Holder {0} has no balance")]
    ZeroBalance(Address),
    /// None of the probed slots held the balance
    #[error("Balance slot not found in slots 0..={last_index} after {probes} reads")]
    SlotNotFound {
        /// The highest base slot probed
        last_index: u64,
        /// How many storage reads were issued
        probes: u64,
    },
    /// An RPC request failed
    #[error("RPC error: {0}")]
    Rpc(String),
    /// The holder could not be resolved
    #[error(transparent)]
    Holder(#[from] slotscan_holder::Error),
    /// Generic internal error
    #[error("Internal error: {0}")]
    Eyre(#[from] eyre::Report),
}
