use alloy::primitives::Address;

/// Error type for the Holder Module
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A user-supplied address could not be parsed
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    /// The log window size was zero
    #[error("Invalid window size: must be greater than zero")]
    InvalidWindowSize,
    /// No transfer participant with a positive balance was found within the lookback bound
    #[error("No holder of {token} found between blocks {from_block} and {to_block}")]
    HolderNotFound {
        /// The token that was searched
        token: Address,
        /// The oldest block that was scanned
        from_block: u64,
        /// The chain head when the search started
        to_block: u64,
    },
    /// An RPC request failed
    #[error("RPC error: {0}")]
    Rpc(String),
    /// Generic internal error
    #[error("Internal error: {0}")]
    Eyre(#[from] eyre::Report),
}
