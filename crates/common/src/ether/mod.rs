/// Address parsing and validation.
pub mod address;

/// The static registry of known chains and their public RPC endpoints.
pub mod chains;

/// The [`provider::ChainReader`] seam and its alloy-backed implementation.
pub mod provider;

/// Solidity interfaces and events used when talking to token contracts.
pub mod types;
