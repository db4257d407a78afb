//! The Slot module locates the storage slot of an ERC20 token's balance mapping, so that
//! balances can be read or overridden directly in storage.

/// Error types for the slot module
pub mod error;
/// Storage key derivation for balance mappings
pub mod layout;
/// The base slot search
pub mod search;

mod core;
mod interfaces;

// re-export the public interface
pub use core::{find, locate, FindRequest};
pub use error::Error;
pub use interfaces::{FindArgs, FindArgsBuilder, FindResult};
pub use layout::MappingLayout;
pub use search::{search, SearchOptions, SlotMatch};
