//! The Holder module finds an address that currently holds a non-zero balance of an
//! ERC20 token, by walking the token's `Transfer` events backwards from the chain head.

/// Error types for the holder module
pub mod error;

mod core;
mod interfaces;

// re-export the public interface
pub use core::{holder, resolve_holder, HolderMatch, ResolveOptions};
pub use error::Error;
pub use interfaces::{HolderArgs, HolderArgsBuilder};
