//! Common utilities, constants, and resources used across the slotscan codebase.
//!
//! This crate provides shared functionality for the slotscan toolkit, including
//! the RPC seam used by the search modules, the known-chain registry, and general
//! utility functions.

/// Constants used throughout the slotscan codebase.
pub mod constants;

/// Utilities for interacting with Ethereum, including the provider, the chain
/// registry, and address parsing.
pub mod ether;

/// General utility functions and types for common tasks.
pub mod utils;

/// In-memory chain state for tests.
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
