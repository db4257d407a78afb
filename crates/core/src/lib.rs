//! The Core module serves as the central integration point for slotscan's functionality.
//!
//! This module re-exports the public interfaces of the holder and slot crates, making it
//! easier to use slotscan in other projects.

// Re-export all tool-specific modules
pub use slotscan_common;
pub use slotscan_holder;
pub use slotscan_slot;
