#![deny(missing_docs)]

//! Keygrove - mnemonic-backed key management and messaging crypto.
//!
//! Re-exports all Keygrove components for convenient single-crate usage.

pub use keygrove_hd as hd;
pub use keygrove_message as message;
pub use keygrove_mnemonic as mnemonic;
pub use keygrove_primitives as primitives;
