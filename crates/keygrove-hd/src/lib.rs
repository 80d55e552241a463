//! Keygrove hierarchical deterministic key derivation.
//!
//! Turns a 64-byte seed into a master extended key and walks BIP-32 style
//! derivation paths such as `m/44'/371'/0'/0/0` down to leaf signing keys.

mod path;
mod xpriv;

mod error;
pub use error::DeriveError;

pub use path::{ChildNumber, DerivationPath, HARDENED_OFFSET};
pub use xpriv::ExtendedPrivateKey;
