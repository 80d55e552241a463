//! Keygrove cryptographic primitives.
//!
//! Foundational building blocks for the Keygrove toolkit:
//! - Hash functions (SHA-256, SHA-512) and HMAC variants
//! - secp256k1 private/public keys with scalar tweak arithmetic and ECDH
//! - Deterministic ECDSA signatures (RFC 6979, low-S, optional recovery id)

pub mod hash;
pub mod ec;

mod error;
pub use error::PrimitivesError;
