//! Keygrove message layer.
//!
//! Signing and verification of arbitrary byte messages, plus authenticated
//! asymmetric encryption to a recipient's public key with ephemeral ECDH.

pub mod encrypted;
pub mod signed;

mod error;
pub use error::MessageError;

pub use encrypted::{decrypt, encrypt};
pub use signed::{recover_signer, sign, sign_compact, verify};
