//! Keygrove mnemonic codec.
//!
//! Entropy generation, the BIP-39 phrase encoding with its embedded
//! checksum, and PBKDF2 seed stretching. Encoding and decoding share one
//! immutable 2048-word English dictionary loaded once per process.

mod entropy;
mod mnemonic;
mod wordlist;

mod error;
pub use error::MnemonicError;

pub use entropy::generate_entropy;
pub use mnemonic::{entropy_to_mnemonic, mnemonic_to_entropy, mnemonic_to_seed, SEED_LEN};
