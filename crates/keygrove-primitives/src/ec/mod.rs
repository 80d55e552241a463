//! secp256k1 elliptic curve types.
//!
//! Private keys, public keys, and ECDSA signatures. Scalar and point
//! arithmetic is delegated to k256; this module fixes the byte-level
//! encodings (32-byte scalars, 33/65-byte SEC1 points, DER signatures).

pub mod private_key;
pub mod public_key;
pub mod signature;

pub use private_key::PrivateKey;
pub use public_key::PublicKey;
pub use signature::Signature;
