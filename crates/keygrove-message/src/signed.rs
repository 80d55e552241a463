//! Message signing and verification.
//!
//! Messages are hashed with SHA-256 before signing, so callers pass the
//! raw bytes and never a precomputed digest.

use keygrove_primitives::ec::{PrivateKey, PublicKey, Signature};
use keygrove_primitives::hash::sha256;

use crate::MessageError;

/// Sign a message with a deterministic ECDSA signature.
///
/// The same key and message always produce the same signature.
pub fn sign(key: &PrivateKey, message: &[u8]) -> Result<Signature, MessageError> {
    Ok(key.sign(&sha256(message))?)
}

/// Sign a message in 65-byte compact form, carrying the recovery id so the
/// signer's public key can be reconstructed from the signature alone.
pub fn sign_compact(key: &PrivateKey, message: &[u8]) -> Result<[u8; 65], MessageError> {
    let (sig, recovery_id) = Signature::sign_recoverable(&sha256(message), key)?;
    Ok(sig.to_compact(recovery_id))
}

/// Verify a signature over a message.
///
/// Pure check: any invalid signature yields `false`, never an error.
pub fn verify(key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
    signature.verify(&sha256(message), key)
}

/// Recover the signer's public key from a compact signature and the
/// message it signs.
pub fn recover_signer(message: &[u8], compact: &[u8]) -> Result<PublicKey, MessageError> {
    Ok(Signature::recover_public_key(compact, &sha256(message))?)
}
