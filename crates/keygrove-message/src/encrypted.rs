//! Authenticated asymmetric encryption.
//!
//! ECIES construction: a fresh ephemeral keypair per message, ECDH against
//! the recipient's public key, SHA-512 as the KDF splitting into an
//! AES-256-CTR encryption key and an HMAC-SHA256 authentication key. The
//! wire form is `ephemeral_pub(33) || ciphertext || tag(32)`; the tag
//! covers the ephemeral key and the ciphertext, and is checked before any
//! decryption output is produced.
//!
//! The CTR counter starts at zero. That is sound here because the
//! encryption key is a hash of a single-use ECDH secret, so no (key,
//! counter) pair ever repeats across messages.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncrypt, KeyInit};
use aes::Aes256;
use keygrove_primitives::ec::{PrivateKey, PublicKey};
use keygrove_primitives::hash::{sha256_hmac, sha512};
use zeroize::Zeroizing;

use crate::MessageError;

/// Length of the compressed ephemeral public key prefix.
const EPHEMERAL_KEY_LEN: usize = 33;

/// Length of the HMAC-SHA256 authentication tag suffix.
const TAG_LEN: usize = 32;

/// AES block size.
const BLOCK_LEN: usize = 16;

/// Encrypt a message so only the holder of `recipient`'s private key can
/// read it.
///
/// Generates a fresh ephemeral keypair, so encrypting the same plaintext
/// to the same recipient twice yields unrelated ciphertexts. Output length
/// is always `plaintext.len() + 65`.
///
/// # Errors
/// Returns [`MessageError::Primitives`] if the OS randomness source fails;
/// nothing is emitted in that case.
pub fn encrypt(plaintext: &[u8], recipient: &PublicKey) -> Result<Vec<u8>, MessageError> {
    let ephemeral = PrivateKey::generate()?;
    let ephemeral_pub = ephemeral.public_key().to_compressed();
    let shared = ephemeral.shared_secret(recipient)?;
    let (enc_key, mac_key) = derive_keys(&ephemeral_pub, &shared);

    let mut out = Vec::with_capacity(EPHEMERAL_KEY_LEN + plaintext.len() + TAG_LEN);
    out.extend_from_slice(&ephemeral_pub);
    out.extend_from_slice(&aes256_ctr_xor(&enc_key, plaintext));
    let tag = sha256_hmac(&mac_key[..], &out);
    out.extend_from_slice(&tag);
    Ok(out)
}

/// Decrypt a message produced by [`encrypt`] for `recipient`'s key.
///
/// The authentication tag is verified in constant time before decryption;
/// any tampering with the ephemeral key, ciphertext, or tag fails closed
/// with no plaintext emitted.
///
/// # Errors
/// Returns [`MessageError::MalformedCiphertext`] for blobs too short to
/// contain the ephemeral key and tag or whose ephemeral key is not a
/// curve point, and [`MessageError::AuthenticationFailed`] when the tag
/// does not verify. Decrypting with the wrong private key surfaces as
/// `AuthenticationFailed`.
pub fn decrypt(blob: &[u8], recipient: &PrivateKey) -> Result<Vec<u8>, MessageError> {
    if blob.len() < EPHEMERAL_KEY_LEN + TAG_LEN {
        return Err(MessageError::MalformedCiphertext(format!(
            "{} bytes is below the {} byte minimum",
            blob.len(),
            EPHEMERAL_KEY_LEN + TAG_LEN
        )));
    }
    let (body, tag) = blob.split_at(blob.len() - TAG_LEN);

    let mut ephemeral_pub = [0u8; EPHEMERAL_KEY_LEN];
    ephemeral_pub.copy_from_slice(&body[..EPHEMERAL_KEY_LEN]);
    let ephemeral = PublicKey::from_bytes(&ephemeral_pub)
        .map_err(|e| MessageError::MalformedCiphertext(format!("bad ephemeral key: {e}")))?;

    let shared = recipient.shared_secret(&ephemeral)?;
    let (enc_key, mac_key) = derive_keys(&ephemeral_pub, &shared);

    let expected = sha256_hmac(&mac_key[..], body);
    if !constant_time_eq(&expected, tag) {
        return Err(MessageError::AuthenticationFailed);
    }
    Ok(aes256_ctr_xor(&enc_key, &body[EPHEMERAL_KEY_LEN..]))
}

/// Split SHA-512 of `ephemeral_pub || shared_point` into the encryption
/// and MAC keys. Binding the ephemeral key into the KDF ties the derived
/// keys to this particular message.
fn derive_keys(
    ephemeral_pub: &[u8; EPHEMERAL_KEY_LEN],
    shared: &[u8; EPHEMERAL_KEY_LEN],
) -> (Zeroizing<[u8; 32]>, Zeroizing<[u8; 32]>) {
    let mut material = Zeroizing::new([0u8; 2 * EPHEMERAL_KEY_LEN]);
    material[..EPHEMERAL_KEY_LEN].copy_from_slice(ephemeral_pub);
    material[EPHEMERAL_KEY_LEN..].copy_from_slice(shared);
    let digest = Zeroizing::new(sha512(&material[..]));

    let mut enc_key = Zeroizing::new([0u8; 32]);
    let mut mac_key = Zeroizing::new([0u8; 32]);
    enc_key.copy_from_slice(&digest[..32]);
    mac_key.copy_from_slice(&digest[32..]);
    (enc_key, mac_key)
}

/// XOR `data` with the AES-256-CTR keystream starting from a zero counter.
/// Encryption and decryption are the same operation.
fn aes256_ctr_xor(key: &[u8; 32], data: &[u8]) -> Vec<u8> {
    let cipher = Aes256::new(GenericArray::from_slice(key));
    let mut out = Vec::with_capacity(data.len());
    let mut counter = [0u8; BLOCK_LEN];
    for chunk in data.chunks(BLOCK_LEN) {
        let mut keystream = GenericArray::clone_from_slice(&counter);
        cipher.encrypt_block(&mut keystream);
        for (i, &byte) in chunk.iter().enumerate() {
            out.push(byte ^ keystream[i]);
        }
        increment_counter(&mut counter);
    }
    out
}

/// Big-endian increment of the counter block.
fn increment_counter(counter: &mut [u8; BLOCK_LEN]) {
    for byte in counter.iter_mut().rev() {
        *byte = byte.wrapping_add(1);
        if *byte != 0 {
            break;
        }
    }
}

/// Compare two byte strings without early exit on mismatch.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let recipient = PrivateKey::generate().unwrap();
        let message = b"My Test Data";

        let blob = encrypt(message, &recipient.public_key()).unwrap();
        assert_eq!(blob.len(), message.len() + EPHEMERAL_KEY_LEN + TAG_LEN);

        let decrypted = decrypt(&blob, &recipient).unwrap();
        assert_eq!(decrypted, message);
    }

    #[test]
    fn test_empty_plaintext() {
        let recipient = PrivateKey::generate().unwrap();
        let blob = encrypt(b"", &recipient.public_key()).unwrap();
        assert_eq!(blob.len(), EPHEMERAL_KEY_LEN + TAG_LEN);
        assert_eq!(decrypt(&blob, &recipient).unwrap(), b"");
    }

    #[test]
    fn test_multi_block_plaintext() {
        let recipient = PrivateKey::generate().unwrap();
        let message: Vec<u8> = (0..1000).map(|i| (i % 251) as u8).collect();
        let blob = encrypt(&message, &recipient.public_key()).unwrap();
        assert_eq!(decrypt(&blob, &recipient).unwrap(), message);
    }

    #[test]
    fn test_repeat_encryption_differs_but_decrypts_equal() {
        let recipient = PrivateKey::generate().unwrap();
        let message = b"same plaintext";

        let a = encrypt(message, &recipient.public_key()).unwrap();
        let b = encrypt(message, &recipient.public_key()).unwrap();
        assert_ne!(a, b);

        assert_eq!(decrypt(&a, &recipient).unwrap(), message);
        assert_eq!(decrypt(&b, &recipient).unwrap(), message);
    }

    #[test]
    fn test_wrong_key_fails_authentication() {
        let recipient = PrivateKey::generate().unwrap();
        let interloper = PrivateKey::generate().unwrap();

        let blob = encrypt(b"for the recipient only", &recipient.public_key()).unwrap();
        assert!(matches!(
            decrypt(&blob, &interloper),
            Err(MessageError::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_tampering_fails_closed() {
        let recipient = PrivateKey::generate().unwrap();
        let blob = encrypt(b"tamper target message", &recipient.public_key()).unwrap();

        // Flip one bit in each region: ciphertext and tag must both trip
        // authentication.
        for index in [EPHEMERAL_KEY_LEN, blob.len() - TAG_LEN, blob.len() - 1] {
            let mut tampered = blob.clone();
            tampered[index] ^= 0x01;
            assert!(decrypt(&tampered, &recipient).is_err(), "index {index}");
        }
    }

    #[test]
    fn test_rejects_short_and_malformed_blobs() {
        let recipient = PrivateKey::generate().unwrap();

        for len in [0, 1, EPHEMERAL_KEY_LEN, EPHEMERAL_KEY_LEN + TAG_LEN - 1] {
            assert!(matches!(
                decrypt(&vec![0u8; len], &recipient),
                Err(MessageError::MalformedCiphertext(_))
            ));
        }

        // Right length, but the ephemeral key prefix is not a curve point.
        let garbage = vec![0u8; EPHEMERAL_KEY_LEN + TAG_LEN + 10];
        assert!(matches!(
            decrypt(&garbage, &recipient),
            Err(MessageError::MalformedCiphertext(_))
        ));
    }

    #[test]
    fn test_ctr_counter_increment() {
        let mut counter = [0u8; BLOCK_LEN];
        increment_counter(&mut counter);
        assert_eq!(counter[BLOCK_LEN - 1], 1);

        let mut counter = [0xffu8; BLOCK_LEN];
        increment_counter(&mut counter);
        assert_eq!(counter, [0u8; BLOCK_LEN]);

        let mut counter = [0u8; BLOCK_LEN];
        counter[BLOCK_LEN - 1] = 0xff;
        increment_counter(&mut counter);
        assert_eq!(counter[BLOCK_LEN - 2], 1);
        assert_eq!(counter[BLOCK_LEN - 1], 0);
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
        assert!(constant_time_eq(b"", b""));
    }
}
