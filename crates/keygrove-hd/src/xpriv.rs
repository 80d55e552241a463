//! Extended private keys and the child derivation step.

use keygrove_primitives::ec::{PrivateKey, PublicKey};
use keygrove_primitives::hash::sha512_hmac;
use zeroize::{Zeroize, Zeroizing};

use crate::path::{ChildNumber, DerivationPath};
use crate::DeriveError;

/// HMAC key for master key derivation, fixed by BIP-32.
const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// Required seed length in bytes.
const SEED_LEN: usize = 64;

/// A private key paired with a chain code, the unit of hierarchical
/// derivation.
///
/// The chain code extends the key with 32 bytes of non-secret-but-private
/// entropy so that child derivation is deterministic without exposing the
/// parent scalar. Both halves are zeroed on drop.
#[derive(Clone)]
pub struct ExtendedPrivateKey {
    key: PrivateKey,
    chain_code: [u8; 32],
}

impl ExtendedPrivateKey {
    /// Derive the master extended key from a 64-byte seed.
    ///
    /// Computes HMAC-SHA512 of the seed under the fixed key `"Bitcoin seed"`;
    /// the left half becomes the master private key and the right half the
    /// master chain code.
    ///
    /// # Errors
    /// Returns [`DeriveError::InvalidSeedLength`] unless the seed is exactly
    /// 64 bytes, and [`DeriveError::InvalidMasterKey`] in the negligible
    /// case that the left half is zero or not below the curve order.
    pub fn from_seed(seed: &[u8]) -> Result<Self, DeriveError> {
        if seed.len() != SEED_LEN {
            return Err(DeriveError::InvalidSeedLength(seed.len()));
        }
        let digest = Zeroizing::new(sha512_hmac(MASTER_HMAC_KEY, seed));
        let key =
            PrivateKey::from_bytes(&digest[..32]).map_err(|_| DeriveError::InvalidMasterKey)?;
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&digest[32..]);
        Ok(ExtendedPrivateKey { key, chain_code })
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.key
    }

    pub fn public_key(&self) -> PublicKey {
        self.key.public_key()
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// The key pair at this node as owned values, for handing to the
    /// signing and encryption layers.
    pub fn key_pair(&self) -> (PrivateKey, PublicKey) {
        (self.key.clone(), self.key.public_key())
    }

    /// Derive one child key.
    ///
    /// Hardened children commit to the parent private key
    /// (`0x00 || parent_key || index`); normal children commit to the
    /// parent compressed public key (`parent_pub || index`). The index is
    /// serialized big-endian with the hardened bit folded into the top bit.
    /// The HMAC left half is added to the parent scalar modulo the curve
    /// order and the right half becomes the child chain code.
    ///
    /// # Errors
    /// Returns [`DeriveError::InvalidChildKey`] if the left half is not
    /// below the curve order or the tweaked scalar is zero. Callers should
    /// skip to the next index; the probability is below 2^-127 per step.
    pub fn derive_child(&self, child: ChildNumber) -> Result<Self, DeriveError> {
        let mut data = Zeroizing::new([0u8; 37]);
        if child.is_hardened() {
            let key_bytes = Zeroizing::new(self.key.to_bytes());
            data[1..33].copy_from_slice(&key_bytes[..]);
        } else {
            data[..33].copy_from_slice(&self.key.public_key().to_compressed());
        }
        data[33..].copy_from_slice(&child.raw_index().to_be_bytes());

        let digest = Zeroizing::new(sha512_hmac(&self.chain_code, &data[..]));
        let mut tweak = Zeroizing::new([0u8; 32]);
        tweak.copy_from_slice(&digest[..32]);
        let key = self
            .key
            .add_tweak(&tweak)
            .map_err(|_| DeriveError::InvalidChildKey(child))?;

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&digest[32..]);
        Ok(ExtendedPrivateKey { key, chain_code })
    }

    /// Derive the key at a full path, applying [`derive_child`] per segment.
    ///
    /// The empty path returns a copy of this key.
    ///
    /// [`derive_child`]: ExtendedPrivateKey::derive_child
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self, DeriveError> {
        let mut current = self.clone();
        for &child in path.children() {
            current = current.derive_child(child)?;
        }
        Ok(current)
    }
}

impl Drop for ExtendedPrivateKey {
    fn drop(&mut self) {
        // The private key zeroes itself; the chain code is ours to clear.
        self.chain_code.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keygrove_mnemonic::mnemonic_to_seed;

    const ZERO_MNEMONIC_12: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_from_seed_rejects_bad_lengths() {
        for len in [0, 16, 32, 63, 65, 128] {
            assert!(matches!(
                ExtendedPrivateKey::from_seed(&vec![0u8; len]),
                Err(DeriveError::InvalidSeedLength(l)) if l == len
            ));
        }
    }

    #[test]
    fn test_master_key_is_deterministic() {
        let seed = [7u8; 64];
        let a = ExtendedPrivateKey::from_seed(&seed).unwrap();
        let b = ExtendedPrivateKey::from_seed(&seed).unwrap();
        assert_eq!(a.private_key(), b.private_key());
        assert_eq!(a.chain_code(), b.chain_code());
    }

    #[test]
    fn test_reference_leaf_key() {
        // m/44'/60'/0'/0/0 from the all-zero 12-word phrase with an empty
        // passphrase, cross-checked against independent wallet stacks.
        let seed = mnemonic_to_seed(ZERO_MNEMONIC_12, "");
        let master = ExtendedPrivateKey::from_seed(&seed[..]).unwrap();
        let path: DerivationPath = "m/44'/60'/0'/0/0".parse().unwrap();
        let leaf = master.derive_path(&path).unwrap();
        assert_eq!(
            leaf.private_key().to_hex(),
            "1837c1be8e2995ec11cda2b066151be2cfb48adf9e47b151d46adab3a21cdf67"
        );
    }

    #[test]
    fn test_hardened_and_normal_children_differ() {
        let master = ExtendedPrivateKey::from_seed(&[3u8; 64]).unwrap();
        let hardened = master
            .derive_child(ChildNumber::new(0, true).unwrap())
            .unwrap();
        let normal = master
            .derive_child(ChildNumber::new(0, false).unwrap())
            .unwrap();
        assert_ne!(hardened.private_key(), normal.private_key());
    }

    #[test]
    fn test_sibling_keys_differ() {
        let master = ExtendedPrivateKey::from_seed(&[9u8; 64]).unwrap();
        let a = master
            .derive_child(ChildNumber::new(0, false).unwrap())
            .unwrap();
        let b = master
            .derive_child(ChildNumber::new(1, false).unwrap())
            .unwrap();
        assert_ne!(a.private_key(), b.private_key());
        assert_ne!(a.chain_code(), b.chain_code());
    }

    #[test]
    fn test_derive_path_matches_stepwise_derivation() {
        let master = ExtendedPrivateKey::from_seed(&[5u8; 64]).unwrap();
        let path: DerivationPath = "m/44'/371'/0'/0/0".parse().unwrap();
        let by_path = master.derive_path(&path).unwrap();

        let mut stepwise = master;
        for &child in path.children() {
            stepwise = stepwise.derive_child(child).unwrap();
        }
        assert_eq!(by_path.private_key(), stepwise.private_key());
    }

    #[test]
    fn test_empty_path_is_identity() {
        let master = ExtendedPrivateKey::from_seed(&[1u8; 64]).unwrap();
        let path: DerivationPath = "m".parse().unwrap();
        let same = master.derive_path(&path).unwrap();
        assert_eq!(master.private_key(), same.private_key());
        assert_eq!(master.chain_code(), same.chain_code());
    }

    #[test]
    fn test_leaf_key_signs_and_verifies() {
        let master = ExtendedPrivateKey::from_seed(&[11u8; 64]).unwrap();
        let path = DerivationPath::bip44(371, 0, 0).unwrap();
        let (private_key, public_key) = master.derive_path(&path).unwrap().key_pair();

        let hash = keygrove_primitives::hash::sha256(b"My Test Data");
        let sig = private_key.sign(&hash).unwrap();
        assert!(public_key.verify(&hash, &sig));
    }
}
