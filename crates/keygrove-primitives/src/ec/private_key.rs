//! secp256k1 private key.
//!
//! Wraps a k256 signing key and adds fallible generation from OS randomness,
//! scalar tweak addition for hierarchical derivation, and ECDH shared
//! secret computation. Key material is zeroed on drop.

use k256::ecdsa::SigningKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::{Field, PrimeField, ScalarPrimitive};
use k256::{Scalar, Secp256k1};
use rand::RngCore;
use zeroize::{Zeroize, Zeroizing};

use crate::ec::public_key::PublicKey;
use crate::ec::signature::Signature;
use crate::PrimitivesError;

/// Length of a serialized private key scalar in bytes.
const PRIVATE_KEY_BYTES_LEN: usize = 32;

/// Length of a compressed SEC1 point, used for ECDH shared secrets.
const SHARED_SECRET_LEN: usize = 33;

/// A secp256k1 private key for signing, key derivation, and ECDH.
///
/// Valid by construction: the wrapped scalar is always nonzero and below the
/// curve order. The scalar is overwritten with zeros when the key is dropped.
#[derive(Clone, Debug)]
pub struct PrivateKey {
    inner: SigningKey,
}

impl PrivateKey {
    /// Generate a new private key from the operating system's randomness source.
    ///
    /// # Errors
    /// Returns [`PrimitivesError::RandomnessUnavailable`] if the OS randomness
    /// source reports failure. Weaker randomness is never substituted.
    pub fn generate() -> Result<Self, PrimitivesError> {
        let mut candidate = Zeroizing::new([0u8; PRIVATE_KEY_BYTES_LEN]);
        loop {
            rand::rngs::OsRng
                .try_fill_bytes(&mut candidate[..])
                .map_err(|e| PrimitivesError::RandomnessUnavailable(e.to_string()))?;
            // A uniform 32-byte draw misses the scalar range with probability
            // below 2^-127. Redraw rather than reduce, so the result stays
            // uniform over [1, n-1].
            if let Ok(key) = Self::from_bytes(&candidate[..]) {
                return Ok(key);
            }
        }
    }

    /// Create a private key from a raw 32-byte big-endian scalar.
    ///
    /// # Errors
    /// Returns [`PrimitivesError::InvalidPrivateKey`] if the slice is not
    /// 32 bytes, or if the scalar is zero or not below the curve order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != PRIVATE_KEY_BYTES_LEN {
            return Err(PrimitivesError::InvalidPrivateKey(format!(
                "expected {} bytes, got {}",
                PRIVATE_KEY_BYTES_LEN,
                bytes.len()
            )));
        }
        let signing_key = SigningKey::from_slice(bytes)
            .map_err(|e| PrimitivesError::InvalidPrivateKey(e.to_string()))?;
        Ok(PrivateKey { inner: signing_key })
    }

    /// Create a private key from a 64-character hex string.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.is_empty() {
            return Err(PrimitivesError::InvalidPrivateKey(
                "private key hex is empty".to_string(),
            ));
        }
        let bytes = hex::decode(hex_str).map_err(|e| PrimitivesError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Serialize the private key as a 32-byte big-endian scalar.
    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_BYTES_LEN] {
        let mut out = [0u8; PRIVATE_KEY_BYTES_LEN];
        out.copy_from_slice(&self.inner.to_bytes());
        out
    }

    /// Serialize the private key as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Derive the corresponding public key (scalar multiplication with the
    /// curve base point). Always succeeds for a valid private scalar.
    pub fn public_key(&self) -> PublicKey {
        let verifying_key = self.inner.verifying_key();
        PublicKey::from_k256_verifying_key(verifying_key)
    }

    /// Sign a 32-byte message hash with a deterministic RFC 6979 nonce.
    ///
    /// The signature is low-S normalized; signing the same hash with the
    /// same key always yields the same bytes.
    pub fn sign(&self, hash: &[u8; 32]) -> Result<Signature, PrimitivesError> {
        Signature::sign(hash, self)
    }

    /// Add a 32-byte tweak scalar to this key, modulo the curve order.
    ///
    /// This is the child-key step of hierarchical derivation. The tweak is
    /// interpreted as a big-endian integer and must itself be below the
    /// curve order; the sum must be nonzero.
    ///
    /// # Errors
    /// Returns [`PrimitivesError::InvalidPrivateKey`] if the tweak is out of
    /// range or the resulting scalar is zero. Callers deriving child keys
    /// treat this as "skip to the next index".
    pub fn add_tweak(&self, tweak: &[u8; 32]) -> Result<PrivateKey, PrimitivesError> {
        let tweak_scalar = Option::<Scalar>::from(Scalar::from_repr((*tweak).into())).ok_or_else(
            || PrimitivesError::InvalidPrivateKey("tweak is not below the curve order".to_string()),
        )?;
        let sum = self.to_scalar() + tweak_scalar;
        if bool::from(sum.is_zero()) {
            return Err(PrimitivesError::InvalidPrivateKey(
                "tweaked scalar is zero".to_string(),
            ));
        }

        let scalar_primitive: ScalarPrimitive<Secp256k1> = sum.into();
        let mut bytes = scalar_primitive.to_bytes();
        let key = PrivateKey::from_bytes(&bytes);
        bytes.zeroize();
        key
    }

    /// Compute an ECDH shared secret with another party's public key.
    ///
    /// Multiplies the other party's point by this key's scalar and returns
    /// the compressed SEC1 encoding of the shared point. The buffer is
    /// zeroed when dropped.
    pub fn shared_secret(
        &self,
        their_pub: &PublicKey,
    ) -> Result<Zeroizing<[u8; SHARED_SECRET_LEN]>, PrimitivesError> {
        let their_point = their_pub.to_projective_point()?;
        let shared_point = their_point * self.to_scalar();

        let encoded = shared_point.to_affine().to_encoded_point(true);
        let mut out = Zeroizing::new([0u8; SHARED_SECRET_LEN]);
        out.copy_from_slice(encoded.as_bytes());
        Ok(out)
    }

    /// Access the underlying k256 `SigningKey`.
    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.inner
    }

    /// Convert the private key to a k256 `Scalar` for arithmetic.
    pub(crate) fn to_scalar(&self) -> Scalar {
        *self.inner.as_nonzero_scalar().as_ref()
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        // SigningKey stores the scalar internally; zeroize its byte image.
        let mut bytes = self.inner.to_bytes();
        bytes.zeroize();
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for PrivateKey {}
