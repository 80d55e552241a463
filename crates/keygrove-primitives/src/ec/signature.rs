//! Deterministic ECDSA signatures.
//!
//! Nonces follow RFC 6979, so signing the same hash with the same key is
//! byte-for-byte reproducible. Signatures are low-S normalized to rule out
//! malleability. DER and 65-byte compact (recoverable) encodings are
//! supported.

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{self, RecoveryId, VerifyingKey};

use crate::ec::private_key::PrivateKey;
use crate::ec::public_key::PublicKey;
use crate::PrimitivesError;

/// The secp256k1 curve order N.
const CURVE_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFE, 0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36,
    0x41, 0x41,
];

/// N/2, the low-S boundary.
const HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B,
    0x20, 0xA0,
];

/// Length of the compact signature encoding: header byte plus R and S.
const COMPACT_LEN: usize = 65;

/// An ECDSA signature over secp256k1, held as big-endian R and S words.
#[derive(Clone, Debug)]
pub struct Signature {
    r: [u8; 32],
    s: [u8; 32],
}

impl Signature {
    /// Build a signature from raw 32-byte R and S components.
    pub fn new(r: [u8; 32], s: [u8; 32]) -> Self {
        Signature { r, s }
    }

    /// The R component.
    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    /// The S component.
    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// Sign a 32-byte message hash with `key`.
    ///
    /// The nonce is derived per RFC 6979 from the key and hash; no ambient
    /// randomness is consumed. S is folded into the lower half of the order.
    pub fn sign(hash: &[u8; 32], key: &PrivateKey) -> Result<Self, PrimitivesError> {
        let (sig, _) = Self::sign_recoverable(hash, key)?;
        Ok(sig)
    }

    /// Sign a 32-byte message hash, also returning the recovery id that
    /// lets [`Signature::recover_public_key`] reconstruct the signer's
    /// public key from the compact encoding.
    pub fn sign_recoverable(
        hash: &[u8; 32],
        key: &PrivateKey,
    ) -> Result<(Self, u8), PrimitivesError> {
        let (k256_sig, recovery_id) = key
            .signing_key()
            .sign_prehash_recoverable(hash)
            .map_err(|e| PrimitivesError::InvalidPrivateKey(e.to_string()))?;

        let (r_bytes, s_bytes) = k256_sig.split_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&r_bytes);
        s.copy_from_slice(&s_bytes);

        let mut recid = recovery_id.to_byte();
        // k256 already emits low-S signatures; the fold is kept as a guard.
        // Negating S flips the parity the recovery id encodes.
        if is_greater_than(&s, &HALF_ORDER) {
            s = order_minus(&s);
            recid ^= 1;
        }

        Ok((Signature { r, s }, recid))
    }

    /// Verify this signature over a 32-byte message hash.
    ///
    /// Pure function of (hash, signature, public key); returns `false` for
    /// any invalid signature rather than erroring.
    pub fn verify(&self, hash: &[u8; 32], pub_key: &PublicKey) -> bool {
        let k256_sig = match ecdsa::Signature::from_scalars(
            k256::FieldBytes::from(self.r),
            k256::FieldBytes::from(self.s),
        ) {
            Ok(sig) => sig,
            Err(_) => return false,
        };

        pub_key
            .verifying_key()
            .verify_prehash(hash, &k256_sig)
            .is_ok()
    }

    /// Parse a DER-encoded signature: `0x30 len 0x02 rlen R 0x02 slen S`.
    ///
    /// # Errors
    /// Returns [`PrimitivesError::InvalidSignatureEncoding`] for structural
    /// problems and for R or S values that are zero or not below the curve
    /// order.
    pub fn from_der(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let malformed =
            |what: &str| PrimitivesError::InvalidSignatureEncoding(what.to_string());

        if bytes.len() < 8 {
            return Err(malformed("signature too short"));
        }
        if bytes[0] != 0x30 {
            return Err(malformed("missing sequence tag"));
        }
        let seq_len = bytes[1] as usize;
        if seq_len + 2 > bytes.len() || seq_len < 6 {
            return Err(malformed("bad sequence length"));
        }
        let body = &bytes[2..2 + seq_len];

        let (r, rest) = parse_der_integer(body).ok_or_else(|| malformed("bad R integer"))?;
        let (s, rest) = parse_der_integer(rest).ok_or_else(|| malformed("bad S integer"))?;
        if !rest.is_empty() {
            return Err(malformed("trailing bytes after S"));
        }

        if is_zero(&r) {
            return Err(malformed("R is zero"));
        }
        if is_zero(&s) {
            return Err(malformed("S is zero"));
        }
        if !is_less_than(&r, &CURVE_ORDER) {
            return Err(malformed("R is not below the curve order"));
        }
        if !is_less_than(&s, &CURVE_ORDER) {
            return Err(malformed("S is not below the curve order"));
        }

        Ok(Signature { r, s })
    }

    /// Serialize in DER form with low-S normalization.
    pub fn to_der(&self) -> Vec<u8> {
        let s = if is_greater_than(&self.s, &HALF_ORDER) {
            order_minus(&self.s)
        } else {
            self.s
        };

        let rb = der_integer(&self.r);
        let sb = der_integer(&s);

        let total_len = 6 + rb.len() + sb.len();
        let mut out = Vec::with_capacity(total_len);
        out.push(0x30);
        out.push((total_len - 2) as u8);
        out.push(0x02);
        out.push(rb.len() as u8);
        out.extend_from_slice(&rb);
        out.push(0x02);
        out.push(sb.len() as u8);
        out.extend_from_slice(&sb);
        out
    }

    /// Serialize in 65-byte compact form: `header R S`, where the header
    /// encodes the recovery id as `27 + id + 4` (compressed convention).
    pub fn to_compact(&self, recovery_id: u8) -> [u8; COMPACT_LEN] {
        let mut out = [0u8; COMPACT_LEN];
        out[0] = 27 + recovery_id + 4;
        out[1..33].copy_from_slice(&self.r);
        out[33..65].copy_from_slice(&self.s);
        out
    }

    /// Parse a 65-byte compact signature, discarding the recovery header.
    pub fn from_compact(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != COMPACT_LEN {
            return Err(PrimitivesError::InvalidSignatureEncoding(format!(
                "compact signature must be {} bytes, got {}",
                COMPACT_LEN,
                bytes.len()
            )));
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[1..33]);
        s.copy_from_slice(&bytes[33..65]);
        Ok(Signature { r, s })
    }

    /// Recover the signer's public key from a compact signature and the
    /// 32-byte hash it signs.
    pub fn recover_public_key(
        compact: &[u8],
        hash: &[u8; 32],
    ) -> Result<PublicKey, PrimitivesError> {
        if compact.len() != COMPACT_LEN {
            return Err(PrimitivesError::InvalidSignatureEncoding(format!(
                "compact signature must be {} bytes, got {}",
                COMPACT_LEN,
                compact.len()
            )));
        }

        let header = compact[0];
        if header < 27 {
            return Err(PrimitivesError::InvalidSignatureEncoding(
                "compact header below 27".to_string(),
            ));
        }
        let iteration = (header - 27) & !4u8;
        let recovery_id = RecoveryId::from_byte(iteration).ok_or_else(|| {
            PrimitivesError::InvalidSignatureEncoding("invalid recovery id".to_string())
        })?;

        let k256_sig = ecdsa::Signature::from_scalars(
            *k256::FieldBytes::from_slice(&compact[1..33]),
            *k256::FieldBytes::from_slice(&compact[33..65]),
        )
        .map_err(|e| PrimitivesError::InvalidSignatureEncoding(e.to_string()))?;

        let recovered = VerifyingKey::recover_from_prehash(hash, &k256_sig, recovery_id)
            .map_err(|e| PrimitivesError::InvalidSignatureEncoding(e.to_string()))?;

        Ok(PublicKey::from_k256_verifying_key(&recovered))
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.r == other.r && self.s == other.s
    }
}

impl Eq for Signature {}

/// Parse one DER integer, returning its value left-padded to 32 bytes and
/// the remaining input. `None` marks any structural problem.
fn parse_der_integer(input: &[u8]) -> Option<([u8; 32], &[u8])> {
    if input.len() < 2 || input[0] != 0x02 {
        return None;
    }
    let len = input[1] as usize;
    if len == 0 || input.len() < 2 + len {
        return None;
    }
    let value = &input[2..2 + len];

    // Strip the sign-padding zeros DER inserts for high-bit values.
    let mut trimmed = value;
    while trimmed.len() > 1 && trimmed[0] == 0 {
        trimmed = &trimmed[1..];
    }
    if trimmed.len() > 32 {
        return None;
    }
    let mut out = [0u8; 32];
    out[32 - trimmed.len()..].copy_from_slice(trimmed);
    Some((out, &input[2 + len..]))
}

/// Encode a 32-byte integer for DER: leading zeros stripped, a 0x00 pad
/// byte added when the high bit is set.
fn der_integer(val: &[u8; 32]) -> Vec<u8> {
    let mut start = 0;
    while start < 31 && val[start] == 0 {
        start += 1;
    }
    let trimmed = &val[start..];

    if trimmed[0] & 0x80 != 0 {
        let mut out = Vec::with_capacity(trimmed.len() + 1);
        out.push(0x00);
        out.extend_from_slice(trimmed);
        out
    } else {
        trimmed.to_vec()
    }
}

fn is_zero(val: &[u8; 32]) -> bool {
    val.iter().all(|&b| b == 0)
}

/// Big-endian comparison: a < b.
fn is_less_than(a: &[u8; 32], b: &[u8; 32]) -> bool {
    for i in 0..32 {
        if a[i] != b[i] {
            return a[i] < b[i];
        }
    }
    false
}

/// Big-endian comparison: a > b.
fn is_greater_than(a: &[u8; 32], b: &[u8; 32]) -> bool {
    for i in 0..32 {
        if a[i] != b[i] {
            return a[i] > b[i];
        }
    }
    false
}

/// Compute N - val for low-S folding.
fn order_minus(val: &[u8; 32]) -> [u8; 32] {
    let mut result = [0u8; 32];
    let mut borrow: i32 = 0;
    for i in (0..32).rev() {
        let diff = CURVE_ORDER[i] as i32 - val[i] as i32 - borrow;
        if diff < 0 {
            result[i] = (diff + 256) as u8;
            borrow = 1;
        } else {
            result[i] = diff as u8;
            borrow = 0;
        }
    }
    result
}
