//! Cryptographically secure entropy generation.

use rand::RngCore;

use crate::MnemonicError;

/// Entropy strengths accepted by [`generate_entropy`], in bits.
const SUPPORTED_STRENGTHS: [usize; 5] = [128, 160, 192, 224, 256];

/// Draw `bit_strength / 8` bytes from the operating system's randomness
/// source.
///
/// # Errors
/// Returns [`MnemonicError::InvalidStrength`] unless `bit_strength` is one
/// of 128, 160, 192, 224, or 256, and [`MnemonicError::RandomnessUnavailable`]
/// if the OS source reports failure. Weaker randomness is never substituted.
pub fn generate_entropy(bit_strength: usize) -> Result<Vec<u8>, MnemonicError> {
    if !SUPPORTED_STRENGTHS.contains(&bit_strength) {
        return Err(MnemonicError::InvalidStrength(bit_strength));
    }
    let mut entropy = vec![0u8; bit_strength / 8];
    rand::rngs::OsRng
        .try_fill_bytes(&mut entropy)
        .map_err(|e| MnemonicError::RandomnessUnavailable(e.to_string()))?;
    Ok(entropy)
}
