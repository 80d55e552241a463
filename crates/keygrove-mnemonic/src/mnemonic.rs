//! Mnemonic encoding, decoding, and seed stretching.

use sha2::{Digest, Sha256, Sha512};
use zeroize::Zeroizing;

use crate::wordlist;
use crate::MnemonicError;

/// Length of a stretched seed in bytes.
pub const SEED_LEN: usize = 64;

/// PBKDF2-HMAC-SHA512 iteration count for seed stretching.
const PBKDF2_ROUNDS: u32 = 2048;

/// Word counts that correspond to a supported entropy strength.
const SUPPORTED_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// Encode entropy as a space-separated mnemonic phrase.
///
/// The checksum is the leading `entropy_bits / 32` bits of the SHA-256
/// digest of the entropy, appended after the entropy bits before the
/// stream is cut into 11-bit word indices.
///
/// # Errors
/// Returns [`MnemonicError::InvalidEntropyLength`] unless the entropy is
/// 16, 20, 24, 28, or 32 bytes.
pub fn entropy_to_mnemonic(entropy: &[u8]) -> Result<String, MnemonicError> {
    let entropy_bits = entropy.len() * 8;
    if !(128..=256).contains(&entropy_bits) || entropy_bits % 32 != 0 {
        return Err(MnemonicError::InvalidEntropyLength(entropy.len()));
    }
    let checksum_bits = entropy_bits / 32;
    let checksum = Sha256::digest(entropy)[0];
    let word_count = (entropy_bits + checksum_bits) / 11;

    let mut words = Vec::with_capacity(word_count);
    let mut acc: u32 = 0;
    let mut acc_bits = 0;
    for &byte in entropy.iter().chain(std::iter::once(&checksum)) {
        acc = (acc << 8) | u32::from(byte);
        acc_bits += 8;
        while acc_bits >= 11 && words.len() < word_count {
            acc_bits -= 11;
            words.push(wordlist::word_at(((acc >> acc_bits) & 0x7ff) as u16));
        }
    }
    Ok(words.join(" "))
}

/// Decode a mnemonic phrase back to its entropy, verifying the checksum.
///
/// Splits on any whitespace, so extra spacing between words is tolerated.
///
/// # Errors
/// Returns [`MnemonicError::InvalidWordCount`] for unsupported phrase
/// lengths, [`MnemonicError::UnknownWord`] naming the first word not in
/// the dictionary, and [`MnemonicError::ChecksumMismatch`] when the
/// embedded checksum does not match the decoded entropy.
pub fn mnemonic_to_entropy(mnemonic: &str) -> Result<Vec<u8>, MnemonicError> {
    let words: Vec<&str> = mnemonic.split_whitespace().collect();
    if !SUPPORTED_WORD_COUNTS.contains(&words.len()) {
        return Err(MnemonicError::InvalidWordCount(words.len()));
    }
    let total_bits = words.len() * 11;
    let checksum_bits = total_bits / 33;
    let entropy_len = (total_bits - checksum_bits) / 8;

    let mut bytes = Vec::with_capacity(total_bits / 8 + 1);
    let mut acc: u32 = 0;
    let mut acc_bits = 0;
    for word in &words {
        let index = wordlist::index_of(word)
            .ok_or_else(|| MnemonicError::UnknownWord((*word).to_string()))?;
        acc = (acc << 11) | u32::from(index);
        acc_bits += 11;
        while acc_bits >= 8 {
            acc_bits -= 8;
            bytes.push(((acc >> acc_bits) & 0xff) as u8);
        }
    }
    if acc_bits > 0 {
        bytes.push(((acc << (8 - acc_bits)) & 0xff) as u8);
    }

    let entropy = bytes[..entropy_len].to_vec();
    let expected = Sha256::digest(&entropy)[0] >> (8 - checksum_bits);
    let actual = bytes[entropy_len] >> (8 - checksum_bits);
    if expected != actual {
        return Err(MnemonicError::ChecksumMismatch);
    }
    Ok(entropy)
}

/// Stretch a mnemonic phrase into a 64-byte seed with PBKDF2-HMAC-SHA512.
///
/// The salt is the string `"mnemonic"` followed by the passphrase; an
/// empty passphrase is valid and is the common case. The phrase is NOT
/// checksum-validated here, matching the standard: any string stretches
/// to some seed. Validate with [`mnemonic_to_entropy`] first if the
/// phrase came from user input.
pub fn mnemonic_to_seed(mnemonic: &str, passphrase: &str) -> Zeroizing<[u8; SEED_LEN]> {
    let salt = Zeroizing::new(format!("mnemonic{passphrase}"));
    let mut seed = Zeroizing::new([0u8; SEED_LEN]);
    pbkdf2::pbkdf2_hmac::<Sha512>(
        mnemonic.as_bytes(),
        salt.as_bytes(),
        PBKDF2_ROUNDS,
        &mut seed[..],
    );
    seed
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZERO_16: [u8; 16] = [0u8; 16];
    const ZERO_MNEMONIC_12: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_encode_reference_vectors() {
        let cases: [(&[u8], &str); 4] = [
            (&ZERO_16, ZERO_MNEMONIC_12),
            (
                &[0x7f; 16],
                "legal winner thank year wave sausage worth useful legal winner thank yellow",
            ),
            (
                &[0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80,
                  0x80, 0x80, 0x80],
                "letter advice cage absurd amount doctor acoustic avoid letter advice cage above",
            ),
            (
                &[0xff; 16],
                "zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo wrong",
            ),
        ];
        for (entropy, expected) in cases {
            assert_eq!(entropy_to_mnemonic(entropy).unwrap(), expected);
            assert_eq!(mnemonic_to_entropy(expected).unwrap(), entropy);
        }
    }

    #[test]
    fn test_encode_256_bit_vector() {
        let mnemonic = entropy_to_mnemonic(&[0u8; 32]).unwrap();
        let expected = format!("{}art", "abandon ".repeat(23));
        assert_eq!(mnemonic, expected);
        assert_eq!(mnemonic_to_entropy(&mnemonic).unwrap(), [0u8; 32]);
    }

    #[test]
    fn test_roundtrip_all_strengths() {
        for len in [16, 20, 24, 28, 32] {
            let entropy: Vec<u8> = (0..len).map(|i| (i * 37 + 11) as u8).collect();
            let mnemonic = entropy_to_mnemonic(&entropy).unwrap();
            assert_eq!(mnemonic.split_whitespace().count(), (len * 8 + len / 4) / 11);
            assert_eq!(mnemonic_to_entropy(&mnemonic).unwrap(), entropy);
        }
    }

    #[test]
    fn test_encode_rejects_bad_lengths() {
        for len in [0, 15, 17, 33, 64] {
            assert!(matches!(
                entropy_to_mnemonic(&vec![0u8; len]),
                Err(MnemonicError::InvalidEntropyLength(l)) if l == len
            ));
        }
    }

    #[test]
    fn test_decode_rejects_bad_word_counts() {
        for count in [0, 1, 11, 13, 23, 25] {
            let phrase = vec!["abandon"; count].join(" ");
            assert!(matches!(
                mnemonic_to_entropy(&phrase),
                Err(MnemonicError::InvalidWordCount(c)) if c == count
            ));
        }
    }

    #[test]
    fn test_decode_rejects_unknown_word() {
        let phrase = ZERO_MNEMONIC_12.replace("about", "aboot");
        match mnemonic_to_entropy(&phrase) {
            Err(MnemonicError::UnknownWord(w)) => assert_eq!(w, "aboot"),
            other => panic!("expected UnknownWord, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_checksum_mismatch() {
        // Final word carries the checksum; the wrong one must be caught.
        let phrase = ZERO_MNEMONIC_12.replace("about", "abandon");
        assert!(matches!(
            mnemonic_to_entropy(&phrase),
            Err(MnemonicError::ChecksumMismatch)
        ));
    }

    #[test]
    fn test_decode_detects_flipped_word() {
        let entropy: Vec<u8> = (0..32).map(|i| i as u8).collect();
        let mnemonic = entropy_to_mnemonic(&entropy).unwrap();
        let mut words: Vec<&str> = mnemonic.split_whitespace().collect();
        let original = words[5];
        words[5] = if original == "zoo" { "abandon" } else { "zoo" };
        let tampered = words.join(" ");
        match mnemonic_to_entropy(&tampered) {
            Err(MnemonicError::ChecksumMismatch) => {}
            Ok(decoded) => assert_ne!(decoded, entropy),
            Err(other) => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_decode_tolerates_extra_whitespace() {
        let spaced = ZERO_MNEMONIC_12.replace(' ', "  ");
        assert_eq!(mnemonic_to_entropy(&spaced).unwrap(), ZERO_16);
    }

    #[test]
    fn test_seed_reference_vectors() {
        // Passphrase "TREZOR" vector for the all-zero 12-word phrase.
        let seed = mnemonic_to_seed(ZERO_MNEMONIC_12, "TREZOR");
        assert_eq!(
            hex::encode(&seed[..]),
            "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e53495531f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04"
        );

        let seed = mnemonic_to_seed(ZERO_MNEMONIC_12, "");
        assert_eq!(
            hex::encode(&seed[..]),
            "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc19a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
        );
    }

    #[test]
    fn test_seed_passphrase_changes_output() {
        let a = mnemonic_to_seed(ZERO_MNEMONIC_12, "");
        let b = mnemonic_to_seed(ZERO_MNEMONIC_12, "hunter2");
        assert_ne!(&a[..], &b[..]);
    }
}
