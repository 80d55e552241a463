/// Error type for entropy, mnemonic, and seed operations.
#[derive(Debug, thiserror::Error)]
pub enum MnemonicError {
    #[error("invalid entropy strength: {0} bits (expected 128, 160, 192, 224, or 256)")]
    InvalidStrength(usize),

    #[error("invalid entropy length: {0} bytes")]
    InvalidEntropyLength(usize),

    #[error("invalid word count: {0} (expected 12, 15, 18, 21, or 24)")]
    InvalidWordCount(usize),

    #[error("word not in dictionary: {0:?}")]
    UnknownWord(String),

    #[error("mnemonic checksum mismatch")]
    ChecksumMismatch,

    #[error("system randomness source unavailable: {0}")]
    RandomnessUnavailable(String),
}
