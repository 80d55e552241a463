/// Error type for seed ingestion and child key derivation.
#[derive(Debug, thiserror::Error)]
pub enum DeriveError {
    #[error("invalid seed length: {0} bytes (expected 64)")]
    InvalidSeedLength(usize),

    #[error("seed produced an invalid master key")]
    InvalidMasterKey,

    #[error("derivation produced an invalid child key at {0}")]
    InvalidChildKey(crate::ChildNumber),

    #[error("invalid derivation path: {0}")]
    InvalidPathSyntax(String),
}
