use keygrove_primitives::PrimitivesError;

/// Error type for message signing and encryption.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    #[error("message authentication failed")]
    AuthenticationFailed,

    #[error(transparent)]
    Primitives(#[from] PrimitivesError),
}
