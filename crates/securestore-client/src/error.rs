use securestore_core::CoreError;
use thiserror::Error;

/// Errors surfaced to callers of the client API.
///
/// Every variant is fatal to the current operation; there is no local
/// retry, and a successful call implies every envelope on its path
/// verified.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The address was absent in the DataStore, or the recipient was
    /// absent in the KeyStore.
    #[error("not found: {0}")]
    NotFound(&'static str),

    /// A MAC mismatch, signature mismatch, or `KeyAddr` self-reference
    /// mismatch ("key-value-swap" attack) was detected.
    #[error("integrity check failed: {0}")]
    IntegrityError(String),

    /// The decrypted user record does not match the supplied credentials.
    #[error("authentication failed")]
    AuthError,

    /// A primitive operation (key generation, RSA, serialization) failed.
    #[error("cryptographic operation failed: {0}")]
    CryptoError(String),

    /// `receive_file` was called with a filename already in use by the
    /// recipient.
    #[error("filename {0:?} already in use")]
    AlreadyExists(String),
}

impl From<CoreError> for ClientError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Integrity(msg) => ClientError::IntegrityError(msg.to_string()),
            CoreError::Crypto(msg) => ClientError::CryptoError(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
