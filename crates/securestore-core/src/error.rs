use thiserror::Error;

/// Failures surfaced by the primitives adapter and envelope codec.
///
/// Every variant here is also re-exported through
/// `securestore_client::ClientError`, which adds the higher-level kinds
/// (`AlreadyExists`) that only make sense once an inode/sharing-record
/// chain is involved.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A MAC, signature, or `KeyAddr` self-reference check failed.
    #[error("integrity check failed: {0}")]
    Integrity(&'static str),

    /// A primitive operation (key generation, RSA, serialization) failed.
    #[error("cryptographic operation failed: {0}")]
    Crypto(String),
}

impl From<rsa::Error> for CoreError {
    fn from(e: rsa::Error) -> Self {
        CoreError::Crypto(format!("rsa: {e}"))
    }
}

impl From<rsa::pkcs1::Error> for CoreError {
    fn from(e: rsa::pkcs1::Error) -> Self {
        CoreError::Crypto(format!("rsa encoding: {e}"))
    }
}

impl From<rsa::signature::Error> for CoreError {
    fn from(e: rsa::signature::Error) -> Self {
        CoreError::Crypto(format!("rsa signature: {e}"))
    }
}

impl From<argon2::Error> for CoreError {
    fn from(e: argon2::Error) -> Self {
        CoreError::Crypto(format!("argon2: {e}"))
    }
}

impl From<postcard::Error> for CoreError {
    fn from(e: postcard::Error) -> Self {
        CoreError::Crypto(format!("serialization: {e}"))
    }
}

impl From<hex::FromHexError> for CoreError {
    fn from(e: hex::FromHexError) -> Self {
        CoreError::Crypto(format!("hex decode: {e}"))
    }
}
