//! Deterministic mapping from credentials and filenames to DataStore
//! addresses and symmetric keys.
//!
//! All three functions hex-encode a fixed-width marshalling of a KDF
//! output, so the same inputs always yield the same textual address or
//! key, and an attacker who learns an address cannot invert it to the
//! corresponding symmetric key (the salt and input order are swapped
//! between the two).

use crate::error::CoreError;
use crate::primitives::kdf_default;

/// Canonical textual encoding of a 32-byte KDF output: lowercase hex of a
/// fixed-width big-endian byte string. Unlike a JSON/serde encoding of the
/// same bytes, this has exactly one representation per input.
fn marshal(bytes: &[u8; 32]) -> String {
    hex::encode(bytes)
}

/// `A_u = KDF(password‖username, username‖"user")`.
pub fn user_address(username: &str, password: &str) -> Result<String, CoreError> {
    let secret = format!("{password}{username}");
    let salt = format!("{username}user");
    let key = kdf_default(secret.as_bytes(), salt.as_bytes())?;
    Ok(marshal(&key))
}

/// `K_u = KDF(username‖password, username‖"salt")`.
///
/// Returns the full 32-byte value hex-encoded: the first 16 decoded bytes
/// are the AES key, the full decoded value is the HMAC key.
pub fn user_symkey(username: &str, password: &str) -> Result<String, CoreError> {
    let secret = format!("{username}{password}");
    let salt = format!("{username}salt");
    let key = kdf_default(secret.as_bytes(), salt.as_bytes())?;
    Ok(marshal(&key))
}

/// `A_i = KDF(password‖filename, username‖filename)`.
pub fn inode_address(username: &str, password: &str, filename: &str) -> Result<String, CoreError> {
    let secret = format!("{password}{filename}");
    let salt = format!("{username}{filename}");
    let key = kdf_default(secret.as_bytes(), salt.as_bytes())?;
    Ok(marshal(&key))
}

/// Split a decoded `user_symkey`/sharing-record key into its AES (first 16
/// bytes) and HMAC (full value) halves.
pub struct SplitKey {
    pub aes: [u8; 16],
    pub hmac: Vec<u8>,
}

impl SplitKey {
    pub fn from_hex(hex_key: &str) -> Result<Self, CoreError> {
        let decoded = hex::decode(hex_key)?;
        if decoded.len() < 16 {
            return Err(CoreError::Crypto("symmetric key shorter than AES block size".into()));
        }
        let mut aes = [0u8; 16];
        aes.copy_from_slice(&decoded[..16]);
        Ok(SplitKey { aes, hmac: decoded })
    }
}
