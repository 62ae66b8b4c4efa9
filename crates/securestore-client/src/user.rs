//! Registration and session reconstitution.

use crate::error::{ClientError, Result};
use crate::store::{DataStore, KeyStore};
use crate::types::UserRecordPayload;
use rsa::RsaPrivateKey;
use securestore_core::{derivation, envelope, primitives};
use tracing::{debug, warn};

/// Registers a brand-new user: generates an RSA keypair, publishes the
/// public key to the KeyStore, and writes a sealed user record to the
/// DataStore at the deterministic address `A_u`.
///
/// Returns the owner's RSA private key (the rest of the session state,
/// username and password, is already known to the caller).
pub(crate) fn register<D: DataStore, K: KeyStore>(
    data: &D,
    keys: &K,
    username: &str,
    password: &str,
) -> Result<RsaPrivateKey> {
    let address = derivation::user_address(username, password)?;
    let symkey_hex = derivation::user_symkey(username, password)?;
    let split = derivation::SplitKey::from_hex(&symkey_hex)?;

    let (public_key, private_key) = primitives::rsa_generate()?;
    let public_key_der = primitives::encode_public_key(&public_key)?;
    keys.set(username, public_key_der);

    let payload = UserRecordPayload {
        username: username.to_string(),
        password: password.to_string(),
        private_key_der: primitives::encode_private_key(&private_key)?,
    };
    let sealed = envelope::seal_symmetric(payload, &address, &split.hmac, &split.aes)?;

    data.delete(&address);
    data.set(&address, sealed);
    debug!(username, "registered new user");

    Ok(private_key)
}

/// Reconstitutes a session from a username/password pair, verifying the
/// stored record's integrity and that the decrypted credentials match the
/// ones supplied.
pub(crate) fn login<D: DataStore>(
    data: &D,
    username: &str,
    password: &str,
) -> Result<RsaPrivateKey> {
    let address = derivation::user_address(username, password)?;
    let symkey_hex = derivation::user_symkey(username, password)?;
    let split = derivation::SplitKey::from_hex(&symkey_hex)?;

    let ciphertext = data.get(&address).ok_or(ClientError::NotFound("user record"))?;
    let payload: UserRecordPayload =
        envelope::open_symmetric(&ciphertext, &address, &split.hmac, &split.aes)?;

    if payload.username != username || payload.password != password {
        warn!(username, "login credential mismatch after successful decrypt");
        return Err(ClientError::AuthError);
    }

    let private_key = primitives::decode_private_key(&payload.private_key_der)?;
    debug!(username, "session established");
    Ok(private_key)
}
