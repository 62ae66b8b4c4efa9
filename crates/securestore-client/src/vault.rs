//! Public client API: `Vault::init_user`/`Vault::get_user` produce a
//! `UserHandle`, which carries the rest of the operations.
//!
//! A `Vault` is parameterized over the injected `DataStore`/`KeyStore`
//! implementations, rather than reaching for ambient global state.

use crate::error::Result;
use crate::store::{DataStore, KeyStore};
use crate::{file_ops, share, user};
use rsa::{RsaPrivateKey, RsaPublicKey};

/// Owns the injected `DataStore`/`KeyStore` collaborators for a process.
/// Cheap to construct; typically created once and shared across sessions.
pub struct Vault<D, K> {
    data: D,
    keys: K,
}

impl<D: DataStore, K: KeyStore> Vault<D, K> {
    pub fn new(data: D, keys: K) -> Self {
        Vault { data, keys }
    }

    /// Access to the underlying DataStore, for test introspection or for
    /// callers that need to wire the same backing store into other
    /// machinery. Never used by the client protocol itself, which always
    /// goes through envelopes.
    pub fn data_store(&self) -> &D {
        &self.data
    }

    /// Access to the underlying KeyStore. See [`Vault::data_store`].
    pub fn key_store(&self) -> &K {
        &self.keys
    }

    /// `init_user(username, password) -> handle | error`. Registers a
    /// brand-new user; fails with `CryptoError` on primitive failure.
    pub fn init_user(&self, username: &str, password: &str) -> Result<UserHandle<'_, D, K>> {
        let private_key = user::register(&self.data, &self.keys, username, password)?;
        Ok(UserHandle {
            vault: self,
            username: username.to_string(),
            password: password.to_string(),
            private_key,
        })
    }

    /// `get_user(username, password) -> handle | error`. Reconstitutes an
    /// existing session, failing distinguishably with `NotFound`,
    /// `IntegrityError`, or `AuthError`.
    pub fn get_user(&self, username: &str, password: &str) -> Result<UserHandle<'_, D, K>> {
        let private_key = user::login(&self.data, username, password)?;
        Ok(UserHandle {
            vault: self,
            username: username.to_string(),
            password: password.to_string(),
            private_key,
        })
    }
}

/// A reconstituted session. Holds only the username, the password (needed
/// to re-derive per-file inode addresses and keys), and the owner's RSA
/// private key. No DataStore state is cached.
pub struct UserHandle<'v, D, K> {
    vault: &'v Vault<D, K>,
    username: String,
    password: String,
    private_key: RsaPrivateKey,
}

impl<'v, D: DataStore, K: KeyStore> UserHandle<'v, D, K> {
    pub fn username(&self) -> &str {
        &self.username
    }

    fn public_key(&self) -> RsaPublicKey {
        RsaPublicKey::from(&self.private_key)
    }

    pub fn store_file(&self, filename: &str, data: &[u8]) -> Result<()> {
        let public_key = self.public_key();
        file_ops::store_file(
            &self.vault.data,
            &self.vault.keys,
            &self.username,
            &self.password,
            &self.private_key,
            &public_key,
            filename,
            data,
        )
    }

    pub fn append_file(&self, filename: &str, data: &[u8]) -> Result<()> {
        file_ops::append_file(
            &self.vault.data,
            &self.vault.keys,
            &self.username,
            &self.password,
            &self.private_key,
            filename,
            data,
        )
    }

    pub fn load_file(&self, filename: &str) -> Result<Vec<u8>> {
        file_ops::load_file(
            &self.vault.data,
            &self.vault.keys,
            &self.username,
            &self.password,
            &self.private_key,
            filename,
        )
    }

    /// Returns the hex-encoded, opaque capability string.
    pub fn share_file(&self, filename: &str, recipient: &str) -> Result<String> {
        share::share_file(
            &self.vault.data,
            &self.vault.keys,
            &self.username,
            &self.password,
            &self.private_key,
            filename,
            recipient,
        )
    }

    pub fn receive_file(&self, filename: &str, sender: &str, capability: &str) -> Result<()> {
        let public_key = self.public_key();
        share::receive_file(
            &self.vault.data,
            &self.vault.keys,
            &self.username,
            &self.password,
            &self.private_key,
            &public_key,
            filename,
            sender,
            capability,
        )
    }

    pub fn revoke_file(&self, filename: &str) -> Result<()> {
        let public_key = self.public_key();
        share::revoke_file(
            &self.vault.data,
            &self.vault.keys,
            &self.username,
            &self.password,
            &self.private_key,
            &public_key,
            filename,
        )
    }
}
