//! External interfaces and in-memory implementations used by this crate's
//! integration tests and by `securestore-cli`'s demo.
//!
//! Production callers inject their own implementations backed by a real
//! transport; this crate treats both interfaces strictly as external
//! collaborators, accessed only through these traits rather than through
//! ambient global state.

use std::collections::HashMap;
use std::sync::Mutex;

/// An untrusted mapping from opaque string keys to byte blobs. May
/// corrupt, reorder, or delete entries; callers must not trust anything
/// read from it without verifying an envelope.
pub trait DataStore {
    fn get(&self, address: &str) -> Option<Vec<u8>>;
    fn set(&self, address: &str, bytes: Vec<u8>);
    fn delete(&self, address: &str);
}

/// A trusted, append-only mapping from usernames to DER-encoded RSA
/// public keys. Integrity is preserved; confidentiality is not required.
pub trait KeyStore {
    fn get(&self, username: &str) -> Option<Vec<u8>>;
    fn set(&self, username: &str, public_key_der: Vec<u8>);
}

/// In-memory `DataStore`, for tests and the CLI demo.
#[derive(Default)]
pub struct MemoryDataStore {
    inner: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Debug introspection only, never used on a production code path: a
    /// snapshot of every address currently stored.
    pub fn contents(&self) -> HashMap<String, Vec<u8>> {
        self.inner.lock().unwrap().clone()
    }
}

impl DataStore for MemoryDataStore {
    fn get(&self, address: &str) -> Option<Vec<u8>> {
        self.inner.lock().unwrap().get(address).cloned()
    }

    fn set(&self, address: &str, bytes: Vec<u8>) {
        self.inner.lock().unwrap().insert(address.to_string(), bytes);
    }

    fn delete(&self, address: &str) {
        self.inner.lock().unwrap().remove(address);
    }
}

/// In-memory `KeyStore`, for tests and the CLI demo.
#[derive(Default)]
pub struct MemoryKeyStore {
    inner: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyStore for MemoryKeyStore {
    fn get(&self, username: &str) -> Option<Vec<u8>> {
        self.inner.lock().unwrap().get(username).cloned()
    }

    fn set(&self, username: &str, public_key_der: Vec<u8>) {
        self.inner.lock().unwrap().insert(username.to_string(), public_key_der);
    }
}
