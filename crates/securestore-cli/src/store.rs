//! Disk persistence for the demo CLI.
//!
//! `securestore-client`'s `DataStore`/`KeyStore` traits are the only
//! contract the library needs from a backing store; this module is one
//! concrete, file-backed implementation of both, so state survives
//! between CLI invocations. It is not a production transport, just enough
//! persistence to make the demo usable across separate command
//! invocations.

use anyhow::{Context, Result};
use securestore_client::{DataStore, KeyStore};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Default, Serialize, Deserialize)]
struct OnDisk {
    // Hex-encoded, since raw ciphertext is not valid JSON/UTF-8.
    data: HashMap<String, String>,
    keys: HashMap<String, String>,
}

/// Implements both `DataStore` and `KeyStore` over two in-memory maps,
/// loaded from and flushed back to a single JSON file on disk.
#[derive(Clone)]
pub struct FileBackedStore {
    data: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    keys: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl FileBackedStore {
    pub fn load(path: &Path) -> Result<Self> {
        let on_disk = if path.exists() {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading state file {}", path.display()))?;
            serde_json::from_str(&raw).context("parsing state file")?
        } else {
            OnDisk::default()
        };

        let decode = |m: HashMap<String, String>| -> Result<HashMap<String, Vec<u8>>> {
            m.into_iter()
                .map(|(k, v)| Ok((k, hex::decode(&v).context("decoding stored hex")?)))
                .collect()
        };

        Ok(Self {
            data: Arc::new(Mutex::new(decode(on_disk.data)?)),
            keys: Arc::new(Mutex::new(decode(on_disk.keys)?)),
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let encode = |m: &HashMap<String, Vec<u8>>| -> HashMap<String, String> {
            m.iter().map(|(k, v)| (k.clone(), hex::encode(v))).collect()
        };

        let on_disk = OnDisk {
            data: encode(&self.data.lock().unwrap()),
            keys: encode(&self.keys.lock().unwrap()),
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating state directory {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(&on_disk).context("serializing state file")?;
        fs::write(path, raw).with_context(|| format!("writing state file {}", path.display()))
    }
}

impl DataStore for FileBackedStore {
    fn get(&self, address: &str) -> Option<Vec<u8>> {
        self.data.lock().unwrap().get(address).cloned()
    }

    fn set(&self, address: &str, bytes: Vec<u8>) {
        self.data.lock().unwrap().insert(address.to_string(), bytes);
    }

    fn delete(&self, address: &str) {
        self.data.lock().unwrap().remove(address);
    }
}

impl KeyStore for FileBackedStore {
    fn get(&self, username: &str) -> Option<Vec<u8>> {
        self.keys.lock().unwrap().get(username).cloned()
    }

    fn set(&self, username: &str, public_key_der: Vec<u8>) {
        self.keys
            .lock()
            .unwrap()
            .insert(username.to_string(), public_key_der);
    }
}

pub fn default_state_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("securestore")
        .join("state.json")
}
