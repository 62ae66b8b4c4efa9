//! Client-side object model and protocol for an end-to-end encrypted,
//! multi-user, shareable file store layered over an adversarial
//! key-value store.
//!
//! ```no_run
//! use securestore_client::{MemoryDataStore, MemoryKeyStore, Vault};
//!
//! let vault = Vault::new(MemoryDataStore::new(), MemoryKeyStore::new());
//! let alice = vault.init_user("alice", "correct horse battery staple").unwrap();
//! alice.store_file("memo", b"hello").unwrap();
//! assert_eq!(alice.load_file("memo").unwrap(), b"hello");
//! ```

mod error;
mod file_ops;
mod inode;
mod share;
mod store;
mod types;
mod user;
mod vault;

pub use error::{ClientError, Result};
pub use store::{DataStore, KeyStore, MemoryDataStore, MemoryKeyStore};
pub use vault::{UserHandle, Vault};
