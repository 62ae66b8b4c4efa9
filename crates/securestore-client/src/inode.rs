//! Per-filename pointer to a sharing record.
//!
//! An inode is always signed with and encrypted to the *holder's own*
//! RSA key, so a recipient's inode carries no linkage to the owner's
//! filename visible to the DataStore.

use crate::error::{ClientError, Result};
use crate::store::{DataStore, KeyStore};
use crate::types::InodePayload;
use rsa::{RsaPrivateKey, RsaPublicKey};
use securestore_core::{derivation, envelope, primitives};

pub(crate) struct InodeFields {
    pub sh_record_addr: String,
    pub sh_record_key: String,
}

/// Reads and verifies the inode at `inode_address(username, password,
/// filename)`, opened with the holder's own keypair (a holder's inode is
/// self-signed).
pub(crate) fn read_inode<D: DataStore, K: KeyStore>(
    data: &D,
    keys: &K,
    username: &str,
    password: &str,
    filename: &str,
    private_key: &RsaPrivateKey,
) -> Result<InodeFields> {
    let address = derivation::inode_address(username, password, filename)?;
    let envelope_bytes = data.get(&address).ok_or(ClientError::NotFound("inode"))?;

    let public_key_der = keys.get(username).ok_or(ClientError::NotFound("public key"))?;
    let public_key = primitives::decode_public_key(&public_key_der)?;

    let payload: InodePayload = envelope::open_asymmetric(&envelope_bytes, private_key, &public_key)?;
    if payload.filename != filename {
        return Err(ClientError::IntegrityError("inode filename mismatch".into()));
    }
    Ok(InodeFields { sh_record_addr: payload.sh_record_addr, sh_record_key: payload.sh_record_key })
}

/// Seals and writes a new inode at the deterministic address for
/// `(username, password, filename)`, overwriting any prior value.
pub(crate) fn write_inode<D: DataStore>(
    data: &D,
    username: &str,
    password: &str,
    filename: &str,
    private_key: &RsaPrivateKey,
    public_key: &RsaPublicKey,
    sh_record_addr: &str,
    sh_record_key: &str,
) -> Result<()> {
    let address = derivation::inode_address(username, password, filename)?;
    let payload = InodePayload {
        filename: filename.to_string(),
        sh_record_addr: sh_record_addr.to_string(),
        sh_record_key: sh_record_key.to_string(),
    };
    let envelope_bytes = envelope::seal_asymmetric(payload, private_key, public_key)?;

    data.delete(&address);
    data.set(&address, envelope_bytes);
    Ok(())
}
