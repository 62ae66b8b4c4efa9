//! Sharing record & data-block operations: `StoreFile`, `AppendFile`,
//! `LoadFile`.

use crate::error::{ClientError, Result};
use crate::inode;
use crate::store::{DataStore, KeyStore};
use crate::types::{DataBlockPayload, SharingRecordPayload};
use rsa::{RsaPrivateKey, RsaPublicKey};
use securestore_core::{derivation, envelope, primitives};
use tracing::debug;

/// A fresh 16-byte address, hex-encoded, for a sharing record or data
/// block. Unlike user/inode addresses these are not derived from
/// credentials; they are opaque random handles the sharing record binds
/// together.
pub(crate) fn random_address() -> String {
    hex::encode(primitives::random(16))
}

/// A fresh random symmetric key in the same hex-encoded, split-key shape
/// as `derivation::user_symkey` (first 16 decoded bytes are the AES key,
/// the full decoded value is the HMAC key).
pub(crate) fn random_symkey_hex() -> String {
    hex::encode(primitives::random(32))
}

pub(crate) fn read_sharing_record<D: DataStore>(
    data: &D,
    address: &str,
    key_hex: &str,
) -> Result<SharingRecordPayload> {
    let split = derivation::SplitKey::from_hex(key_hex)?;
    let ciphertext = data.get(address).ok_or(ClientError::NotFound("sharing record"))?;
    let payload: SharingRecordPayload =
        envelope::open_symmetric(&ciphertext, address, &split.hmac, &split.aes)?;
    if payload.addresses.len() != payload.keys.len() {
        return Err(ClientError::IntegrityError(
            "sharing record address/key list length mismatch".into(),
        ));
    }
    Ok(payload)
}

pub(crate) fn write_sharing_record<D: DataStore>(
    data: &D,
    address: &str,
    key_hex: &str,
    payload: SharingRecordPayload,
) -> Result<()> {
    let split = derivation::SplitKey::from_hex(key_hex)?;
    let sealed = envelope::seal_symmetric(payload, address, &split.hmac, &split.aes)?;
    data.delete(address);
    data.set(address, sealed);
    Ok(())
}

pub(crate) fn read_data_block<D: DataStore>(data: &D, address: &str, key_hex: &str) -> Result<Vec<u8>> {
    let split = derivation::SplitKey::from_hex(key_hex)?;
    let ciphertext = data.get(address).ok_or(ClientError::NotFound("data block"))?;
    let payload: DataBlockPayload = envelope::open_symmetric(&ciphertext, address, &split.hmac, &split.aes)?;
    Ok(payload.value)
}

pub(crate) fn write_data_block<D: DataStore>(
    data: &D,
    address: &str,
    key_hex: &str,
    value: &[u8],
) -> Result<()> {
    let split = derivation::SplitKey::from_hex(key_hex)?;
    let sealed = envelope::seal_symmetric(DataBlockPayload { value: value.to_vec() }, address, &split.hmac, &split.aes)?;
    data.delete(address);
    data.set(address, sealed);
    Ok(())
}

/// `StoreFile`: (re)writes `filename` as a fresh single-block file.
///
/// Storing over an existing filename resets it to a single fresh block
/// containing the new data, identical to the first-store path, rather
/// than reusing the old sharing record and leaving its address/key lists
/// out of sync with the replaced contents.
#[allow(clippy::too_many_arguments)]
pub(crate) fn store_file<D: DataStore, K: KeyStore>(
    data: &D,
    _keys: &K,
    username: &str,
    password: &str,
    private_key: &RsaPrivateKey,
    public_key: &RsaPublicKey,
    filename: &str,
    file_data: &[u8],
) -> Result<()> {
    let block_addr = random_address();
    let block_key = random_symkey_hex();
    write_data_block(data, &block_addr, &block_key, file_data)?;

    let sr_addr = random_address();
    let sr_key = random_symkey_hex();
    let sharing = SharingRecordPayload {
        record_type: SharingRecordPayload::TYPE_TAG.to_string(),
        main_author: username.to_string(),
        addresses: vec![block_addr],
        keys: vec![block_key],
    };
    write_sharing_record(data, &sr_addr, &sr_key, sharing)?;

    inode::write_inode(data, username, password, filename, private_key, public_key, &sr_addr, &sr_key)?;
    debug!(filename, "stored file");
    Ok(())
}

/// `AppendFile`: writes exactly one new data block plus a rewritten
/// sharing record, regardless of the file's current length.
pub(crate) fn append_file<D: DataStore, K: KeyStore>(
    data: &D,
    keys: &K,
    username: &str,
    password: &str,
    private_key: &RsaPrivateKey,
    filename: &str,
    append_data: &[u8],
) -> Result<()> {
    let fields = inode::read_inode(data, keys, username, password, filename, private_key)?;
    let mut sharing = read_sharing_record(data, &fields.sh_record_addr, &fields.sh_record_key)?;

    let block_addr = random_address();
    let block_key = random_symkey_hex();
    write_data_block(data, &block_addr, &block_key, append_data)?;

    sharing.addresses.push(block_addr);
    sharing.keys.push(block_key);
    write_sharing_record(data, &fields.sh_record_addr, &fields.sh_record_key, sharing)?;
    debug!(filename, "appended to file");
    Ok(())
}

/// `LoadFile`: traverses inode → sharing record → data blocks in order,
/// verifying every hop, and fails on the first integrity violation.
pub(crate) fn load_file<D: DataStore, K: KeyStore>(
    data: &D,
    keys: &K,
    username: &str,
    password: &str,
    private_key: &RsaPrivateKey,
    filename: &str,
) -> Result<Vec<u8>> {
    let fields = inode::read_inode(data, keys, username, password, filename, private_key)?;
    let sharing = read_sharing_record(data, &fields.sh_record_addr, &fields.sh_record_key)?;

    let mut out = Vec::new();
    for (address, key_hex) in sharing.addresses.iter().zip(sharing.keys.iter()) {
        let block = read_data_block(data, address, key_hex)?;
        out.extend_from_slice(&block);
    }
    Ok(out)
}
