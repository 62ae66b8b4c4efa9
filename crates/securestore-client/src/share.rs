//! Share / receive / revoke protocol.

use crate::error::{ClientError, Result};
use crate::file_ops::{random_address, random_symkey_hex, read_data_block, read_sharing_record, write_data_block, write_sharing_record};
use crate::inode;
use crate::store::{DataStore, KeyStore};
use crate::types::CapabilityPayload;
use rsa::{RsaPrivateKey, RsaPublicKey};
use securestore_core::{derivation, envelope, primitives};
use tracing::{debug, warn};

/// `ShareFile`: the owner's path. Verifies the entire chain end-to-end
/// (including every data block's HMAC and self-address) before issuing a
/// capability, since sharing must not succeed over a corrupted file.
/// Returns the hex-encoded capability string.
pub(crate) fn share_file<D: DataStore, K: KeyStore>(
    data: &D,
    keys: &K,
    username: &str,
    password: &str,
    private_key: &RsaPrivateKey,
    filename: &str,
    recipient: &str,
) -> Result<String> {
    let fields = inode::read_inode(data, keys, username, password, filename, private_key)?;
    let sharing = read_sharing_record(data, &fields.sh_record_addr, &fields.sh_record_key)?;
    for (address, key_hex) in sharing.addresses.iter().zip(sharing.keys.iter()) {
        read_data_block(data, address, key_hex)?;
    }

    let recipient_pub_der = keys.get(recipient).ok_or(ClientError::NotFound("recipient public key"))?;
    let recipient_pub = primitives::decode_public_key(&recipient_pub_der)?;

    let capability = CapabilityPayload {
        sh_record_addr: fields.sh_record_addr,
        sh_record_key: fields.sh_record_key,
    };
    let envelope_bytes = envelope::seal_asymmetric(capability, private_key, &recipient_pub)?;
    debug!(filename, recipient, "issued sharing capability");
    Ok(hex::encode(envelope_bytes))
}

/// `ReceiveFile`: materializes a private inode pointing at the sender's
/// sharing record, after verifying the capability was issued by `sender`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn receive_file<D: DataStore, K: KeyStore>(
    data: &D,
    keys: &K,
    username: &str,
    password: &str,
    private_key: &RsaPrivateKey,
    public_key: &RsaPublicKey,
    filename: &str,
    sender: &str,
    capability_hex: &str,
) -> Result<()> {
    let envelope_bytes = hex::decode(capability_hex).map_err(|_| {
        ClientError::IntegrityError("capability is not valid hex".into())
    })?;

    let sender_pub_der = keys.get(sender).ok_or(ClientError::NotFound("sender public key"))?;
    let sender_pub = primitives::decode_public_key(&sender_pub_der)?;

    let capability: CapabilityPayload = envelope::open_asymmetric(&envelope_bytes, private_key, &sender_pub)?;

    let existing_addr = derivation::inode_address(username, password, filename)?;
    if data.get(&existing_addr).is_some() {
        warn!(filename, "receive_file refused: filename already in use");
        return Err(ClientError::AlreadyExists(filename.to_string()));
    }

    inode::write_inode(
        data,
        username,
        password,
        filename,
        private_key,
        public_key,
        &capability.sh_record_addr,
        &capability.sh_record_key,
    )?;
    debug!(filename, sender, "received shared file");
    Ok(())
}

/// `RevokeFile`: re-keys the sharing record and relocates every data
/// block, so that no address or key known to a revoked recipient still
/// maps to current ciphertext. Each block's symmetric key is not rotated
/// (only its address moves and it is re-enveloped under a fresh IV);
/// the address is unknown to the revoked party post-rotation, which is
/// sufficient to sever access.
pub(crate) fn revoke_file<D: DataStore, K: KeyStore>(
    data: &D,
    keys: &K,
    username: &str,
    password: &str,
    private_key: &RsaPrivateKey,
    public_key: &RsaPublicKey,
    filename: &str,
) -> Result<()> {
    let fields = inode::read_inode(data, keys, username, password, filename, private_key)?;
    let sharing = read_sharing_record(data, &fields.sh_record_addr, &fields.sh_record_key)?;

    let mut new_addresses = Vec::with_capacity(sharing.addresses.len());
    for (old_address, key_hex) in sharing.addresses.iter().zip(sharing.keys.iter()) {
        let value = read_data_block(data, old_address, key_hex)?;
        let new_address = random_address();
        write_data_block(data, &new_address, key_hex, &value)?;
        data.delete(old_address);
        new_addresses.push(new_address);
    }

    let new_sr_addr = random_address();
    let new_sr_key = random_symkey_hex();
    write_sharing_record(
        data,
        &new_sr_addr,
        &new_sr_key,
        crate::types::SharingRecordPayload {
            record_type: sharing.record_type,
            main_author: sharing.main_author,
            addresses: new_addresses,
            keys: sharing.keys,
        },
    )?;
    data.delete(&fields.sh_record_addr);

    inode::write_inode(data, username, password, filename, private_key, public_key, &new_sr_addr, &new_sr_key)?;
    debug!(filename, "revoked sharing, relocated sharing record and all data blocks");
    Ok(())
}
