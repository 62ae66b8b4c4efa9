//! Inner payloads of the four persisted record shapes.
//!
//! The self-reference address, MAC/signature, and chunk framing that wrap
//! these payloads are handled uniformly by `securestore_core::envelope`
//! rather than duplicated on each struct.

use serde::{Deserialize, Serialize};

/// Stored at `A_u`, sealed as a symmetric envelope under `K_u`.
#[derive(Serialize, Deserialize, Clone)]
pub(crate) struct UserRecordPayload {
    pub username: String,
    pub password: String,
    /// PKCS#8 DER encoding of the owner's RSA private key.
    pub private_key_der: Vec<u8>,
}

/// Stored at `A_i`, sealed as an asymmetric envelope to the holder's own
/// RSA key.
#[derive(Serialize, Deserialize, Clone)]
pub(crate) struct InodePayload {
    pub filename: String,
    pub sh_record_addr: String,
    /// Hex encoding of the sharing record's symmetric key.
    pub sh_record_key: String,
}

/// Stored at `A_s`, sealed as a symmetric envelope under `K_s`.
#[derive(Serialize, Deserialize, Clone)]
pub(crate) struct SharingRecordPayload {
    pub record_type: String,
    pub main_author: String,
    pub addresses: Vec<String>,
    /// Hex encoding of each data block's symmetric key, index-aligned
    /// with `addresses`.
    pub keys: Vec<String>,
}

impl SharingRecordPayload {
    pub const TYPE_TAG: &'static str = "Sharing Record";
}

/// Stored at `A_d,i`, sealed as a symmetric envelope under `K_d,i`.
#[derive(Serialize, Deserialize, Clone)]
pub(crate) struct DataBlockPayload {
    pub value: Vec<u8>,
}

/// The capability payload conveyed by `share_file`/`receive_file`, sealed
/// as an asymmetric envelope to the recipient.
#[derive(Serialize, Deserialize, Clone)]
pub(crate) struct CapabilityPayload {
    pub sh_record_addr: String,
    pub sh_record_key: String,
}
