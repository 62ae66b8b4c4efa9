//! Authenticated encryption envelopes.
//!
//! Two envelope shapes, expressed as two free function pairs rather than
//! an inheritance hierarchy: a symmetric MAC-then-CFB envelope for
//! secret-key holders, and an asymmetric sign-then-chunked-RSA-OAEP
//! envelope for owner-only structures.

use crate::codec::{from_canonical_bytes, to_canonical_bytes};
use crate::error::CoreError;
use crate::params::Params;
use crate::primitives;
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Wire shape of a symmetrically sealed record: the self-reference
/// address the record claims to live at, the MAC over the inner payload,
/// and the payload itself.
#[derive(Serialize, Deserialize)]
struct Sealed<T> {
    key_addr: String,
    mac: Vec<u8>,
    payload: T,
}

/// Wire shape of a signed (pre-chunking) record.
#[derive(Serialize, Deserialize)]
struct Signed<T> {
    payload: T,
    signature: Vec<u8>,
}

/// Seal `payload` as a symmetric envelope: MAC-then-encrypt under
/// `aes_key16`/`hmac_key`, with a fresh random IV, self-addressed at
/// `key_addr`.
pub fn seal_symmetric<T: Serialize>(
    payload: T,
    key_addr: &str,
    hmac_key: &[u8],
    aes_key16: &[u8],
) -> Result<Vec<u8>, CoreError> {
    let inner_bytes = to_canonical_bytes(&payload)?;
    let mac = primitives::hmac(hmac_key, &inner_bytes);
    let sealed = Sealed { key_addr: key_addr.to_string(), mac, payload };
    let m = to_canonical_bytes(&sealed)?;
    let iv = primitives::random(Params::AES_BLOCK);
    let ct = primitives::cfb_encrypt(aes_key16, &iv, &m)?;
    let mut out = iv;
    out.extend_from_slice(&ct);
    Ok(out)
}

/// Open a symmetric envelope produced by [`seal_symmetric`]. Verifies the
/// inner MAC and that the record's self-reference matches `expected_addr`
/// (the "key-value-swap" check).
pub fn open_symmetric<T: DeserializeOwned + Serialize>(
    ciphertext: &[u8],
    expected_addr: &str,
    hmac_key: &[u8],
    aes_key16: &[u8],
) -> Result<T, CoreError> {
    if ciphertext.len() < Params::AES_BLOCK {
        return Err(CoreError::Integrity("envelope shorter than one IV"));
    }
    let (iv, body) = ciphertext.split_at(Params::AES_BLOCK);
    let m = primitives::cfb_decrypt(aes_key16, iv, body)?;
    // Anything reaching this deserialization comes straight from untrusted
    // storage: CFB self-synchronization means a single flipped ciphertext
    // byte corrupts the following block wholesale, which often lands on a
    // postcard length prefix and fails to parse rather than merely failing
    // the MAC below. A malformed decrypted body is tampering, not a bug, so
    // it must be indistinguishable from a MAC mismatch to the caller.
    let sealed: Sealed<T> = from_canonical_bytes(&m)
        .map_err(|_| CoreError::Integrity("envelope payload is malformed"))?;

    let inner_bytes = to_canonical_bytes(&sealed.payload)?;
    let recomputed_mac = primitives::hmac(hmac_key, &inner_bytes);
    if !primitives::equal_ct(&recomputed_mac, &sealed.mac) {
        return Err(CoreError::Integrity("MAC mismatch"));
    }
    if !primitives::equal_ct(sealed.key_addr.as_bytes(), expected_addr.as_bytes()) {
        return Err(CoreError::Integrity("KeyAddr self-reference mismatch"));
    }
    Ok(sealed.payload)
}

/// Split `data` into chunks of at most `Params::RSA_CHUNK` bytes.
fn chunk(data: &[u8]) -> Vec<&[u8]> {
    data.chunks(Params::RSA_CHUNK).collect()
}

/// Seal `payload` as an asymmetric envelope: sign with `signer_key`, then
/// RSA-OAEP-encrypt the signed bundle in chunks to `recipient_pub`.
pub fn seal_asymmetric<T: Serialize>(
    payload: T,
    signer_key: &RsaPrivateKey,
    recipient_pub: &RsaPublicKey,
) -> Result<Vec<u8>, CoreError> {
    let payload_bytes = to_canonical_bytes(&payload)?;
    let signature = primitives::rsa_sign(signer_key, &payload_bytes)?;
    let signed = Signed { payload, signature };
    let m = to_canonical_bytes(&signed)?;

    let mut chunks = Vec::new();
    for piece in chunk(&m) {
        chunks.push(primitives::rsa_encrypt(recipient_pub, piece, Params::RSA_LABEL)?);
    }
    to_canonical_bytes(&chunks)
}

/// Open an asymmetric envelope produced by [`seal_asymmetric`]. Chunks are
/// RSA-OAEP-decrypted and appended to a zero-length buffer (never
/// stripped from a zero-initialized one, since a legitimate payload may
/// start with `0x00`), then the embedded signature is verified with
/// `verify_pub`.
pub fn open_asymmetric<T: DeserializeOwned + Serialize>(
    envelope: &[u8],
    recipient_key: &RsaPrivateKey,
    verify_pub: &RsaPublicKey,
) -> Result<T, CoreError> {
    // The chunk list, each chunk's RSA-OAEP decryption, and the reassembled
    // plaintext are all derived from bytes an attacker could have tampered
    // with in storage; any failure at those steps must surface the same way
    // a signature mismatch would, not as a distinguishable crypto error.
    let chunks: Vec<Vec<u8>> = from_canonical_bytes(envelope)
        .map_err(|_| CoreError::Integrity("chunk list is malformed"))?;
    let mut assembled = Vec::new();
    for piece in &chunks {
        let decrypted = primitives::rsa_decrypt(recipient_key, piece, Params::RSA_LABEL)
            .map_err(|_| CoreError::Integrity("RSA-OAEP chunk failed to decrypt"))?;
        assembled.extend_from_slice(&decrypted);
    }

    let signed: Signed<T> = from_canonical_bytes(&assembled)
        .map_err(|_| CoreError::Integrity("assembled envelope payload is malformed"))?;
    let payload_bytes = to_canonical_bytes(&signed.payload)?;
    let ok = primitives::rsa_verify(verify_pub, &payload_bytes, &signed.signature)?;
    if !ok {
        return Err(CoreError::Integrity("signature verification failed"));
    }
    Ok(signed.payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::rsa_generate;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
    struct Payload {
        value: Vec<u8>,
    }

    #[test]
    fn symmetric_round_trips() {
        let key = primitives::random(16);
        let addr = "addr123";
        let payload = Payload { value: b"hello world".to_vec() };
        let ct = seal_symmetric(payload.clone(), addr, &key, &key[..16]).unwrap();
        let opened: Payload = open_symmetric(&ct, addr, &key, &key[..16]).unwrap();
        assert_eq!(payload, opened);
    }

    #[test]
    fn symmetric_rejects_tamper() {
        let key = primitives::random(16);
        let addr = "addr123";
        let payload = Payload { value: b"hello world".to_vec() };
        let mut ct = seal_symmetric(payload, addr, &key, &key[..16]).unwrap();
        let last = ct.len() - 1;
        ct[last] ^= 0x01;
        let res: Result<Payload, CoreError> = open_symmetric(&ct, addr, &key, &key[..16]);
        assert!(matches!(res, Err(CoreError::Integrity(_))));
    }

    #[test]
    fn symmetric_rejects_address_swap() {
        let key = primitives::random(16);
        let payload = Payload { value: b"hello world".to_vec() };
        let ct = seal_symmetric(payload, "addr-a", &key, &key[..16]).unwrap();
        let res: Result<Payload, CoreError> = open_symmetric(&ct, "addr-b", &key, &key[..16]);
        assert!(matches!(res, Err(CoreError::Integrity(_))));
    }

    #[test]
    fn asymmetric_round_trips() {
        let (pk, sk) = rsa_generate().unwrap();
        let payload = Payload { value: b"a sharing-record key and address".to_vec() };
        let env = seal_asymmetric(payload.clone(), &sk, &pk).unwrap();
        let opened: Payload = open_asymmetric(&env, &sk, &pk).unwrap();
        assert_eq!(payload, opened);
    }

    #[test]
    fn asymmetric_rejects_wrong_signer() {
        let (pk, sk) = rsa_generate().unwrap();
        let (_other_pk, other_sk) = rsa_generate().unwrap();
        let payload = Payload { value: b"capability".to_vec() };
        let env = seal_asymmetric(payload, &other_sk, &pk).unwrap();
        let res: Result<Payload, CoreError> = open_asymmetric(&env, &sk, &pk);
        assert!(matches!(res, Err(CoreError::Integrity(_))));
    }

    #[test]
    fn asymmetric_handles_leading_zero_payload_byte() {
        let (pk, sk) = rsa_generate().unwrap();
        let payload = Payload { value: vec![0u8, 0u8, 1, 2, 3] };
        let env = seal_asymmetric(payload.clone(), &sk, &pk).unwrap();
        let opened: Payload = open_asymmetric(&env, &sk, &pk).unwrap();
        assert_eq!(payload, opened);
    }

    #[test]
    fn asymmetric_chunks_large_payloads() {
        let (pk, sk) = rsa_generate().unwrap();
        let payload = Payload { value: vec![7u8; Params::RSA_CHUNK * 3] };
        let env = seal_asymmetric(payload.clone(), &sk, &pk).unwrap();
        let opened: Payload = open_asymmetric(&env, &sk, &pk).unwrap();
        assert_eq!(payload, opened);
    }
}
