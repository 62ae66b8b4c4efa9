//! Uniform front for the cryptographic primitives this crate treats as
//! external collaborators: Argon2 KDF, AES-CFB, HMAC, RSA sign/verify,
//! RSA-OAEP encrypt/decrypt, a CSPRNG, and constant-time compare.
//!
//! Every key, nonce, and signature this module produces is opaque to
//! callers; nothing above this module reaches into an RSA or AES type
//! directly.

use crate::error::CoreError;
use crate::params::Params;
use aes::Aes128;
use argon2::{Argon2, Params as Argon2Params, Version};
use cfb_mode::cipher::{AsyncStreamCipher, KeyIvInit};
use hmac::{Hmac, Mac};
use rand::RngCore;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::signature::{RandomizedSigner, SignatureEncoding, Verifier};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

type Aes128CfbEnc = cfb_mode::Encryptor<Aes128>;
type Aes128CfbDec = cfb_mode::Decryptor<Aes128>;
type HmacSha256 = Hmac<Sha256>;

/// Argon2id memory cost in KiB; fixed so every caller derives compatible
/// keys. The scalar cost parameter taken by `kdf` maps to Argon2's
/// time-cost (iteration count).
const ARGON2_MEM_COST_KIB: u32 = 19_456;
const ARGON2_PARALLELISM: u32 = 1;
const ARGON2_OUTPUT_LEN: usize = 32;

/// `kdf(secret, salt, cost) -> 32-byte key`.
///
/// Wrapped in `Zeroizing` so the derived key material is wiped from
/// memory as soon as the last handle to it is dropped, rather than
/// lingering in a stack frame or allocator freelist.
pub fn kdf(secret: &[u8], salt: &[u8], cost: u32) -> Result<Zeroizing<[u8; 32]>, CoreError> {
    let params = Argon2Params::new(ARGON2_MEM_COST_KIB, cost, ARGON2_PARALLELISM, Some(ARGON2_OUTPUT_LEN))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);
    let mut out = Zeroizing::new([0u8; ARGON2_OUTPUT_LEN]);
    argon2.hash_password_into(secret, salt, &mut *out)?;
    Ok(out)
}

/// `kdf` using the default cost parameter.
pub fn kdf_default(secret: &[u8], salt: &[u8]) -> Result<Zeroizing<[u8; 32]>, CoreError> {
    kdf(secret, salt, Params::KDF_COST)
}

/// `hmac(key, bytes) -> tag`.
pub fn hmac(key: &[u8], bytes: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(bytes);
    mac.finalize().into_bytes().to_vec()
}

/// Constant-time byte comparison.
pub fn equal_ct(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    bool::from(a.ct_eq(b))
}

/// AES-CFB encryption. `key` must be 16 bytes; ciphertext length equals
/// plaintext length.
pub fn cfb_encrypt(key16: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CoreError> {
    if key16.len() != 16 || iv.len() != Params::AES_BLOCK {
        return Err(CoreError::Crypto("AES-CFB requires a 16-byte key and IV".into()));
    }
    let mut buf = plaintext.to_vec();
    let enc = Aes128CfbEnc::new_from_slices(key16, iv)
        .map_err(|_| CoreError::Crypto("invalid AES-CFB key/IV length".into()))?;
    enc.encrypt(&mut buf);
    Ok(buf)
}

/// AES-CFB decryption, the inverse of [`cfb_encrypt`].
pub fn cfb_decrypt(key16: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CoreError> {
    if key16.len() != 16 || iv.len() != Params::AES_BLOCK {
        return Err(CoreError::Crypto("AES-CFB requires a 16-byte key and IV".into()));
    }
    let mut buf = ciphertext.to_vec();
    let dec = Aes128CfbDec::new_from_slices(key16, iv)
        .map_err(|_| CoreError::Crypto("invalid AES-CFB key/IV length".into()))?;
    dec.decrypt(&mut buf);
    Ok(buf)
}

/// Fresh `n` random bytes from the OS CSPRNG.
pub fn random(n: usize) -> Vec<u8> {
    let mut out = vec![0u8; n];
    rand::rngs::OsRng.fill_bytes(&mut out);
    out
}

/// Generate a fresh RSA keypair (`Params::RSA_KEY_BITS` modulus).
pub fn rsa_generate() -> Result<(RsaPublicKey, RsaPrivateKey), CoreError> {
    let mut rng = rand::rngs::OsRng;
    let priv_key = RsaPrivateKey::new(&mut rng, Params::RSA_KEY_BITS)?;
    let pub_key = RsaPublicKey::from(&priv_key);
    Ok((pub_key, priv_key))
}

/// RSA-PSS(SHA-256) signature over `msg`.
pub fn rsa_sign(priv_key: &RsaPrivateKey, msg: &[u8]) -> Result<Vec<u8>, CoreError> {
    let signing_key = rsa::pss::SigningKey::<Sha256>::new(priv_key.clone());
    let mut rng = rand::rngs::OsRng;
    let sig = signing_key.sign_with_rng(&mut rng, msg);
    Ok(sig.to_vec())
}

/// Verify an RSA-PSS(SHA-256) signature over `msg`.
pub fn rsa_verify(pub_key: &RsaPublicKey, msg: &[u8], sig: &[u8]) -> Result<bool, CoreError> {
    let verifying_key = rsa::pss::VerifyingKey::<Sha256>::new(pub_key.clone());
    let signature = match rsa::pss::Signature::try_from(sig) {
        Ok(s) => s,
        Err(_) => return Ok(false),
    };
    Ok(verifying_key.verify(msg, &signature).is_ok())
}

/// RSA-OAEP(SHA-256) encryption of at most `Params::RSA_CHUNK` plaintext
/// bytes, bound to `label`.
pub fn rsa_encrypt(pub_key: &RsaPublicKey, plaintext: &[u8], label: &str) -> Result<Vec<u8>, CoreError> {
    if plaintext.len() > Params::RSA_CHUNK {
        return Err(CoreError::Crypto(format!(
            "RSA-OAEP plaintext of {} bytes exceeds the {}-byte chunk bound",
            plaintext.len(),
            Params::RSA_CHUNK
        )));
    }
    let mut rng = rand::rngs::OsRng;
    let padding = Oaep::new_with_label::<Sha256, _>(label);
    Ok(pub_key.encrypt(&mut rng, padding, plaintext)?)
}

/// RSA-OAEP(SHA-256) decryption, the inverse of [`rsa_encrypt`].
pub fn rsa_decrypt(priv_key: &RsaPrivateKey, ciphertext: &[u8], label: &str) -> Result<Vec<u8>, CoreError> {
    let padding = Oaep::new_with_label::<Sha256, _>(label);
    Ok(priv_key.decrypt(padding, ciphertext)?)
}

/// DER (PKCS#8) encoding of an RSA private key, for embedding in a
/// serialized record.
pub fn encode_private_key(key: &RsaPrivateKey) -> Result<Vec<u8>, CoreError> {
    let doc = key
        .to_pkcs8_der()
        .map_err(|e| CoreError::Crypto(format!("pkcs8 encode: {e}")))?;
    Ok(doc.as_bytes().to_vec())
}

/// Inverse of [`encode_private_key`].
pub fn decode_private_key(bytes: &[u8]) -> Result<RsaPrivateKey, CoreError> {
    RsaPrivateKey::from_pkcs8_der(bytes).map_err(|e| CoreError::Crypto(format!("pkcs8 decode: {e}")))
}

/// DER (SPKI) encoding of an RSA public key, for publishing to the
/// KeyStore.
pub fn encode_public_key(key: &RsaPublicKey) -> Result<Vec<u8>, CoreError> {
    let doc = key
        .to_public_key_der()
        .map_err(|e| CoreError::Crypto(format!("spki encode: {e}")))?;
    Ok(doc.as_bytes().to_vec())
}

/// Inverse of [`encode_public_key`].
pub fn decode_public_key(bytes: &[u8]) -> Result<RsaPublicKey, CoreError> {
    RsaPublicKey::from_public_key_der(bytes).map_err(|e| CoreError::Crypto(format!("spki decode: {e}")))
}

/// SHA-256 digest, used where a fixed-length fingerprint is convenient
/// (e.g. the hex addresses themselves are derived via [`kdf`], not this).
pub fn sha256(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cfb_round_trips() {
        let key = random(16);
        let iv = random(16);
        let pt = b"the quick brown fox";
        let ct = cfb_encrypt(&key, &iv, pt).unwrap();
        assert_eq!(ct.len(), pt.len());
        let back = cfb_decrypt(&key, &iv, &ct).unwrap();
        assert_eq!(back, pt);
    }

    #[test]
    fn hmac_is_deterministic_and_sensitive_to_input() {
        let key = b"key-material";
        let t1 = hmac(key, b"hello");
        let t2 = hmac(key, b"hello");
        let t3 = hmac(key, b"hellp");
        assert_eq!(t1, t2);
        assert_ne!(t1, t3);
    }

    #[test]
    fn equal_ct_rejects_length_and_content_mismatch() {
        assert!(equal_ct(b"abc", b"abc"));
        assert!(!equal_ct(b"abc", b"abd"));
        assert!(!equal_ct(b"abc", b"abcd"));
    }

    #[test]
    fn rsa_sign_verify_round_trips_and_rejects_tamper() {
        let (pk, sk) = rsa_generate().unwrap();
        let msg = b"capability payload";
        let sig = rsa_sign(&sk, msg).unwrap();
        assert!(rsa_verify(&pk, msg, &sig).unwrap());
        assert!(!rsa_verify(&pk, b"different payload", &sig).unwrap());
    }

    #[test]
    fn rsa_oaep_round_trips_under_matching_label_only() {
        let (pk, sk) = rsa_generate().unwrap();
        let pt = b"a 32 byte symmetric key..ish!!!!";
        let ct = rsa_encrypt(&pk, pt, "Tag").unwrap();
        let back = rsa_decrypt(&sk, &ct, "Tag").unwrap();
        assert_eq!(back, pt);
        assert!(rsa_decrypt(&sk, &ct, "WrongTag").is_err());
    }

    #[test]
    fn rsa_chunk_bound_is_enforced() {
        let (pk, _sk) = rsa_generate().unwrap();
        let too_big = vec![0u8; Params::RSA_CHUNK + 1];
        assert!(rsa_encrypt(&pk, &too_big, "Tag").is_err());
    }

    #[test]
    fn private_key_der_round_trips() {
        let (_pk, sk) = rsa_generate().unwrap();
        let der = encode_private_key(&sk).unwrap();
        let back = decode_private_key(&der).unwrap();
        assert_eq!(sk.to_pkcs8_der().unwrap().as_bytes(), back.to_pkcs8_der().unwrap().as_bytes());
    }
}
