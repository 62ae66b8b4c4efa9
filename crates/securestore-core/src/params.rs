/// Fixed parameters shared by derivation and the envelope codec.
pub struct Params;

impl Params {
    /// KDF time-cost parameter.
    pub const KDF_COST: u32 = 10;

    /// AES block size in bytes; also the CFB IV length.
    pub const AES_BLOCK: usize = 16;

    /// Maximum plaintext bytes per RSA-OAEP chunk, derived from a 2048-bit
    /// modulus (256 bytes) and SHA-256 OAEP overhead: 256 - 2*32 - 2 = 190.
    pub const RSA_CHUNK: usize = 190;

    /// Fixed RSA-OAEP label used for every encryption in this system.
    pub const RSA_LABEL: &'static str = "Tag";

    /// RSA modulus size in bits used by `rsa_generate`.
    pub const RSA_KEY_BITS: usize = 2048;
}
