//! AES-256-CTR payload encryption.
//!
//! CTR with a big-endian 128-bit counter seeded from the 16-byte IV, so the
//! keystream matches OpenSSL's `EVP_aes_256_ctr`. Encryption and decryption
//! are the same keystream XOR.

use aes::Aes256;
use ctr::cipher::{KeyIvInit, StreamCipher};
use ctr::Ctr128BE;

use crate::error::{ModemError, Result};

type Aes256Ctr = Ctr128BE<Aes256>;

/// Demo key baked into both endpoints. A deployment would negotiate a random
/// IV per message out of band.
pub const DEMO_KEY: [u8; 32] = *b"01234567890123456789012345678901";
pub const DEMO_IV: [u8; 16] = *b"0123456789012345";

pub fn encrypt(key: &[u8; 32], iv: &[u8; 16], plaintext: &[u8]) -> Result<Vec<u8>> {
    let mut buf = plaintext.to_vec();
    Aes256Ctr::new(key.into(), iv.into())
        .try_apply_keystream(&mut buf)
        .map_err(|_| ModemError::EncryptFailed)?;
    Ok(buf)
}

pub fn decrypt(key: &[u8; 32], iv: &[u8; 16], ciphertext: &[u8]) -> Result<Vec<u8>> {
    let mut buf = ciphertext.to_vec();
    Aes256Ctr::new(key.into(), iv.into())
        .try_apply_keystream(&mut buf)
        .map_err(|_| ModemError::DecryptFailed)?;
    Ok(buf)
}
