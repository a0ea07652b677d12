//! Cryptographic Utilities
//!
//! Primitives used to recover the 3DS API key from the directory-server
//! configuration: SHA-512 key derivation input, standard Base64, and
//! AES-256 in CTR mode (128-bit big-endian counter, no padding).

use aes::Aes256;
use base64::{Engine, engine::general_purpose};
use ctr::cipher::{KeyIvInit, StreamCipher};
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha512};
use thiserror::Error;

type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// AES-256 key length in bytes
pub const AES256_KEY_LEN: usize = 32;

/// AES block length, which is also the CTR initial counter length
pub const AES_BLOCK_LEN: usize = 16;

/// Cipher setup errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("Invalid IV length: expected {expected} bytes, got {actual}")]
    InvalidIvLength { expected: usize, actual: usize },
}

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Compute SHA-512 hash
pub fn sha512(data: &[u8]) -> [u8; 64] {
    let mut hasher = Sha512::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Encode bytes as base64
pub fn to_base64(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

/// Decode base64 to bytes
pub fn from_base64(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD.decode(s)
}

/// Apply the AES-256-CTR keystream to `data`
///
/// CTR is symmetric, so this both encrypts and decrypts.
///
/// ## Arguments
/// * `key` - 32-byte AES-256 key
/// * `iv` - 16-byte initial counter block
/// * `data` - Plaintext or ciphertext, any length
pub fn aes256_ctr_apply(key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>, CipherError> {
    if key.len() != AES256_KEY_LEN {
        return Err(CipherError::InvalidKeyLength {
            expected: AES256_KEY_LEN,
            actual: key.len(),
        });
    }
    if iv.len() != AES_BLOCK_LEN {
        return Err(CipherError::InvalidIvLength {
            expected: AES_BLOCK_LEN,
            actual: iv.len(),
        });
    }

    let mut cipher =
        Aes256Ctr::new_from_slices(key, iv).map_err(|_| CipherError::InvalidKeyLength {
            expected: AES256_KEY_LEN,
            actual: key.len(),
        })?;
    let mut buffer = data.to_vec();
    cipher.apply_keystream(&mut buffer);
    Ok(buffer)
}

/// Encrypt `plaintext` under a fresh random IV and return `iv || ciphertext`
///
/// This is the layout the directory server uses for the encrypted API key.
pub fn seal_aes256_ctr(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
    let iv = random_bytes(AES_BLOCK_LEN);
    let ciphertext = aes256_ctr_apply(key, &iv, plaintext)?;

    let mut sealed = Vec::with_capacity(AES_BLOCK_LEN + ciphertext.len());
    sealed.extend_from_slice(&iv);
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}
