//! AES-256-GCM 原语封装

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit, Payload},
};

use crate::error::{AeadError, ConfigurationError};

pub const KEY_SIZE: usize = 32;
pub const NONCE_SIZE: usize = 12;
pub const TAG_SIZE: usize = 16;
pub const BLOCK_SIZE: usize = 16;

/// 返回 `ciphertext || tag`
pub fn encrypt(
    key: &[u8],
    nonce: &[u8],
    plaintext: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>, AeadError> {
    let cipher = new_cipher(key)?;
    check_nonce(nonce)?;

    cipher
        .encrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|_| AeadError::Encryption)
}

/// `combined` 为 `ciphertext || tag`；认证失败时不返回任何明文
pub fn decrypt(
    key: &[u8],
    nonce: &[u8],
    combined: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>, AeadError> {
    let cipher = new_cipher(key)?;
    check_nonce(nonce)?;

    cipher
        .decrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: combined,
                aad,
            },
        )
        .map_err(|_| AeadError::Authentication)
}

fn new_cipher(key: &[u8]) -> Result<Aes256Gcm, AeadError> {
    Aes256Gcm::new_from_slice(key).map_err(|_| {
        AeadError::Configuration(ConfigurationError::InvalidKeySize {
            expected: KEY_SIZE,
            actual: key.len(),
        })
    })
}

fn check_nonce(nonce: &[u8]) -> Result<(), AeadError> {
    if nonce.len() != NONCE_SIZE {
        return Err(AeadError::InvalidIvSize {
            expected: NONCE_SIZE,
            actual: nonce.len(),
        });
    }
    Ok(())
}
