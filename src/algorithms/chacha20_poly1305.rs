//! ChaCha20-Poly1305（IETF，RFC 8439）原语封装

use chacha20poly1305::{
    ChaCha20Poly1305, Nonce,
    aead::{Aead, KeyInit, Payload},
};

use crate::error::{AeadError, ConfigurationError};

pub const KEY_SIZE: usize = 32;
pub const NONCE_SIZE: usize = 12;
pub const TAG_SIZE: usize = 16;

/// 流密码，无需块对齐
pub const BLOCK_SIZE: usize = 1;

/// 返回 `ciphertext || tag`
pub fn encrypt(
    key: &[u8],
    nonce: &[u8],
    plaintext: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>, AeadError> {
    let cipher = new_cipher(key)?;
    let nonce = checked_nonce(nonce)?;

    cipher
        .encrypt(
            nonce,
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
    let nonce = checked_nonce(nonce)?;

    cipher
        .decrypt(
            nonce,
            Payload {
                msg: combined,
                aad,
            },
        )
        .map_err(|_| AeadError::Authentication)
}

fn new_cipher(key: &[u8]) -> Result<ChaCha20Poly1305, AeadError> {
    ChaCha20Poly1305::new_from_slice(key).map_err(|_| {
        AeadError::Configuration(ConfigurationError::InvalidKeySize {
            expected: KEY_SIZE,
            actual: key.len(),
        })
    })
}

fn checked_nonce(nonce: &[u8]) -> Result<&Nonce, AeadError> {
    if nonce.len() != NONCE_SIZE {
        return Err(AeadError::InvalidIvSize {
            expected: NONCE_SIZE,
            actual: nonce.len(),
        });
    }
    Ok(Nonce::from_slice(nonce))
}
