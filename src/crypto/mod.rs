//! 加解密相关模块。
//!
//! [`Crypto`] 是所有适配器对外暴露的统一接口，注册表中的构造函数
//! 返回的就是它的 trait object。

pub mod aead;
pub mod kdf;
pub mod padding;

use crate::algorithm::CipherKind;
use crate::error::Result;

pub use aead::{AeadContext, EncryptedData};

pub trait Crypto: Send + Sync {
    fn cipher(&self) -> CipherKind;

    fn encrypt(&self, iv: &[u8], plaintext: &[u8], aad: &[u8]) -> Result<EncryptedData>;

    fn decrypt(&self, iv: &[u8], ciphertext: &[u8], tag: &[u8], aad: &[u8]) -> Result<Vec<u8>>;

    /// 所需 IV 长度（字节）
    fn iv_size(&self) -> usize;

    fn block_size(&self) -> usize;
}
