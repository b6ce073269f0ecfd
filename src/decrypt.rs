//! 文件解封（解密）流程
//!
//! 1. 解析并校验 Header
//! 2. 用 Header 中的 salt 与 KDF 参数派生密钥
//! 3. 以 Header 字节作为 AAD 校验并解密
//! 4. 认证通过后才原子写出明文

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::info;
use zeroize::Zeroizing;

use crate::crypto::AeadContext;
use crate::crypto::kdf;
use crate::crypto::padding::NoPadding;
use crate::error::{AeadError, Result};
use crate::format::header::{HEADER_SIZE, Header};
use crate::fs::atomic::write_atomic;

pub fn decrypt_file(input_path: &Path, output_path: &Path, password: &str) -> Result<()> {
    let data = fs::read(input_path)?;

    let (header, body) = Header::parse(&data)?;

    let key = kdf::derive_key(password, &header.salt, &header.kdf)?;
    let ctx = AeadContext::new(header.cipher, header.mode, &NoPadding, key.to_vec())?;

    let split = body
        .len()
        .checked_sub(ctx.tag_len())
        .ok_or_else(|| AeadError::Envelope("truncated ciphertext".into()))?;
    let (ciphertext, tag) = body.split_at(split);

    let plaintext = Zeroizing::new(ctx.decrypt(&header.iv, ciphertext, tag, &data[..HEADER_SIZE])?);

    write_atomic(output_path, |file| file.write_all(&plaintext))?;

    info!(cipher = %header.cipher, bytes = plaintext.len(), "opened file");
    Ok(())
}
