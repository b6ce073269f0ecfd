//! 文件封装（加密）流程
//!
//! 1. 生成 salt 与 IV
//! 2. 使用 KDF 从口令派生密钥
//! 3. 构造 AeadContext，以序列化后的 Header 作为 AAD 加密
//! 4. 原子写出 `header || ciphertext || tag`

use std::fs;
use std::io::Write;
use std::path::Path;

use rand::{RngCore, rngs::OsRng};
use tracing::info;
use zeroize::Zeroizing;

use crate::algorithm::CipherKind;
use crate::crypto::AeadContext;
use crate::crypto::kdf::{self, KdfParams};
use crate::crypto::padding::NoPadding;
use crate::error::Result;
use crate::format::header::{Header, IV_SIZE};
use crate::fs::atomic::write_atomic;

pub fn encrypt_file(
    input_path: &Path,
    output_path: &Path,
    password: &str,
    cipher: CipherKind,
    params: &KdfParams,
) -> Result<()> {
    let plaintext = Zeroizing::new(fs::read(input_path)?);

    let salt = kdf::generate_salt();
    let mut iv = [0u8; IV_SIZE];
    OsRng.fill_bytes(&mut iv);

    let key = kdf::derive_key(password, &salt, params)?;
    let ctx = AeadContext::new(cipher, cipher.mode(), &NoPadding, key.to_vec())?;

    let header = Header::new(cipher, *params, salt, iv);
    let header_bytes = header.to_bytes();

    let sealed = ctx.encrypt(&iv, &plaintext, &header_bytes)?;

    write_atomic(output_path, |file| {
        file.write_all(&header_bytes)?;
        file.write_all(&sealed.ciphertext)?;
        file.write_all(&sealed.tag)
    })?;

    info!(%cipher, bytes = plaintext.len(), "sealed file");
    Ok(())
}
