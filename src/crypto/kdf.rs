//! 密钥派生函数（KDF）模块
//!
//! 通过 Argon2id 将口令派生为 32 字节 AEAD 密钥，供文件封装使用。
//! 适配器本身不负责密钥管理，这里只服务于命令行与文件接口。
//!
//! 约束：
//! - 每个封装文件使用独立的随机 salt，严禁复用
//! - 派生出的密钥以 `Zeroizing` 返回，离开作用域后自动清零

use argon2::{Algorithm, Argon2, Params, Version};
use rand::{RngCore, rngs::OsRng};
use zeroize::Zeroizing;

use crate::error::AeadError;

/// 派生密钥长度（256-bit）
pub const KEY_LEN: usize = 32;

pub const SALT_LEN: usize = 16;

/// 允许的最大内存成本：1 GiB
pub const MAX_MEMORY_KIB: u32 = 1024 * 1024;

pub const MAX_ITERATIONS: u32 = 16;

pub const MAX_PARALLELISM: u32 = 8;

/// Argon2id 参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// 内存成本（KiB）
    pub memory_kib: u32,
    /// 迭代次数
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 64 * 1024,
            iterations: 3,
            parallelism: 1,
        }
    }
}

impl KdfParams {
    /// 参数可能来自不可信的文件头，派生前必须先做上限检查。
    pub fn within_limits(&self) -> bool {
        self.memory_kib <= MAX_MEMORY_KIB
            && (1..=MAX_ITERATIONS).contains(&self.iterations)
            && (1..=MAX_PARALLELISM).contains(&self.parallelism)
    }

    fn to_argon2(self) -> Result<Params, AeadError> {
        if !self.within_limits() {
            return Err(AeadError::Kdf);
        }
        Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(KEY_LEN),
        )
        .map_err(|_| AeadError::Kdf)
    }
}

/// 生成随机 salt
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// 根据口令和 salt 派生对称密钥
pub fn derive_key(
    password: &str,
    salt: &[u8],
    params: &KdfParams,
) -> Result<Zeroizing<[u8; KEY_LEN]>, AeadError> {
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params.to_argon2()?);

    let mut key = Zeroizing::new([0u8; KEY_LEN]);

    argon2
        .hash_password_into(password.as_bytes(), salt, &mut key[..])
        .map_err(|_| AeadError::Kdf)?;

    Ok(key)
}
