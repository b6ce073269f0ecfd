//! 算法能力表。
//!
//! 每个受支持的 (cipher, mode) 组合对应一条静态 [`AlgorithmProfile`]：
//! 密钥 / 标签 / nonce 长度、块大小，以及一个可用性判定函数。
//! 能力表本身是纯数据，唯一依赖运行环境的部分是可用性判定。

pub mod hardware;

use std::fmt;
use std::str::FromStr;

use crate::algorithms::{aes_256_gcm, chacha20_poly1305};
use crate::error::{AeadError, ConfigurationError};

/// 支持的加密算法。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherKind {
    ChaCha20,
    Aes256,
}

impl CipherKind {
    pub const CHACHA20_ID: u8 = 1;
    pub const AES_256_ID: u8 = 2;

    pub fn to_u8(self) -> u8 {
        match self {
            Self::ChaCha20 => Self::CHACHA20_ID,
            Self::Aes256 => Self::AES_256_ID,
        }
    }

    pub fn from_u8(value: u8) -> Result<Self, AeadError> {
        match value {
            Self::CHACHA20_ID => Ok(Self::ChaCha20),
            Self::AES_256_ID => Ok(Self::Aes256),
            other => Err(AeadError::UnsupportedCipher(format!("cipher id {other}"))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::ChaCha20 => "chacha20",
            Self::Aes256 => "aes-256",
        }
    }

    /// 块大小。ChaCha20 是流密码，返回 1 表示无需对齐。
    pub fn block_size(self) -> usize {
        match self {
            Self::ChaCha20 => chacha20_poly1305::BLOCK_SIZE,
            Self::Aes256 => aes_256_gcm::BLOCK_SIZE,
        }
    }

    /// 本适配器为该算法接受的唯一模式。
    pub fn mode(self) -> ModeKind {
        match self {
            Self::ChaCha20 => ModeKind::Ecb,
            Self::Aes256 => ModeKind::Gcm,
        }
    }

    pub fn nonce_len(self) -> usize {
        match self {
            Self::ChaCha20 => chacha20_poly1305::NONCE_SIZE,
            Self::Aes256 => aes_256_gcm::NONCE_SIZE,
        }
    }
}

impl fmt::Display for CipherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CipherKind {
    type Err = AeadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chacha20" | "chacha20-poly1305" => Ok(Self::ChaCha20),
            "aes-256" | "aes256" | "aes-256-gcm" => Ok(Self::Aes256),
            _ => Err(AeadError::UnsupportedCipher(s.to_string())),
        }
    }
}

/// 分组模式。
///
/// ChaCha20 没有真正的分组模式，按惯例登记为 ECB。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeKind {
    Ecb,
    Gcm,
}

impl ModeKind {
    pub const ECB_ID: u8 = 1;
    pub const GCM_ID: u8 = 2;

    pub fn to_u8(self) -> u8 {
        match self {
            Self::Ecb => Self::ECB_ID,
            Self::Gcm => Self::GCM_ID,
        }
    }

    pub fn from_u8(value: u8) -> Result<Self, AeadError> {
        match value {
            Self::ECB_ID => Ok(Self::Ecb),
            Self::GCM_ID => Ok(Self::Gcm),
            other => Err(AeadError::UnsupportedCipher(format!("mode id {other}"))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Ecb => "ecb",
            Self::Gcm => "gcm",
        }
    }
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModeKind {
    type Err = AeadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ecb" => Ok(Self::Ecb),
            "gcm" => Ok(Self::Gcm),
            _ => Err(AeadError::UnsupportedCipher(format!("mode {s}"))),
        }
    }
}

/// 单个 (cipher, mode) 组合的静态参数。
#[derive(Debug, Clone, Copy)]
pub struct AlgorithmProfile {
    pub cipher: CipherKind,
    pub mode: ModeKind,
    pub key_len: usize,
    pub tag_len: usize,
    pub nonce_len: usize,
    pub block_size: usize,
    /// 每次构造与注册时都会重新调用。
    pub availability: fn() -> bool,
}

impl AlgorithmProfile {
    pub fn is_available(&self) -> bool {
        (self.availability)()
    }
}

fn always_available() -> bool {
    true
}

static NATIVE_PROFILES: [AlgorithmProfile; 2] = [
    AlgorithmProfile {
        cipher: CipherKind::ChaCha20,
        mode: ModeKind::Ecb,
        key_len: chacha20_poly1305::KEY_SIZE,
        tag_len: chacha20_poly1305::TAG_SIZE,
        nonce_len: chacha20_poly1305::NONCE_SIZE,
        block_size: chacha20_poly1305::BLOCK_SIZE,
        availability: always_available,
    },
    AlgorithmProfile {
        cipher: CipherKind::Aes256,
        mode: ModeKind::Gcm,
        key_len: aes_256_gcm::KEY_SIZE,
        tag_len: aes_256_gcm::TAG_SIZE,
        nonce_len: aes_256_gcm::NONCE_SIZE,
        block_size: aes_256_gcm::BLOCK_SIZE,
        availability: hardware::aes_gcm_accelerated,
    },
];

/// 能力表：按 (cipher, mode) 查找 [`AlgorithmProfile`]。
#[derive(Debug, Clone, Copy)]
pub struct CapabilityTable<'a> {
    profiles: &'a [AlgorithmProfile],
}

impl CapabilityTable<'static> {
    /// 本适配器在当前平台上的内建能力表。
    pub fn native() -> Self {
        Self {
            profiles: &NATIVE_PROFILES,
        }
    }
}

impl<'a> CapabilityTable<'a> {
    pub fn new(profiles: &'a [AlgorithmProfile]) -> Self {
        Self { profiles }
    }

    pub fn profiles(&self) -> &'a [AlgorithmProfile] {
        self.profiles
    }

    pub fn lookup(
        &self,
        cipher: CipherKind,
        mode: ModeKind,
    ) -> Result<&'a AlgorithmProfile, ConfigurationError> {
        self.profiles
            .iter()
            .find(|p| p.cipher == cipher && p.mode == mode)
            .ok_or(ConfigurationError::UnsupportedCipherMode { cipher, mode })
    }

    /// 组合不存在时返回 false。
    pub fn is_available(&self, cipher: CipherKind, mode: ModeKind) -> bool {
        self.lookup(cipher, mode)
            .map(AlgorithmProfile::is_available)
            .unwrap_or(false)
    }
}
