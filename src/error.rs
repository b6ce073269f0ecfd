use thiserror::Error;

use crate::algorithm::{CipherKind, ModeKind};

/// 构造阶段的参数错误。
///
/// 任何一种都意味着上下文没有被创建，调用方不应重试。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("padding not supported for AEAD (use NoPadding)")]
    InvalidPadding,

    #[error("unsupported cipher/mode: {cipher}/{mode}")]
    UnsupportedCipherMode { cipher: CipherKind, mode: ModeKind },

    #[error("required hardware/software feature unavailable for {cipher}/{mode}")]
    Unavailable { cipher: CipherKind, mode: ModeKind },

    #[error("invalid tag length: expected {expected}, got {actual}")]
    InvalidTagLength { expected: usize, actual: usize },

    #[error("invalid key size: expected {expected} bytes, got {actual}")]
    InvalidKeySize { expected: usize, actual: usize },
}

#[derive(Debug, Error)]
pub enum AeadError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// 认证标签校验失败：密钥 / IV / AAD 不匹配，或数据被篡改。
    #[error("authentication failed")]
    Authentication,

    #[error("unsupported cipher: {0}")]
    UnsupportedCipher(String),

    #[error("invalid IV size: expected {expected} bytes, got {actual}")]
    InvalidIvSize { expected: usize, actual: usize },

    #[error("invalid tag size: expected {expected} bytes, got {actual}")]
    InvalidTagSize { expected: usize, actual: usize },

    #[error("AEAD encrypt failed")]
    Encryption,

    #[error("cipher {cipher}/{mode} already registered by {adapter}")]
    DuplicateRegistration {
        adapter: &'static str,
        cipher: CipherKind,
        mode: ModeKind,
    },

    #[error("key derivation failed")]
    Kdf,

    #[error("invalid envelope: {0}")]
    Envelope(String),

    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

impl AeadError {
    /// 是否为认证失败（安全相关信号，需与普通错误区分）。
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication)
    }
}

pub type Result<T, E = AeadError> = std::result::Result<T, E>;
