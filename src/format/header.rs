//! 封装文件 v1 Header
//!
//! 布局（固定 51 字节）：
//!
//! 8  (magic)
//! 1  (version)
//! 1  (cipher id)
//! 1  (mode id)
//! 4  (argon2 memory KiB，大端)
//! 4  (argon2 iterations，大端)
//! 4  (argon2 parallelism，大端)
//! 16 (salt)
//! 12 (iv)
//!
//! Header 之后依次为密文与 16 字节认证标签。完整的 Header 字节作为
//! AAD 参与认证，任何改动都会导致解密失败。

use crate::algorithm::{CipherKind, ModeKind};
use crate::crypto::kdf::{KdfParams, SALT_LEN};
use crate::error::AeadError;

/// 文件魔数（ASCII）
pub const MAGIC: &[u8; 8] = b"AEADv1\0\0";

pub const VERSION: u8 = 1;

/// 两种算法的 IV 均为 96 bit
pub const IV_SIZE: usize = 12;

pub const HEADER_SIZE: usize = 8 + 1 + 1 + 1 + 4 + 4 + 4 + SALT_LEN + IV_SIZE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub version: u8,
    pub cipher: CipherKind,
    pub mode: ModeKind,
    pub kdf: KdfParams,
    pub salt: [u8; SALT_LEN],
    pub iv: [u8; IV_SIZE],
}

impl Header {
    pub fn new(
        cipher: CipherKind,
        kdf: KdfParams,
        salt: [u8; SALT_LEN],
        iv: [u8; IV_SIZE],
    ) -> Self {
        Self {
            version: VERSION,
            cipher,
            mode: cipher.mode(),
            kdf,
            salt,
            iv,
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        let mut pos = 0;

        let mut put = |bytes: &[u8]| {
            out[pos..pos + bytes.len()].copy_from_slice(bytes);
            pos += bytes.len();
        };

        put(MAGIC);
        put(&[self.version, self.cipher.to_u8(), self.mode.to_u8()]);
        put(&self.kdf.memory_kib.to_be_bytes());
        put(&self.kdf.iterations.to_be_bytes());
        put(&self.kdf.parallelism.to_be_bytes());
        put(&self.salt);
        put(&self.iv);

        out
    }

    /// 解析文件开头的 Header，返回 Header 与其后的数据。
    pub fn parse(data: &[u8]) -> Result<(Self, &[u8]), AeadError> {
        if data.len() < HEADER_SIZE {
            return Err(AeadError::Envelope("truncated header".into()));
        }
        let (head, body) = data.split_at(HEADER_SIZE);

        if &head[..8] != MAGIC {
            return Err(AeadError::Envelope("invalid magic".into()));
        }

        let version = head[8];
        if version != VERSION {
            return Err(AeadError::Envelope(format!("unsupported version {version}")));
        }

        let cipher = CipherKind::from_u8(head[9])?;
        let mode = ModeKind::from_u8(head[10])?;

        let kdf = KdfParams {
            memory_kib: read_u32(&head[11..15]),
            iterations: read_u32(&head[15..19]),
            parallelism: read_u32(&head[19..23]),
        };
        if !kdf.within_limits() {
            return Err(AeadError::Envelope("KDF parameters out of range".into()));
        }

        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&head[23..23 + SALT_LEN]);

        let mut iv = [0u8; IV_SIZE];
        iv.copy_from_slice(&head[23 + SALT_LEN..]);

        Ok((
            Self {
                version,
                cipher,
                mode,
                kdf,
                salt,
                iv,
            },
            body,
        ))
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_be_bytes(buf)
}
