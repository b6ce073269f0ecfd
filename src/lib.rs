mod decrypt;
mod encrypt;

pub mod algorithm;
pub mod algorithms;
pub mod crypto;
pub mod error;
pub mod format;
pub mod fs;
pub mod registry;

pub use algorithm::{AlgorithmProfile, CapabilityTable, CipherKind, ModeKind};
pub use crypto::kdf::KdfParams;
pub use crypto::padding::{NoPadding, Padding, PaddingScheme};
pub use crypto::{AeadContext, Crypto, EncryptedData};
pub use error::{AeadError, ConfigurationError};
pub use registry::{
    AlgorithmRegistry, ImplementationType, Registration, Registry, register_algorithms,
};

use std::path::Path;

/// 默认算法：ChaCha20-Poly1305，不依赖硬件加速。
pub const DEFAULT_CIPHER: CipherKind = CipherKind::ChaCha20;

pub fn encrypt(input: &Path, output: &Path, password: &str) -> error::Result<()> {
    encrypt::encrypt_file(input, output, password, DEFAULT_CIPHER, &KdfParams::default())
}

pub fn encrypt_with_algorithm(
    input: &Path,
    output: &Path,
    password: &str,
    cipher: CipherKind,
    params: &KdfParams,
) -> error::Result<()> {
    encrypt::encrypt_file(input, output, password, cipher, params)
}

pub fn decrypt(input: &Path, output: &Path, password: &str) -> error::Result<()> {
    decrypt::decrypt_file(input, output, password)
}
