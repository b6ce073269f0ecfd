//! 算法注册协议。
//!
//! 加载时遍历能力表，对当前平台可用的 (cipher, mode) 组合向外部注册表
//! 登记构造函数。注册表以参数形式传入，适配器在构造之后不再访问它。
//!
//! 重复注册：同一适配器以相同实现类型再次登记同一组合是无操作；
//! 以不同实现类型登记同一组合视为冲突，返回错误。

use std::fmt;

use tracing::{debug, info};

use crate::algorithm::{CapabilityTable, CipherKind, ModeKind};
use crate::crypto::padding::Padding;
use crate::crypto::{AeadContext, Crypto};
use crate::error::{AeadError, ConfigurationError, Result};

/// 本适配器在注册表中的名称
pub const ADAPTER_NAME: &str = "aead_adapter::AeadContext";

/// 适配器构造函数
pub type CryptoConstructor =
    fn(CipherKind, ModeKind, &dyn Padding, Vec<u8>, Option<usize>) -> Result<Box<dyn Crypto>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImplementationType {
    /// 原生编译实现
    Compiled,
    Userland,
    Asm,
}

#[derive(Clone, Copy)]
pub struct Registration {
    pub adapter: &'static str,
    pub constructor: CryptoConstructor,
    pub cipher: CipherKind,
    pub mode: ModeKind,
    pub implementation: ImplementationType,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("adapter", &self.adapter)
            .field("cipher", &self.cipher)
            .field("mode", &self.mode)
            .field("implementation", &self.implementation)
            .finish_non_exhaustive()
    }
}

/// 外部注册表需要提供的接口。
pub trait Registry {
    /// 返回 `Ok(true)` 表示新登记，`Ok(false)` 表示已存在相同登记。
    fn add_cipher(&mut self, registration: Registration) -> Result<bool>;
}

/// 使用内建能力表构造 [`AeadContext`]，作为注册表中的构造函数。
pub fn construct(
    cipher: CipherKind,
    mode: ModeKind,
    padding: &dyn Padding,
    key: Vec<u8>,
    tag_len: Option<usize>,
) -> Result<Box<dyn Crypto>> {
    let ctx = AeadContext::with_table(
        &CapabilityTable::native(),
        cipher,
        mode,
        padding,
        key,
        tag_len,
    )?;
    Ok(Box::new(ctx))
}

/// 向注册表登记能力表中当前可用的组合，返回新登记的数量。
pub fn register_algorithms(table: &CapabilityTable<'_>, registry: &mut dyn Registry) -> Result<usize> {
    let mut added = 0;

    for profile in table.profiles() {
        if !profile.is_available() {
            debug!(cipher = %profile.cipher, mode = %profile.mode, "skipping unavailable cipher");
            continue;
        }

        let registration = Registration {
            adapter: ADAPTER_NAME,
            constructor: construct,
            cipher: profile.cipher,
            mode: profile.mode,
            implementation: ImplementationType::Compiled,
        };

        if registry.add_cipher(registration)? {
            info!(cipher = %profile.cipher, mode = %profile.mode, "registered cipher");
            added += 1;
        }
    }

    Ok(added)
}

/// 进程内注册表。
///
/// 同一组合可由多个适配器登记，按登记顺序保存，先登记者优先。
#[derive(Debug, Default)]
pub struct AlgorithmRegistry {
    entries: Vec<Registration>,
}

impl AlgorithmRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, cipher: CipherKind, mode: ModeKind) -> Option<&Registration> {
        self.entries
            .iter()
            .find(|r| r.cipher == cipher && r.mode == mode)
    }

    pub fn entries(&self) -> impl Iterator<Item = &Registration> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 通过首选适配器构造加解密对象。
    pub fn build(
        &self,
        cipher: CipherKind,
        mode: ModeKind,
        padding: &dyn Padding,
        key: Vec<u8>,
        tag_len: Option<usize>,
    ) -> Result<Box<dyn Crypto>> {
        let registration = self
            .get(cipher, mode)
            .ok_or(ConfigurationError::UnsupportedCipherMode { cipher, mode })?;
        (registration.constructor)(cipher, mode, padding, key, tag_len)
    }
}

impl Registry for AlgorithmRegistry {
    fn add_cipher(&mut self, registration: Registration) -> Result<bool> {
        let existing = self.entries.iter().find(|r| {
            r.adapter == registration.adapter
                && r.cipher == registration.cipher
                && r.mode == registration.mode
        });

        match existing {
            Some(r) if r.implementation == registration.implementation => Ok(false),
            Some(_) => Err(AeadError::DuplicateRegistration {
                adapter: registration.adapter,
                cipher: registration.cipher,
                mode: registration.mode,
            }),
            None => {
                self.entries.push(registration);
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::AlgorithmProfile;
    use crate::crypto::padding::NoPadding;

    fn never() -> bool {
        false
    }

    fn gated_table() -> [AlgorithmProfile; 2] {
        let native = CapabilityTable::native();
        let mut aes = *native.lookup(CipherKind::Aes256, ModeKind::Gcm).unwrap();
        aes.availability = never;
        [*native.lookup(CipherKind::ChaCha20, ModeKind::Ecb).unwrap(), aes]
    }

    #[test]
    fn unavailable_pairs_are_not_advertised() {
        let profiles = gated_table();
        let mut registry = AlgorithmRegistry::new();

        let added = register_algorithms(&CapabilityTable::new(&profiles), &mut registry).unwrap();

        assert_eq!(added, 1);
        assert!(registry.get(CipherKind::ChaCha20, ModeKind::Ecb).is_some());
        assert!(registry.get(CipherKind::Aes256, ModeKind::Gcm).is_none());
    }

    #[test]
    fn registering_twice_is_a_no_op() {
        let table = CapabilityTable::native();
        let mut registry = AlgorithmRegistry::new();

        let first = register_algorithms(&table, &mut registry).unwrap();
        let second = register_algorithms(&table, &mut registry).unwrap();

        assert!(first >= 1);
        assert_eq!(second, 0);
        assert_eq!(registry.len(), first);
    }

    #[test]
    fn conflicting_implementation_type_is_rejected() {
        let mut registry = AlgorithmRegistry::new();
        let registration = Registration {
            adapter: ADAPTER_NAME,
            constructor: construct,
            cipher: CipherKind::ChaCha20,
            mode: ModeKind::Ecb,
            implementation: ImplementationType::Compiled,
        };
        assert!(registry.add_cipher(registration).unwrap());

        let err = registry
            .add_cipher(Registration {
                implementation: ImplementationType::Userland,
                ..registration
            })
            .unwrap_err();
        assert!(matches!(err, AeadError::DuplicateRegistration { .. }));
    }

    #[test]
    fn other_adapters_can_share_a_pair() {
        let mut registry = AlgorithmRegistry::new();
        let ours = Registration {
            adapter: ADAPTER_NAME,
            constructor: construct,
            cipher: CipherKind::ChaCha20,
            mode: ModeKind::Ecb,
            implementation: ImplementationType::Compiled,
        };
        let theirs = Registration {
            adapter: "other::Adapter",
            implementation: ImplementationType::Userland,
            ..ours
        };

        assert!(registry.add_cipher(ours).unwrap());
        assert!(registry.add_cipher(theirs).unwrap());
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.get(CipherKind::ChaCha20, ModeKind::Ecb).unwrap().adapter,
            ADAPTER_NAME
        );
    }

    #[test]
    fn build_uses_registered_constructor() {
        let mut registry = AlgorithmRegistry::new();
        register_algorithms(&CapabilityTable::native(), &mut registry).unwrap();

        let crypto = registry
            .build(CipherKind::ChaCha20, ModeKind::Ecb, &NoPadding, vec![5; 32], None)
            .unwrap();
        assert_eq!(crypto.cipher(), CipherKind::ChaCha20);
        assert_eq!(crypto.iv_size(), 12);
        assert_eq!(crypto.block_size(), 1);

        let sealed = crypto.encrypt(&[1; 12], b"via registry", b"").unwrap();
        let plain = crypto
            .decrypt(&[1; 12], &sealed.ciphertext, &sealed.tag, b"")
            .unwrap();
        assert_eq!(plain, b"via registry");
    }

    #[test]
    fn build_without_registration_fails() {
        let registry = AlgorithmRegistry::new();
        let err = registry
            .build(CipherKind::ChaCha20, ModeKind::Ecb, &NoPadding, vec![0; 32], None)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            AeadError::Configuration(ConfigurationError::UnsupportedCipherMode { .. })
        ));
    }
}
