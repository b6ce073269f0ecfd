//! AEAD 适配器
//!
//! 把 ChaCha20-Poly1305 与 AES-256-GCM 包装为同一套加解密接口：
//! - 构造时按固定顺序校验参数，任一项失败即拒绝，不会产生半初始化对象
//! - 构造完成后上下文不可变，可在多线程间共享
//! - 密钥由上下文独占，drop 时清零
//!
//! 安全约束：
//! - 同一密钥下每次加密必须使用全新的 IV，适配器不维护计数器
//! - 认证失败时不返回任何明文

use std::borrow::Cow;
use std::fmt;

use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::algorithm::{AlgorithmProfile, CapabilityTable, CipherKind, ModeKind};
use crate::algorithms::{aes_256_gcm, chacha20_poly1305};
use crate::crypto::Crypto;
use crate::crypto::padding::{NoPadding, Padding, PaddingScheme};
use crate::error::{AeadError, ConfigurationError, Result};

/// 单次加密结果
///
/// IV 由调用方保存，不包含在内。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedData {
    pub ciphertext: Vec<u8>,
    pub tag: Vec<u8>,
}

/// 已校验的 AEAD 上下文。
pub struct AeadContext {
    profile: AlgorithmProfile,
    key: Zeroizing<Vec<u8>>,
    tag_len: usize,
    padding: NoPadding,
}

impl AeadContext {
    /// 使用内建能力表和默认标签长度构造。
    pub fn new(
        cipher: CipherKind,
        mode: ModeKind,
        padding: &dyn Padding,
        key: Vec<u8>,
    ) -> Result<Self> {
        Self::with_table(&CapabilityTable::native(), cipher, mode, padding, key, None)
    }

    pub fn with_tag_length(
        cipher: CipherKind,
        mode: ModeKind,
        padding: &dyn Padding,
        key: Vec<u8>,
        tag_len: usize,
    ) -> Result<Self> {
        Self::with_table(
            &CapabilityTable::native(),
            cipher,
            mode,
            padding,
            key,
            Some(tag_len),
        )
    }

    /// 针对给定能力表构造。
    ///
    /// 校验顺序：填充 → (cipher, mode) 存在且可用 → 标签长度 → 密钥长度。
    /// `tag_len` 为 `None` 时取 profile 中的标签长度。
    pub fn with_table(
        table: &CapabilityTable<'_>,
        cipher: CipherKind,
        mode: ModeKind,
        padding: &dyn Padding,
        key: Vec<u8>,
        tag_len: Option<usize>,
    ) -> Result<Self> {
        // 先接管密钥，保证校验失败时同样会被清零
        let key = Zeroizing::new(key);

        if padding.scheme() != PaddingScheme::None {
            return Err(ConfigurationError::InvalidPadding.into());
        }

        let profile = table.lookup(cipher, mode)?;
        if !profile.is_available() {
            return Err(ConfigurationError::Unavailable { cipher, mode }.into());
        }

        let tag_len = tag_len.unwrap_or(profile.tag_len);
        if tag_len != profile.tag_len {
            return Err(ConfigurationError::InvalidTagLength {
                expected: profile.tag_len,
                actual: tag_len,
            }
            .into());
        }

        if key.len() != profile.key_len {
            return Err(ConfigurationError::InvalidKeySize {
                expected: profile.key_len,
                actual: key.len(),
            }
            .into());
        }

        debug!(%cipher, %mode, tag_len, "AEAD context ready");

        Ok(Self {
            profile: *profile,
            key,
            tag_len,
            padding: NoPadding,
        })
    }

    pub fn cipher(&self) -> CipherKind {
        self.profile.cipher
    }

    pub fn mode(&self) -> ModeKind {
        self.profile.mode
    }

    pub fn tag_len(&self) -> usize {
        self.tag_len
    }

    pub fn iv_size(&self) -> usize {
        self.profile.nonce_len
    }

    pub fn block_size(&self) -> usize {
        self.profile.block_size
    }

    /// 加密，返回分离的密文与认证标签。
    pub fn encrypt(&self, iv: &[u8], plaintext: &[u8], aad: &[u8]) -> Result<EncryptedData> {
        self.check_iv(iv)?;

        let block_size = self.block_size();
        let missing = block_size - (plaintext.len() % block_size);
        let pad = self.padding.padding_data(block_size, missing);

        let padded: Cow<'_, [u8]> = if pad.is_empty() {
            Cow::Borrowed(plaintext)
        } else {
            let mut buf = Vec::with_capacity(plaintext.len() + pad.len());
            buf.extend_from_slice(plaintext);
            buf.extend_from_slice(&pad);
            Cow::Owned(buf)
        };

        let mut combined = match self.profile.cipher {
            CipherKind::ChaCha20 => chacha20_poly1305::encrypt(&self.key, iv, &padded, aad)?,
            CipherKind::Aes256 => aes_256_gcm::encrypt(&self.key, iv, &padded, aad)?,
        };

        // combined = [ciphertext | tag]，原语总是追加 tag_len 字节的标签
        let tag = combined.split_off(combined.len() - self.tag_len);

        Ok(EncryptedData {
            ciphertext: combined,
            tag,
        })
    }

    /// 校验并解密。标签不匹配时返回 [`AeadError::Authentication`]。
    pub fn decrypt(&self, iv: &[u8], ciphertext: &[u8], tag: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
        self.check_iv(iv)?;
        if tag.len() != self.tag_len {
            return Err(AeadError::InvalidTagSize {
                expected: self.tag_len,
                actual: tag.len(),
            });
        }

        let mut combined = Vec::with_capacity(ciphertext.len() + tag.len());
        combined.extend_from_slice(ciphertext);
        combined.extend_from_slice(tag);

        let result = match self.profile.cipher {
            CipherKind::ChaCha20 => chacha20_poly1305::decrypt(&self.key, iv, &combined, aad),
            CipherKind::Aes256 => aes_256_gcm::decrypt(&self.key, iv, &combined, aad),
        };

        let mut plaintext = match result {
            Ok(plaintext) => plaintext,
            Err(err) => {
                if err.is_authentication() {
                    warn!(cipher = %self.profile.cipher, "AEAD tag verification failed");
                }
                return Err(err);
            }
        };

        let pad_len = self.padding.padding_size(&plaintext, self.block_size())?;
        plaintext.truncate(plaintext.len() - pad_len);

        Ok(plaintext)
    }

    fn check_iv(&self, iv: &[u8]) -> Result<()> {
        let expected = self.iv_size();
        if iv.len() != expected {
            return Err(AeadError::InvalidIvSize {
                expected,
                actual: iv.len(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for AeadContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AeadContext")
            .field("cipher", &self.profile.cipher)
            .field("mode", &self.profile.mode)
            .field("tag_len", &self.tag_len)
            .field("key", &"<redacted>")
            .finish()
    }
}

impl Crypto for AeadContext {
    fn cipher(&self) -> CipherKind {
        AeadContext::cipher(self)
    }

    fn encrypt(&self, iv: &[u8], plaintext: &[u8], aad: &[u8]) -> Result<EncryptedData> {
        AeadContext::encrypt(self, iv, plaintext, aad)
    }

    fn decrypt(&self, iv: &[u8], ciphertext: &[u8], tag: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
        AeadContext::decrypt(self, iv, ciphertext, tag, aad)
    }

    fn iv_size(&self) -> usize {
        AeadContext::iv_size(self)
    }

    fn block_size(&self) -> usize {
        AeadContext::block_size(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn always() -> bool {
        true
    }

    fn never() -> bool {
        false
    }

    fn profiles(availability: fn() -> bool) -> [AlgorithmProfile; 2] {
        let mut profiles = [*CapabilityTable::native()
            .lookup(CipherKind::ChaCha20, ModeKind::Ecb)
            .unwrap(); 2];
        profiles[1] = *CapabilityTable::native()
            .lookup(CipherKind::Aes256, ModeKind::Gcm)
            .unwrap();
        profiles[1].availability = availability;
        profiles
    }

    struct Pkcs7;

    impl Padding for Pkcs7 {
        fn scheme(&self) -> PaddingScheme {
            PaddingScheme::Pkcs7
        }

        fn padding_data(&self, _block_size: usize, missing: usize) -> Vec<u8> {
            vec![missing as u8; missing]
        }

        fn padding_size(&self, data: &[u8], _block_size: usize) -> Result<usize> {
            Ok(data.last().copied().unwrap_or(0) as usize)
        }
    }

    #[test]
    fn padding_is_checked_first() {
        // 即使 cipher/mode 与密钥都不合法，也先报告填充错误
        let err = AeadContext::new(CipherKind::ChaCha20, ModeKind::Gcm, &Pkcs7, vec![0; 3]).unwrap_err();
        assert!(matches!(
            err,
            AeadError::Configuration(ConfigurationError::InvalidPadding)
        ));
    }

    #[test]
    fn mismatched_mode_is_rejected() {
        let err = AeadContext::new(CipherKind::ChaCha20, ModeKind::Gcm, &NoPadding, vec![0; 32])
            .unwrap_err();
        assert!(matches!(
            err,
            AeadError::Configuration(ConfigurationError::UnsupportedCipherMode { .. })
        ));
    }

    #[test]
    fn tag_length_is_checked_before_key() {
        let err = AeadContext::with_tag_length(
            CipherKind::ChaCha20,
            ModeKind::Ecb,
            &NoPadding,
            vec![0; 5],
            12,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AeadError::Configuration(ConfigurationError::InvalidTagLength {
                expected: 16,
                actual: 12
            })
        ));
    }

    #[test]
    fn unavailable_profile_is_rejected() {
        let profiles = profiles(never);
        let table = CapabilityTable::new(&profiles);
        let err = AeadContext::with_table(
            &table,
            CipherKind::Aes256,
            ModeKind::Gcm,
            &NoPadding,
            vec![0; 32],
            None,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AeadError::Configuration(ConfigurationError::Unavailable {
                cipher: CipherKind::Aes256,
                mode: ModeKind::Gcm
            })
        ));
    }

    #[test]
    fn aes_block_size_does_not_change_ciphertext_length() {
        let profiles = profiles(always);
        let table = CapabilityTable::new(&profiles);
        let ctx = AeadContext::with_table(
            &table,
            CipherKind::Aes256,
            ModeKind::Gcm,
            &NoPadding,
            vec![0x42; 32],
            Some(16),
        )
        .unwrap();
        assert_eq!(ctx.block_size(), 16);

        let sealed = ctx.encrypt(&[0u8; 12], b"seventeen bytes!!", b"").unwrap();
        assert_eq!(sealed.ciphertext.len(), 17);
        assert_eq!(sealed.tag.len(), 16);
    }

    #[test]
    fn sizes_come_from_the_profile() {
        let mut profiles = profiles(always);
        profiles[1].block_size = 1;
        let table = CapabilityTable::new(&profiles);
        let ctx = AeadContext::with_table(
            &table,
            CipherKind::Aes256,
            ModeKind::Gcm,
            &NoPadding,
            vec![0x42; 32],
            None,
        )
        .unwrap();

        assert_eq!(ctx.block_size(), 1);
        assert_eq!(ctx.iv_size(), profiles[1].nonce_len);
    }

    #[test]
    fn empty_plaintext_yields_bare_tag() {
        let ctx = AeadContext::new(CipherKind::ChaCha20, ModeKind::Ecb, &NoPadding, vec![3; 32]).unwrap();

        let sealed = ctx.encrypt(&[0u8; 12], b"", b"aad").unwrap();
        assert!(sealed.ciphertext.is_empty());
        assert_eq!(sealed.tag.len(), 16);

        let plain = ctx.decrypt(&[0u8; 12], &sealed.ciphertext, &sealed.tag, b"aad").unwrap();
        assert!(plain.is_empty());
    }

    #[test]
    fn wrong_iv_and_tag_sizes_are_rejected() {
        let ctx = AeadContext::new(CipherKind::ChaCha20, ModeKind::Ecb, &NoPadding, vec![1; 32]).unwrap();

        assert!(matches!(
            ctx.encrypt(&[0u8; 8], b"x", b""),
            Err(AeadError::InvalidIvSize { expected: 12, actual: 8 })
        ));

        let sealed = ctx.encrypt(&[0u8; 12], b"x", b"").unwrap();
        assert!(matches!(
            ctx.decrypt(&[0u8; 12], &sealed.ciphertext, &sealed.tag[..15], b""),
            Err(AeadError::InvalidTagSize { expected: 16, actual: 15 })
        ));
    }

    #[test]
    fn debug_output_redacts_key() {
        let ctx = AeadContext::new(CipherKind::ChaCha20, ModeKind::Ecb, &NoPadding, vec![0xAB; 32]).unwrap();
        let rendered = format!("{ctx:?}");
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("171"));
    }

    #[test]
    fn context_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AeadContext>();
    }
}
