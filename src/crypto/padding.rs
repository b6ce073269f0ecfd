//! 填充策略接口。
//!
//! 块密码适配器需要通过填充把明文补齐到块大小的整数倍；AEAD 模式
//! 由认证标签界定密文长度，不允许使用传统填充，因此本 crate 只实现
//! [`NoPadding`]。接口保持完整，以便与需要填充的适配器共用同一契约。

use crate::error::AeadError;

/// 填充方案标识，用于构造时的能力检查。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingScheme {
    None,
    Pkcs7,
    AnsiX923,
    Iso10126,
    Iso7816,
    Zero,
}

pub trait Padding: Send + Sync {
    fn scheme(&self) -> PaddingScheme;

    /// 明文还差 `missing` 字节才能对齐到 `block_size` 时，需要追加的字节。
    fn padding_data(&self, block_size: usize, missing: usize) -> Vec<u8>;

    /// `data` 末尾的填充长度，0 表示没有填充。
    fn padding_size(&self, data: &[u8], block_size: usize) -> Result<usize, AeadError>;
}

/// 不做任何填充。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoPadding;

impl Padding for NoPadding {
    fn scheme(&self) -> PaddingScheme {
        PaddingScheme::None
    }

    fn padding_data(&self, _block_size: usize, _missing: usize) -> Vec<u8> {
        Vec::new()
    }

    fn padding_size(&self, _data: &[u8], _block_size: usize) -> Result<usize, AeadError> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_padding_adds_and_removes_nothing() {
        let padding = NoPadding;
        assert_eq!(padding.scheme(), PaddingScheme::None);
        assert!(padding.padding_data(16, 11).is_empty());
        assert!(padding.padding_data(1, 1).is_empty());
        assert_eq!(padding.padding_size(b"sixteen bytes!!!", 16).unwrap(), 0);
    }
}
