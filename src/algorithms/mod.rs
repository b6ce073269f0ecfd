//! 底层 AEAD 原语。
//!
//! 每个子模块提供同一组接口：`encrypt` 返回 `ciphertext || tag`，
//! `decrypt` 接收同样的拼接结果，以及各自的长度常量。

pub mod aes_256_gcm;
pub mod chacha20_poly1305;
