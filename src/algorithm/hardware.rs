//! 硬件加速探测。
//!
//! AES-256-GCM 仅在 CPU 同时提供 AES 指令与无进位乘法
//! （x86 上为 AES-NI + PCLMULQDQ，aarch64 上为 AES + PMULL）时才对外提供，
//! 以保证常数时间实现。探测结果在进程生命周期内不变，只计算一次。

use std::sync::OnceLock;

static AES_GCM_ACCELERATED: OnceLock<bool> = OnceLock::new();

/// 当前 CPU 是否具备 AES-GCM 硬件加速。
pub fn aes_gcm_accelerated() -> bool {
    *AES_GCM_ACCELERATED.get_or_init(|| {
        let detected = detect_aes_gcm();
        tracing::debug!(detected, "probed AES-GCM hardware support");
        detected
    })
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn detect_aes_gcm() -> bool {
    std::arch::is_x86_feature_detected!("aes") && std::arch::is_x86_feature_detected!("pclmulqdq")
}

#[cfg(target_arch = "aarch64")]
fn detect_aes_gcm() -> bool {
    std::arch::is_aarch64_feature_detected!("aes")
        && std::arch::is_aarch64_feature_detected!("pmull")
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
fn detect_aes_gcm() -> bool {
    false
}
