//! 原子写入。
//!
//! 先写入同目录下的临时文件，成功并落盘后再 rename 到目标路径。
//! 写入失败（包括解密认证失败）时目标文件保持原状，不会留下半截明文。

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn write_atomic<F>(target: &Path, write_fn: F) -> io::Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let parent = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let tmp_path = tmp_path_for(parent, target);
    let mut tmp_file = File::create(&tmp_path)?;

    let written = write_fn(&mut tmp_file).and_then(|()| tmp_file.sync_all());
    drop(tmp_file);

    if let Err(err) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }

    if let Err(err) = fs::rename(&tmp_path, target) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }

    Ok(())
}

fn tmp_path_for(parent: &Path, target: &Path) -> PathBuf {
    let base = target
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("aead-output");

    let counter = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);

    parent.join(format!(".{base}.tmp-{}-{counter}", std::process::id()))
}
