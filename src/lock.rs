//! Library lock: fs2 advisory lock on <root>/LOCK.
//!
//! - exclusive: held by a mutation (save/delete/add-language/restore) for its
//!   whole load -> modify -> persist sequence;
//! - shared: store refresh, so a rebuild never sees half of a multi-file restore
//!   made by another process.
//!
//! Guard отпускает lock в Drop. Не держать guard во время вопросов пользователю.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::consts::LOCK_FILE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    Shared,
    Exclusive,
}

pub struct LockGuard {
    file: File,
    mode: LockMode,
}

impl LockGuard {
    pub fn mode(&self) -> LockMode {
        self.mode
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

pub fn lock_file_path(root: &Path) -> PathBuf {
    root.join(LOCK_FILE)
}

fn open_lock_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .open(path)
        .with_context(|| format!("open lock file {}", path.display()))
}

fn acquire(root: &Path, mode: LockMode) -> Result<LockGuard> {
    let path = lock_file_path(root);
    let file = open_lock_file(&path)?;
    let res = match mode {
        LockMode::Shared => FileExt::lock_shared(&file),
        LockMode::Exclusive => FileExt::lock_exclusive(&file),
    };
    res.with_context(|| format!("{:?} lock on {}", mode, path.display()))?;
    Ok(LockGuard { file, mode })
}

pub fn acquire_exclusive_lock(root: &Path) -> Result<LockGuard> {
    acquire(root, LockMode::Exclusive)
}

pub fn acquire_shared_lock(root: &Path) -> Result<LockGuard> {
    acquire(root, LockMode::Shared)
}

/// Non-blocking check: true if no mutation holds the library right now.
/// Never waits; used by status reporting.
pub fn writer_idle(root: &Path) -> Result<bool> {
    let path = lock_file_path(root);
    let file = open_lock_file(&path)?;
    match FileExt::try_lock_shared(&file) {
        Ok(()) => {
            let _ = FileExt::unlock(&file);
            Ok(true)
        }
        Err(e)
            if e.kind() == ErrorKind::WouldBlock
                || e.raw_os_error() == fs2::lock_contended_error().raw_os_error() =>
        {
            Ok(false)
        }
        Err(e) => Err(e).with_context(|| format!("try_lock_shared {}", path.display())),
    }
}
