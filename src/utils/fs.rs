//! File system helpers for writing generated artifacts.
//!
//! Every failure carries a [`CtrlgenError::FileSystemError`] naming the
//! operation and path, with the underlying [`std::io::Error`] as its cause.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::core::CtrlgenError;

fn fs_error(operation: &str, path: &Path) -> CtrlgenError {
    CtrlgenError::FileSystemError {
        operation: operation.to_string(),
        path: path.display().to_string(),
    }
}

/// Create `path` and all missing parents.
///
/// # Errors
///
/// Fails if the directory cannot be created or `path` exists and is not a
/// directory.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).with_context(|| fs_error("create directory", path))?;
    } else if !path.is_dir() {
        return Err(fs_error("path exists but is not a directory:", path).into());
    }
    Ok(())
}

/// Atomically write bytes to a file using a write-then-rename strategy.
///
/// The content goes to a sibling file with a `.tmp` extension, is synced to
/// disk and then renamed over `path`. Readers see either the old or the new
/// content, never a partial write. Parent directories are created.
///
/// # Errors
///
/// Fails if any step of the write fails. A leftover temp file is removed on a
/// best-effort basis.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_dir(parent)?;
    }

    let temp_path = path.with_extension("tmp");

    let written = (|| -> Result<()> {
        let mut file =
            fs::File::create(&temp_path).with_context(|| fs_error("create temp file", &temp_path))?;
        file.write_all(content).with_context(|| fs_error("write temp file", &temp_path))?;
        file.sync_all().with_context(|| fs_error("sync temp file", &temp_path))?;
        Ok(())
    })();

    if let Err(error) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(error);
    }

    fs::rename(&temp_path, path).with_context(|| fs_error("rename temp file to", path))?;
    Ok(())
}

/// Read a text file, returning `None` when it does not exist.
///
/// # Errors
///
/// Fails for any error other than "not found", including invalid UTF-8.
pub fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(error) => Err(anyhow::Error::new(error).context(fs_error("read", path))),
    }
}
