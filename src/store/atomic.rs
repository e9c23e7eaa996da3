// src/store/atomic.rs
use crate::error::{GedcomError, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Sibling path `<file>.tmp` used while replacing `path`.
#[must_use]
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| OsString::from("pedigree"), ToOwned::to_owned);
    name.push(".tmp");
    path.with_file_name(name)
}

/// Replaces `path` with `content` via a temp file and rename.
///
/// Readers see either the old file or the new one. On failure the target is
/// left untouched and the temp file is removed.
///
/// # Errors
/// Returns `GedcomError::Io` naming the path that failed.
pub fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let temp = temp_path(path);

    if let Err(e) = fs::write(&temp, content) {
        let _ = fs::remove_file(&temp);
        return Err(GedcomError::io(e, temp));
    }

    if let Err(e) = fs::rename(&temp, path) {
        let _ = fs::remove_file(&temp);
        return Err(GedcomError::io(e, path));
    }
    Ok(())
}
