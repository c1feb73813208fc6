// SPDX-License-Identifier: GPL-3.0-only

//! Filesystem primitives shared by backends

use std::fs::{self, DirBuilder};
use std::io;
use std::os::unix::fs::DirBuilderExt;
use std::path::Path;

/// Permissions for intermediate directories created on demand
pub const PARENT_DIR_MODE: u32 = 0o711;

/// Whether anything exists at `path`, without following a final symlink
pub fn path_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Whether `path` is a directory with no entries.
///
/// Fails if the directory cannot be read.
pub fn path_is_empty(path: &Path) -> io::Result<bool> {
    let mut entries = fs::read_dir(path)?;
    Ok(entries.next().is_none())
}

/// Remove a file, symlink or empty directory at `path`
pub fn remove_path(path: &Path) -> io::Result<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    }
}

/// Create the parent of `path` and every missing ancestor with `PARENT_DIR_MODE`
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() || path_exists(parent) {
        return Ok(());
    }

    DirBuilder::new()
        .recursive(true)
        .mode(PARENT_DIR_MODE)
        .create(parent)
}
