// SPDX-License-Identifier: GPL-3.0-only

use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::Path;

/// Object id BTRFS assigns to the root directory of every subvolume
pub const BTRFS_FIRST_FREE_OBJECTID: u64 = 256;

/// Decides whether a path is a subvolume root
pub trait SubvolumeProbe: Send + Sync {
    /// Must never fail: unreadable or missing paths are not subvolumes
    fn is_subvolume(&self, path: &Path) -> bool;
}

/// Compares the inode number from `lstat` against `BTRFS_FIRST_FREE_OBJECTID`
#[derive(Debug, Clone, Copy, Default)]
pub struct InodeProbe;

impl SubvolumeProbe for InodeProbe {
    fn is_subvolume(&self, path: &Path) -> bool {
        fs::symlink_metadata(path)
            .map(|metadata| metadata.ino() == BTRFS_FIRST_FREE_OBJECTID)
            .unwrap_or(false)
    }
}
