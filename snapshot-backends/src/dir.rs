// SPDX-License-Identifier: GPL-3.0-only

//! Snapshot cleanup for the plain directory backend
//!
//! Without subvolume support a snapshot is an ordinary directory tree, so
//! every removal here is a filesystem call and every failure is fatal.

use std::fs;

use snapshot_sys::fs::{path_exists, path_is_empty, remove_path};
use snapshot_types::SnapshotPaths;
use tracing::{debug, info};

use crate::cleanup::SnapshotCleaner;
use crate::error::{BackendError, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct DirSnapshotCleaner;

impl DirSnapshotCleaner {
    pub fn new() -> Self {
        Self
    }
}

impl SnapshotCleaner for DirSnapshotCleaner {
    fn delete_snapshot(&self, paths: &SnapshotPaths) -> Result<()> {
        let mount_point = &paths.mount_point;
        if path_exists(mount_point) {
            fs::remove_dir_all(mount_point)
                .map_err(|error| BackendError::io("remove snapshot", mount_point, error))?;
            info!("Deleted snapshot directory {}", mount_point.display());
        }

        // An unreadable parent counts as non-empty
        let parent = &paths.parent_dir;
        if !path_is_empty(parent).unwrap_or(false) {
            debug!("{} still holds snapshots", parent.display());
            return Ok(());
        }

        fs::remove_dir(parent)
            .map_err(|error| BackendError::io("remove snapshot directory", parent, error))?;

        let symlink = &paths.parent_symlink;
        if path_exists(symlink) {
            remove_path(symlink)
                .map_err(|error| BackendError::io("remove snapshot symlink", symlink, error))?;
        }

        Ok(())
    }
}
