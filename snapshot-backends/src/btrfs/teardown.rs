// SPDX-License-Identifier: GPL-3.0-only

use snapshot_sys::fs::{path_exists, remove_path};
use snapshot_types::SnapshotPaths;
use tracing::info;

use super::SubvolumeManager;
use crate::cleanup::SnapshotCleaner;
use crate::error::{Result, best_effort};

impl SnapshotCleaner for SubvolumeManager {
    /// Delete the snapshot subvolume and its read-only shadow, then tidy up
    /// mount points and symlinks that no longer point at anything.
    fn delete_snapshot(&self, paths: &SnapshotPaths) -> Result<()> {
        info!("Deleting snapshot {}", paths.mount_point.display());
        self.delete_tree_if_exists(&[&paths.mount_point, &paths.shadow])?;

        best_effort("remove symlink", &paths.symlink, remove_path(&paths.symlink));
        best_effort(
            "remove mount point",
            &paths.mount_point,
            remove_path(&paths.mount_point),
        );

        // Only succeeds once the last snapshot of the instance is gone
        best_effort(
            "remove snapshot directory",
            &paths.parent_dir,
            remove_path(&paths.parent_dir),
        );
        if !path_exists(&paths.parent_dir) {
            best_effort(
                "remove symlink",
                &paths.parent_symlink,
                remove_path(&paths.parent_symlink),
            );
        }

        Ok(())
    }
}
