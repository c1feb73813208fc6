// SPDX-License-Identifier: GPL-3.0-only

use std::path::Path;

use snapshot_sys::fs::path_exists;
use snapshot_types::SubvolumeTree;
use tracing::{debug, error, info};
use walkdir::WalkDir;

use super::SubvolumeManager;
use crate::error::{BackendError, Result, best_effort};

impl SubvolumeManager {
    /// Discover every subvolume beneath `root`, in walk order.
    ///
    /// Never fails: unreadable entries are skipped and the walk goes on.
    pub fn list_nested(&self, root: &Path) -> SubvolumeTree {
        let mut nested = Vec::new();

        for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    debug!("Skipping walk error under {}: {error}", root.display());
                    continue;
                }
            };

            // Subvolumes can only be directories
            if !entry.file_type().is_dir() || !self.is_subvolume(entry.path()) {
                continue;
            }

            if let Ok(relative) = entry.path().strip_prefix(root) {
                nested.push(relative.to_path_buf());
            }
        }

        SubvolumeTree::new(root, nested)
    }

    /// Delete `root` and every subvolume nested beneath it, deepest first.
    ///
    /// The first failing delete aborts the teardown; already deleted members
    /// stay deleted and a retry re-discovers whatever is left.
    pub fn delete_tree(&self, root: &Path) -> Result<()> {
        let tree = self.list_nested(root);
        info!(
            "Deleting subvolume tree at {} ({} nested)",
            root.display(),
            tree.len()
        );

        for path in tree.deletion_order() {
            self.delete_one(&path)?;
        }

        Ok(())
    }

    /// Delete the tree at each candidate that exists and is a subvolume
    pub fn delete_tree_if_exists<P: AsRef<Path>>(&self, candidates: &[P]) -> Result<()> {
        for candidate in candidates {
            let candidate = candidate.as_ref();
            if path_exists(candidate) && self.is_subvolume(candidate) {
                self.delete_tree(candidate)?;
            } else {
                debug!("No subvolume at {}", candidate.display());
            }
        }

        Ok(())
    }

    fn delete_one(&self, path: &Path) -> Result<()> {
        if !self.is_subvolume(path) {
            debug!("Skipping {}: not a subvolume", path.display());
            return Ok(());
        }

        match self.quota_group(path) {
            Ok(qgroup) => best_effort(
                "qgroup destroy",
                path,
                self.destroy_quota_group(&qgroup, path),
            ),
            Err(error) => debug!("No qgroup to remove for {}: {error}", path.display()),
        }

        best_effort("ro=false", path, self.set_readonly(path, false));

        self.run(self.btrfs().args(["subvolume", "delete"]).arg(path))
            .map_err(|source| {
                error!("Failed to delete BTRFS subvolume {}: {source}", path.display());
                BackendError::TeardownFailed {
                    path: path.to_path_buf(),
                    source,
                }
            })?;

        debug!("Deleted subvolume {}", path.display());
        Ok(())
    }
}
