// SPDX-License-Identifier: GPL-3.0-only

use snapshot_types::SnapshotPaths;

use crate::error::Result;

/// Removes one instance snapshot and whatever bookkeeping it leaves behind
pub trait SnapshotCleaner {
    fn delete_snapshot(&self, paths: &SnapshotPaths) -> Result<()>;
}
