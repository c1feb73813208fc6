// SPDX-License-Identifier: GPL-3.0-only

use std::path::Path;

use snapshot_sys::fs::ensure_parent_dir;
use snapshot_types::ExecutionEnvironment;
use tracing::{debug, error, info};

use super::SubvolumeManager;
use crate::error::{BackendError, Result};

impl SubvolumeManager {
    /// Create a new subvolume, creating missing parent directories first
    pub fn create_subvolume(&self, path: &Path) -> Result<()> {
        ensure_parent_dir(path).map_err(|error| BackendError::CreationFailed {
            path: path.to_path_buf(),
            stage: "cannot create parent directory",
            source: Box::new(error),
        })?;

        self.run(self.btrfs().args(["subvolume", "create"]).arg(path))
            .map_err(|error| {
                error!("Failed to create BTRFS subvolume {}: {error}", path.display());
                BackendError::CreationFailed {
                    path: path.to_path_buf(),
                    stage: "subvolume create",
                    source: Box::new(error),
                }
            })?;

        info!("Created subvolume {}", path.display());
        Ok(())
    }

    /// Snapshot `source` into `dest`.
    ///
    /// A read-only request is downgraded to a writable snapshot when the
    /// environment cannot honor the read-only flag.
    pub fn snapshot(
        &self,
        source: &Path,
        dest: &Path,
        readonly: bool,
        environment: &ExecutionEnvironment,
    ) -> Result<()> {
        let readonly_supported = environment.supports_readonly_snapshots();
        if readonly && !readonly_supported {
            debug!(
                "Creating writable snapshot {}: read-only is unsupported in this environment",
                dest.display()
            );
        }

        let mut invocation = self.btrfs().args(["subvolume", "snapshot"]);
        if readonly && readonly_supported {
            invocation = invocation.arg("-r");
        }

        self.run(invocation.arg(source).arg(dest))
            .map_err(|error| BackendError::SnapshotFailed {
                origin: source.to_path_buf(),
                dest: dest.to_path_buf(),
                output: error.captured_output().to_string(),
            })?;

        info!(
            "Created snapshot {} of {}",
            dest.display(),
            source.display()
        );
        Ok(())
    }
}
