// SPDX-License-Identifier: GPL-3.0-only

use std::path::Path;

use tracing::debug;

use super::SubvolumeManager;
use crate::error::{BackendError, Result};

impl SubvolumeManager {
    /// Query the `ro` property.
    ///
    /// Any tool failure reads as writable; the answer is advisory only.
    pub fn is_readonly(&self, path: &Path) -> bool {
        match self.run(self.btrfs().args(["property", "get", "-ts"]).arg(path)) {
            Ok(output) => output.starts_with("ro=true"),
            Err(error) => {
                debug!("Cannot read ro property of {}: {error}", path.display());
                false
            }
        }
    }

    /// Set or unset the read-only flag on a subvolume
    pub fn set_readonly(&self, path: &Path, readonly: bool) -> Result<()> {
        let value = if readonly { "true" } else { "false" };

        self.run(
            self.btrfs()
                .args(["property", "set", "-ts"])
                .arg(path)
                .args(["ro", value]),
        )
        .map_err(|source| BackendError::PropertyFailed {
            path: path.to_path_buf(),
            readonly,
            source,
        })?;

        debug!("Set ro={value} on {}", path.display());
        Ok(())
    }
}
