// SPDX-License-Identifier: GPL-3.0-only

//! On-disk naming conventions for instance snapshots
//!
//! Backends never interpret snapshot identities themselves; they receive the
//! `SnapshotPaths` resolved here.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Project whose instances carry no name prefix
pub const DEFAULT_PROJECT: &str = "default";

/// Suffix of the read-only shadow copy kept beside a writable snapshot
pub const SHADOW_SUFFIX: &str = ".ro";

const SNAPSHOT_SEPARATOR: char = '/';

/// Prefixes `name` with its project unless it belongs to the default project.
pub fn project_prefix(project: &str, name: &str) -> String {
    if project == DEFAULT_PROJECT {
        name.to_string()
    } else {
        format!("{project}_{name}")
    }
}

/// Splits `instance/snapshot` into its parts.
///
/// A name without a separator is an instance name with no snapshot part.
pub fn split_snapshot_name(name: &str) -> (&str, Option<&str>) {
    match name.split_once(SNAPSHOT_SEPARATOR) {
        Some((instance, snapshot)) => (instance, Some(snapshot)),
        None => (name, None),
    }
}

/// Identity of one instance snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRef {
    pub project: String,
    pub pool: String,
    /// `<instance>/<snapshot>`
    pub name: String,
}

impl SnapshotRef {
    pub fn new(
        project: impl Into<String>,
        pool: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            pool: pool.into(),
            name: name.into(),
        }
    }

    pub fn instance(&self) -> &str {
        split_snapshot_name(&self.name).0
    }
}

/// Every path snapshot cleanup touches, resolved from a `SnapshotRef`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotPaths {
    /// Mount point holding the snapshot's data
    pub mount_point: PathBuf,
    /// Read-only shadow copy next to the mount point
    pub shadow: PathBuf,
    /// Naming symlink for this snapshot
    pub symlink: PathBuf,
    /// Directory holding all snapshots of the owning instance
    pub parent_dir: PathBuf,
    /// Naming symlink pointing at `parent_dir`
    pub parent_symlink: PathBuf,
}

/// Maps snapshot identities onto a state directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageLayout {
    state_dir: PathBuf,
}

impl StorageLayout {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
        }
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// `<state>/storage-pools/<pool>/containers-snapshots/<prefixed name>`
    pub fn snapshot_mount_point(&self, project: &str, pool: &str, name: &str) -> PathBuf {
        self.state_dir
            .join("storage-pools")
            .join(pool)
            .join("containers-snapshots")
            .join(project_prefix(project, name))
    }

    /// `<state>/snapshots/<prefixed name>`
    pub fn snapshot_symlink(&self, project: &str, name: &str) -> PathBuf {
        self.state_dir
            .join("snapshots")
            .join(project_prefix(project, name))
    }

    pub fn shadow_path(mount_point: &Path) -> PathBuf {
        let mut shadow = OsString::from(mount_point.as_os_str());
        shadow.push(SHADOW_SUFFIX);
        PathBuf::from(shadow)
    }

    pub fn resolve(&self, snapshot: &SnapshotRef) -> SnapshotPaths {
        let mount_point =
            self.snapshot_mount_point(&snapshot.project, &snapshot.pool, &snapshot.name);
        let instance = snapshot.instance();

        SnapshotPaths {
            shadow: Self::shadow_path(&mount_point),
            symlink: self.snapshot_symlink(&snapshot.project, &snapshot.name),
            parent_dir: self.snapshot_mount_point(&snapshot.project, &snapshot.pool, instance),
            parent_symlink: self.snapshot_symlink(&snapshot.project, instance),
            mount_point,
        }
    }
}
