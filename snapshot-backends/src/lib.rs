// SPDX-License-Identifier: GPL-3.0-only

//! Subvolume lifecycle management for instance snapshots
//!
//! This library creates BTRFS subvolumes and snapshots, discovers nested
//! subvolume trees, and tears them down bottom-up with best-effort quota
//! group cleanup. A directory-based fallback covers backends without
//! subvolume support.
//!
//! Nothing is cached: subvolume-ness and read-only state are re-read from the
//! filesystem on every call. Callers serialize operations per target path.

pub mod btrfs;
pub mod cleanup;
pub mod config;
pub mod dir;
pub mod error;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use btrfs::{BTRFS_FIRST_FREE_OBJECTID, InodeProbe, SubvolumeManager, SubvolumeProbe};
pub use cleanup::SnapshotCleaner;
pub use config::BackendConfig;
pub use dir::DirSnapshotCleaner;
pub use error::{BackendError, Result};

// Re-export shared models
pub use snapshot_types::{
    ExecutionEnvironment, QuotaGroupId, SnapshotPaths, SnapshotRef, StorageLayout, SubvolumeTree,
};
