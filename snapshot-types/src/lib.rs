// SPDX-License-Identifier: GPL-3.0-only

//! Shared domain models for instance snapshot storage backends
//!
//! These types are plain data: nothing here touches the filesystem or spawns
//! tools. They are used by:
//!
//! - **snapshot-sys**: produces an `ExecutionEnvironment` from the running system
//! - **snapshot-backends**: consumes resolved `SnapshotPaths` and returns
//!   `SubvolumeTree` / `QuotaGroupId` values from discovery
//!
//! A subvolume is always addressed by path and re-derived from the filesystem
//! on every call, so none of these types caches subvolume state.

pub mod btrfs;
pub mod environment;
pub mod layout;

pub use btrfs::{QuotaGroupId, SubvolumeTree};
pub use environment::ExecutionEnvironment;
pub use layout::{
    DEFAULT_PROJECT, SHADOW_SUFFIX, SnapshotPaths, SnapshotRef, StorageLayout, project_prefix,
    split_snapshot_name,
};
