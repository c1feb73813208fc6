// SPDX-License-Identifier: GPL-3.0-only

//! BTRFS subvolume operations through the `btrfs` tool

mod probe;
mod property;
mod qgroup;
mod snapshot;
mod teardown;
mod tree;

use std::path::Path;
use std::sync::Arc;

use snapshot_sys::{CommandRunner, Invocation, SystemRunner};

use crate::config::BackendConfig;

pub use probe::{BTRFS_FIRST_FREE_OBJECTID, InodeProbe, SubvolumeProbe};
pub use qgroup::parse_qgroup_show;

const DEFAULT_BINARY: &str = "btrfs";

/// Manager for BTRFS subvolume operations
///
/// Holds no subvolume state; every query goes back to the filesystem or the tool.
pub struct SubvolumeManager {
    runner: Arc<dyn CommandRunner>,
    probe: Arc<dyn SubvolumeProbe>,
    binary: String,
}

impl SubvolumeManager {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            probe: Arc::new(InodeProbe),
            binary: DEFAULT_BINARY.to_string(),
        }
    }

    /// Manager spawning the real tool named in `config`
    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(Arc::new(SystemRunner::new())).with_binary(config.btrfs_binary.clone())
    }

    pub fn with_probe(mut self, probe: Arc<dyn SubvolumeProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Whether `path` is the root of a subvolume
    pub fn is_subvolume(&self, path: &Path) -> bool {
        self.probe.is_subvolume(path)
    }

    fn btrfs(&self) -> Invocation {
        Invocation::new(&self.binary)
    }

    fn run(&self, invocation: Invocation) -> snapshot_sys::Result<String> {
        self.runner.run(&invocation)
    }
}
