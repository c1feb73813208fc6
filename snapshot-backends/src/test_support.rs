// SPDX-License-Identifier: GPL-3.0-only

//! Fixtures emulating subvolumes on an ordinary filesystem

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use snapshot_sys::Invocation;
use snapshot_sys::testing::ScriptedRunner;
use walkdir::WalkDir;

use crate::btrfs::{SubvolumeManager, SubvolumeProbe};

/// File marking a directory as an emulated subvolume root
pub const MARKER: &str = ".subvolume";

/// Treats directories holding `MARKER` as subvolumes, reading the disk each time
pub struct MarkerProbe;

impl SubvolumeProbe for MarkerProbe {
    fn is_subvolume(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok_and(|metadata| metadata.is_dir())
            && path.join(MARKER).is_file()
    }
}

pub fn make_subvolume(path: &Path) {
    fs::create_dir_all(path).unwrap();
    fs::write(path.join(MARKER), b"").unwrap();
}

/// Manager over a runner with no rules and the real inode probe
pub fn scripted_manager() -> (SubvolumeManager, Arc<ScriptedRunner>) {
    let runner = Arc::new(ScriptedRunner::new());
    let manager = SubvolumeManager::new(runner.clone());
    (manager, runner)
}

/// Manager whose `subvolume` commands act on marker directories.
///
/// `subvolume delete` panics if the target still holds a nested subvolume,
/// like the real tool refusing to delete a non-empty subvolume tree.
pub fn emulated_manager() -> (SubvolumeManager, Arc<ScriptedRunner>) {
    let runner = Arc::new(ScriptedRunner::new());

    runner
        .on_success(&["subvolume", "create"], |invocation| {
            make_subvolume(&last_path(invocation));
        })
        .on_success(&["subvolume", "snapshot"], |invocation| {
            make_subvolume(&last_path(invocation));
        })
        .on_success(&["subvolume", "delete"], |invocation| {
            let target = last_path(invocation);
            let nested = nested_markers(&target);
            assert!(
                nested.is_empty(),
                "deleted {} while it still contains {nested:?}",
                target.display()
            );
            fs::remove_dir_all(&target).unwrap();
        });

    let manager = SubvolumeManager::new(runner.clone()).with_probe(Arc::new(MarkerProbe));
    (manager, runner)
}

fn last_path(invocation: &Invocation) -> PathBuf {
    PathBuf::from(invocation.arguments().last().unwrap())
}

fn nested_markers(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .min_depth(2)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name() == MARKER)
        .map(|entry| entry.into_path())
        .collect()
}
