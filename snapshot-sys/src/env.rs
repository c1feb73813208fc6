// SPDX-License-Identifier: GPL-3.0-only

//! Execution environment detection

use std::fs;
use std::path::Path;

use snapshot_types::ExecutionEnvironment;
use tracing::debug;

const UID_MAP_PATH: &str = "/proc/self/uid_map";

/// Detect the capabilities of the current process
pub fn detect() -> ExecutionEnvironment {
    detect_from(Path::new(UID_MAP_PATH))
}

/// Same as `detect`, reading the uid map from `uid_map`.
///
/// An unreadable map means no user namespace support, which is unrestricted.
pub fn detect_from(uid_map: &Path) -> ExecutionEnvironment {
    let running_in_user_ns = match fs::read_to_string(uid_map) {
        Ok(contents) => !is_initial_namespace(&contents),
        Err(error) => {
            debug!("Cannot read {}: {error}", uid_map.display());
            false
        }
    };

    ExecutionEnvironment { running_in_user_ns }
}

/// The initial namespace maps the full uid range onto itself.
///
/// Only the first mapping line is inspected; an empty map has no namespace.
fn is_initial_namespace(uid_map: &str) -> bool {
    let Some(first) = uid_map.lines().next() else {
        return true;
    };

    let fields: Vec<u64> = first
        .split_whitespace()
        .take(3)
        .map_while(|field| field.parse().ok())
        .collect();
    fields == [0, 0, 4_294_967_295]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_map_is_unrestricted() {
        assert!(is_initial_namespace("         0          0 4294967295\n"));
    }

    #[test]
    fn shifted_map_is_restricted() {
        assert!(!is_initial_namespace("         0     100000      65536\n"));
        assert!(!is_initial_namespace("1000 1000 1\n0 0 4294967295\n"));
        assert!(!is_initial_namespace("garbage\n"));
    }

    #[test]
    fn detects_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let map = dir.path().join("uid_map");

        std::fs::write(&map, "0 1000000 1000000000\n").unwrap();
        assert!(detect_from(&map).running_in_user_ns);

        std::fs::write(&map, "0 0 4294967295\n").unwrap();
        assert!(!detect_from(&map).running_in_user_ns);
    }

    #[test]
    fn empty_map_is_unrestricted() {
        assert!(is_initial_namespace(""));
    }

    #[test]
    fn missing_map_is_unrestricted() {
        let dir = tempfile::tempdir().unwrap();
        let env = detect_from(&dir.path().join("absent"));
        assert!(env.supports_readonly_snapshots());
    }
}
