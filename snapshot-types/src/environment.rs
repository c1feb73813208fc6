// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

/// Capabilities of the execution context the backend runs in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionEnvironment {
    /// Running inside an unprivileged user namespace
    pub running_in_user_ns: bool,
}

impl ExecutionEnvironment {
    pub fn unrestricted() -> Self {
        Self {
            running_in_user_ns: false,
        }
    }

    pub fn restricted() -> Self {
        Self {
            running_in_user_ns: true,
        }
    }

    /// Whether a read-only snapshot flag can be honored by the filesystem.
    ///
    /// Unprivileged namespaces cannot create true read-only subvolumes.
    pub fn supports_readonly_snapshots(&self) -> bool {
        !self.running_in_user_ns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restricted_context_cannot_honor_readonly() {
        assert!(!ExecutionEnvironment::restricted().supports_readonly_snapshots());
        assert!(ExecutionEnvironment::unrestricted().supports_readonly_snapshots());
        assert_eq!(
            ExecutionEnvironment::default(),
            ExecutionEnvironment::unrestricted()
        );
    }
}
