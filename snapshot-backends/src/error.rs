// SPDX-License-Identifier: GPL-3.0-only

use std::fmt;
use std::path::{Path, PathBuf};

use snapshot_sys::SysError;
use thiserror::Error;
use tracing::debug;

/// Error types for snapshot backend operations
#[derive(Error, Debug)]
pub enum BackendError {
    #[error(transparent)]
    Tool(#[from] SysError),

    #[error("Quotas disabled on filesystem containing {}", .path.display())]
    QuotasDisabled { path: PathBuf },

    #[error("Unable to find quota group for {}", .path.display())]
    QuotaGroupNotFound { path: PathBuf },

    #[error("Failed to create subvolume {}: {stage}: {source}", .path.display())]
    CreationFailed {
        path: PathBuf,
        stage: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(
        "subvolume snapshot failed, source={}, dest={}, output={output}",
        .origin.display(),
        .dest.display()
    )]
    SnapshotFailed {
        origin: PathBuf,
        dest: PathBuf,
        output: String,
    },

    #[error("Failed to set readonly={readonly} on {}: {source}", .path.display())]
    PropertyFailed {
        path: PathBuf,
        readonly: bool,
        #[source]
        source: SysError,
    },

    #[error("Failed to delete subvolume {}: {source}", .path.display())]
    TeardownFailed {
        path: PathBuf,
        #[source]
        source: SysError,
    },

    #[error("Failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },
}

impl BackendError {
    /// Quota resolution found nothing to clean up; never fatal
    pub fn is_quota_absent(&self) -> bool {
        matches!(
            self,
            Self::QuotasDisabled { .. } | Self::QuotaGroupNotFound { .. }
        )
    }

    pub(crate) fn io(action: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type alias for snapshot backend operations
pub type Result<T> = std::result::Result<T, BackendError>;

/// Discard the failure of a step that only improves the odds of a later one.
pub(crate) fn best_effort<T, E: fmt::Display>(
    step: &str,
    path: &Path,
    result: std::result::Result<T, E>,
) {
    if let Err(error) = result {
        debug!("Ignoring failed {step} on {}: {error}", path.display());
    }
}
