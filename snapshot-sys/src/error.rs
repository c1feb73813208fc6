// SPDX-License-Identifier: GPL-3.0-only

use thiserror::Error;

/// Error types for system-level operations
#[derive(Error, Debug)]
pub enum SysError {
    #[error("failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} failed ({}): {}", exit_label(.status), captured(.stdout, .stderr))]
    CommandFailed {
        command: String,
        status: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("{0} not found in PATH")]
    ToolNotFound(String),
}

impl SysError {
    /// Output captured from a failed tool, preferring stderr
    pub fn captured_output(&self) -> &str {
        match self {
            Self::CommandFailed { stdout, stderr, .. } => captured(stdout, stderr),
            _ => "",
        }
    }
}

fn captured<'a>(stdout: &'a str, stderr: &'a str) -> &'a str {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        stdout.trim()
    } else {
        stderr
    }
}

fn exit_label(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// Result type alias for system operations
pub type Result<T> = std::result::Result<T, SysError>;
