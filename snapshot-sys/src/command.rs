// SPDX-License-Identifier: GPL-3.0-only

//! External tool invocation
//!
//! Every subvolume, property and quota operation shells out through a
//! `CommandRunner`. A non-zero exit and a spawn failure both surface as
//! errors carrying the rendered command line and whatever was captured.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::PathBuf;
use std::process::Command;

use tracing::debug;
use which::which;

use crate::error::{Result, SysError};

/// A single external program call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_os_string()));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }

    /// Arguments as lossy UTF-8, for matching and logging
    pub fn arg_strings(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Runs external programs and returns their stdout
pub trait CommandRunner: Send + Sync {
    fn run(&self, invocation: &Invocation) -> Result<String>;
}

/// Runner that spawns real processes and waits for them
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<String> {
        let rendered = invocation.to_string();
        debug!("Running {rendered}");

        let output = Command::new(invocation.program())
            .args(invocation.arguments())
            .output()
            .map_err(|source| SysError::Spawn {
                command: rendered.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            debug!("{rendered} failed: {}", stderr.trim());
            return Err(SysError::CommandFailed {
                command: rendered,
                status: output.status.code(),
                stdout,
                stderr,
            });
        }

        Ok(stdout)
    }
}

/// Resolve a tool in PATH; absolute paths are returned as-is if they exist
pub fn find_tool(name: &str) -> Result<PathBuf> {
    which(name).map_err(|_| SysError::ToolNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_command_line() {
        let invocation = Invocation::new("btrfs")
            .args(["subvolume", "snapshot", "-r"])
            .arg(PathBuf::from("/pool/src"))
            .arg("/pool/dest");

        assert_eq!(
            invocation.to_string(),
            "btrfs subvolume snapshot -r /pool/src /pool/dest"
        );
        assert_eq!(invocation.arg_strings().len(), 5);
    }

    #[test]
    fn captures_stdout_of_successful_command() {
        let output = SystemRunner::new()
            .run(&Invocation::new("sh").args(["-c", "printf 'ro=false\\n'"]))
            .unwrap();
        assert_eq!(output, "ro=false\n");
    }

    #[test]
    fn non_zero_exit_carries_captured_output() {
        let error = SystemRunner::new()
            .run(&Invocation::new("sh").args(["-c", "echo 'no such subvolume' >&2; exit 3"]))
            .unwrap_err();

        match &error {
            SysError::CommandFailed { status, .. } => assert_eq!(*status, Some(3)),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(error.captured_output(), "no such subvolume");
        assert!(error.to_string().contains("exit status 3"));
    }

    #[test]
    fn missing_program_is_a_spawn_failure() {
        let error = SystemRunner::new()
            .run(&Invocation::new("/nonexistent/snapshot-sys-tool"))
            .unwrap_err();
        assert!(matches!(error, SysError::Spawn { .. }));
    }

    #[test]
    fn unknown_tool_is_not_found() {
        assert!(matches!(
            find_tool("snapshot-sys-definitely-missing-tool"),
            Err(SysError::ToolNotFound(_))
        ));
    }
}
