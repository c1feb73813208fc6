// SPDX-License-Identifier: GPL-3.0-only

//! Low-level system operations for snapshot backends
//!
//! This crate holds the primitives backends build on:
//! - Invoking external tools and capturing their output
//! - Detecting what the execution environment is allowed to do
//! - Small filesystem checks (existence, emptiness, parent creation)
//!
//! Tool invocation sits behind the `CommandRunner` trait so backends can be
//! exercised against a scripted runner instead of spawning processes.

pub mod command;
pub mod env;
pub mod error;
pub mod fs;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use command::{CommandRunner, Invocation, SystemRunner, find_tool};
pub use error::{Result, SysError};
