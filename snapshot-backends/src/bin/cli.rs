// SPDX-License-Identifier: GPL-3.0-only

//! CLI wrapper around snapshot-backends for testing and manual operations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use snapshot_backends::config::CONFIG_ENV;
use snapshot_backends::{
    BackendConfig, DirSnapshotCleaner, SnapshotCleaner, SnapshotRef, SubvolumeManager,
};
use snapshot_sys::find_tool;

#[derive(Parser)]
#[command(name = "snapshot-backends-cli")]
#[command(about = "CLI tool for instance snapshot storage operations", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    Btrfs,
    Dir,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a path is a subvolume root
    IsSubvolume { path: PathBuf },
    /// List subvolumes nested beneath a path
    ListNested { root: PathBuf },
    /// Create a new subvolume
    Create { path: PathBuf },
    /// Create a snapshot of a subvolume
    Snapshot {
        source: PathBuf,
        dest: PathBuf,
        /// Make the snapshot read-only where the environment allows it
        #[arg(long)]
        readonly: bool,
    },
    /// Delete a subvolume and every subvolume nested beneath it
    DeleteTree { root: PathBuf },
    /// Show the quota group of a subvolume
    Qgroup { path: PathBuf },
    /// Query the read-only property of a subvolume
    GetReadonly { path: PathBuf },
    /// Set or unset the read-only flag on a subvolume
    SetReadonly {
        path: PathBuf,
        /// Whether to set read-only (true) or writable (false)
        #[arg(action = clap::ArgAction::Set)]
        readonly: bool,
    },
    /// Delete an instance snapshot and its leftover bookkeeping
    DeleteSnapshot {
        #[arg(long, value_enum, default_value = "btrfs")]
        backend: Backend,
        #[arg(long, default_value = "default")]
        project: String,
        #[arg(long)]
        pool: String,
        /// Snapshot name as `<instance>/<snapshot>`
        #[arg(long)]
        name: String,
    },
}

fn load_config(path: Option<&Path>) -> Result<BackendConfig> {
    let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    match path.map(Path::to_path_buf).or(from_env) {
        Some(path) => Ok(BackendConfig::load(&path)?),
        None => Ok(BackendConfig::default()),
    }
}

fn btrfs_manager(config: &BackendConfig) -> Result<SubvolumeManager> {
    let binary = find_tool(&config.btrfs_binary)
        .with_context(|| format!("btrfs tool '{}' is unavailable", config.btrfs_binary))?;
    Ok(SubvolumeManager::from_config(config).with_binary(binary.to_string_lossy()))
}

fn success() {
    println!("{}", json!({ "success": true }));
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    // Initialize tracing to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    match cli.command {
        Commands::IsSubvolume { path } => {
            let manager = SubvolumeManager::from_config(&config);
            println!("{}", json!({ "subvolume": manager.is_subvolume(&path) }));
        }
        Commands::ListNested { root } => {
            let manager = SubvolumeManager::from_config(&config);
            println!("{}", serde_json::to_string(&manager.list_nested(&root))?);
        }
        Commands::Create { path } => {
            btrfs_manager(&config)?.create_subvolume(&path)?;
            success();
        }
        Commands::Snapshot {
            source,
            dest,
            readonly,
        } => {
            let environment = config.environment();
            btrfs_manager(&config)?.snapshot(&source, &dest, readonly, &environment)?;
            success();
        }
        Commands::DeleteTree { root } => {
            btrfs_manager(&config)?.delete_tree(&root)?;
            success();
        }
        Commands::Qgroup { path } => {
            let qgroup = btrfs_manager(&config)?.quota_group(&path);
            match qgroup {
                Ok(qgroup) => println!("{}", json!({ "qgroup": qgroup })),
                Err(error) if error.is_quota_absent() => {
                    println!("{}", json!({ "qgroup": null, "reason": error.to_string() }))
                }
                Err(error) => return Err(error.into()),
            }
        }
        Commands::GetReadonly { path } => {
            let readonly = btrfs_manager(&config)?.is_readonly(&path);
            println!("{}", json!({ "readonly": readonly }));
        }
        Commands::SetReadonly { path, readonly } => {
            btrfs_manager(&config)?.set_readonly(&path, readonly)?;
            success();
        }
        Commands::DeleteSnapshot {
            backend,
            project,
            pool,
            name,
        } => {
            let paths = config
                .layout()
                .resolve(&SnapshotRef::new(project, pool, name));
            let cleaner: Box<dyn SnapshotCleaner> = match backend {
                Backend::Btrfs => Box::new(btrfs_manager(&config)?),
                Backend::Dir => Box::new(DirSnapshotCleaner::new()),
            };
            cleaner.delete_snapshot(&paths)?;
            success();
        }
    }

    Ok(())
}
