//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Serve command arguments.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Bind address (overrides configuration)
    #[arg(long)]
    pub bind: Option<String>,

    /// Port (overrides configuration)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Fetch command arguments.
#[derive(Debug, Args)]
pub struct FetchCommand {
    /// Re-download even if the dataset file already exists
    #[arg(short, long)]
    pub force: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Username to report progress for
    #[arg(short, long)]
    pub user: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Upload command arguments.
#[derive(Debug, Args)]
pub struct UploadCommand {
    /// Username whose feedback file to upload
    #[arg(short, long)]
    pub user: String,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
