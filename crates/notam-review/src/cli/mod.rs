//! Command-line interface for notam-review.
//!
//! This module provides the CLI structure and command handlers for the
//! `notamrev` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, FetchCommand, ServeCommand, StatusCommand, UploadCommand};

/// notamrev - Collect reviewer feedback on synthetic NOTAMs
///
/// Serves a per-user annotation form over a frozen NOTAM dataset, stores
/// the feedback in per-user CSV files, and optionally pushes completed
/// files to a storage API.
#[derive(Debug, Parser)]
#[command(name = "notamrev")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the review form server
    Serve(ServeCommand),

    /// Download the reference dataset
    Fetch(FetchCommand),

    /// Show a user's review progress
    Status(StatusCommand),

    /// Upload a user's feedback file to the storage API
    Upload(UploadCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
