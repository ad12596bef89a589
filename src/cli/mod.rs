//! CLI module - Command-line interface for AssetDesk
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// AssetDesk - asset inventory and cold-storage backup tracking
#[derive(Parser)]
#[command(name = "assetdesk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server (default)
    #[command(alias = "daemon")]
    Serve,

    /// Ingest a hard-disk backup sheet (CSV)
    Import {
        /// Path to the CSV file
        file: PathBuf,
        /// Name recorded as the uploader
        #[arg(long, default_value = "cli")]
        uploader: String,
    },

    /// Export hard-disk backup records
    Export {
        /// Output format: csv, xlsx or pdf
        #[arg(long, default_value = "csv")]
        format: String,
        /// Exact serial number
        #[arg(long)]
        serial: Option<String>,
        /// Substring over disk name, serial and file name
        #[arg(long)]
        keyword: Option<String>,
        /// First day of the modification range (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// Last day of the modification range (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
        /// Output file; defaults to the suggested export filename
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Check a password against the password policy
    CheckPassword {
        password: String,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;
