//! CLI definitions for framefeed.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// framefeed CLI.
#[derive(Parser)]
#[command(name = "framefeed")]
#[command(about = "Batch image-to-video import driven through a Chrome tab")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    /// Shared store file (default: ~/.framefeed/store.json)
    #[arg(short, long, env = "FRAMEFEED_STORE", global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List the image/description pairs an archive would produce
    Inspect {
        /// ZIP archive of images and prompt text files
        archive: PathBuf,

        /// First pair to include (0-based)
        #[arg(long, default_value_t = 0)]
        start_index: usize,
    },

    /// Convert an archive and commit it as a new batch
    Commit {
        /// ZIP archive of images and prompt text files
        archive: PathBuf,

        /// Negative prompt for lines that do not carry their own
        #[arg(short, long)]
        negative: Option<String>,

        /// First pair to include (0-based)
        #[arg(long, default_value_t = 0)]
        start_index: usize,
    },

    /// Drive the committed batch to completion in the target tab
    Run {
        /// Attach to an already open target tab instead of opening one
        #[arg(long)]
        attach: bool,
    },

    /// Commit an archive, then run it
    Import {
        /// ZIP archive of images and prompt text files
        archive: PathBuf,

        /// Negative prompt for lines that do not carry their own
        #[arg(short, long)]
        negative: Option<String>,

        /// First pair to include (0-based)
        #[arg(long, default_value_t = 0)]
        start_index: usize,

        /// Attach to an already open target tab instead of opening one
        #[arg(long)]
        attach: bool,
    },

    /// Show the state of the current batch
    Status {
        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Discard the current batch
    Clear,
}
