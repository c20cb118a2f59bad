//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Ledger-Lens: resolve tasks, read the marketplace, decrypt content.
#[derive(Parser, Debug)]
#[command(name = "ledger-runtime")]
#[command(about = "Client-side ledger state resolver and secure content pipeline")]
pub struct Args {
    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Resolve the configured registry and print tasks and roles as JSON.
    Tasks,

    /// Print the latest marketplace listings as JSON.
    Listings {
        /// Number of listing events to read (defaults to the configured window).
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Print a buyer's purchases as JSON.
    Purchases {
        /// Buyer address.
        #[arg(short, long)]
        buyer: String,

        /// Number of purchase events to scan (defaults to the configured window).
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Fetch and decrypt a content blob.
    Decrypt {
        /// Storage identifier of the blob.
        #[arg(long)]
        content_id: String,

        /// Task that owns the content.
        #[arg(long)]
        task_id: String,

        /// Creator address of that task.
        #[arg(long)]
        creator: String,

        /// Write plaintext here instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}
