//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::DisplayUnit;

/// Liquid inventory reports.
///
/// Reads a ledger of stocked units and opened items with their usage log,
/// and reports consumption and the stock remaining on each day.
#[derive(Debug, Parser)]
#[command(name = "cellar", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Unit for human-readable output (JSON is always in ledger units).
    #[arg(short, long, global = true, value_enum)]
    pub unit: Option<DisplayUnit>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show volume drawn per day.
    Consumption {
        #[command(flatten)]
        source: LedgerArgs,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the volume on hand for each day of the window.
    Leftover {
        #[command(flatten)]
        source: LedgerArgs,

        #[command(flatten)]
        window: WindowArgs,

        /// Use recorded daily snapshots for stocked volume where available.
        #[arg(long)]
        use_snapshots: bool,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show what is on hand now and what was drawn in the window.
    Summary {
        #[command(flatten)]
        source: LedgerArgs,

        #[command(flatten)]
        window: WindowArgs,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Where to read the ledger from and which product to keep.
#[derive(Debug, Args)]
pub struct LedgerArgs {
    /// Ledger JSON file (defaults to the configured path).
    #[arg(long)]
    pub ledger: Option<PathBuf>,

    /// Only include records for this product name.
    #[arg(long)]
    pub product: Option<String>,
}

/// The reporting window.
#[derive(Debug, Args)]
pub struct WindowArgs {
    /// Days in the window (defaults to the configured value).
    #[arg(long)]
    pub days: Option<u32>,

    /// Last day of the window: YYYY-MM-DD, "today", or e.g. "3 days ago".
    #[arg(long)]
    pub as_of: Option<String>,
}
