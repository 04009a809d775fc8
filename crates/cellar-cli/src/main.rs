use std::io::{self, Write};

use anyhow::{Context, Result};
use cellar_core::ReconstructConfig;
use chrono::{NaiveDate, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cellar_cli::commands::util::{load_ledger, parse_date};
use cellar_cli::commands::{consumption, leftover, summary};
use cellar_cli::{Cli, Commands, Config, WindowArgs};

/// Resolves the window end and length from flags, falling back to config.
fn resolve_window(
    window: &WindowArgs,
    config: &Config,
    today: NaiveDate,
) -> Result<(NaiveDate, ReconstructConfig)> {
    let as_of = match &window.as_of {
        Some(raw) => parse_date(raw, today).context("invalid --as-of")?,
        None => today,
    };
    let reconstruct = ReconstructConfig {
        window_days: window.days.unwrap_or(config.window_days),
        open_tolerance: config.open_tolerance,
    };
    Ok((as_of, reconstruct))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    let unit = cli.unit.unwrap_or(config.display_unit);

    // Read the clock once; every report step uses this date.
    let today = Utc::now().date_naive();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Some(Commands::Consumption { source, json }) => {
            let ledger = load_ledger(source, &config)?;
            consumption::run(&mut out, &ledger, unit, *json)?;
        }
        Some(Commands::Leftover {
            source,
            window,
            use_snapshots,
            json,
        }) => {
            let ledger = load_ledger(source, &config)?;
            let (as_of, reconstruct) = resolve_window(window, &config, today)?;
            leftover::run(
                &mut out,
                &ledger,
                as_of,
                &reconstruct,
                *use_snapshots,
                unit,
                *json,
            )?;
        }
        Some(Commands::Summary {
            source,
            window,
            json,
        }) => {
            let ledger = load_ledger(source, &config)?;
            let (as_of, reconstruct) = resolve_window(window, &config, today)?;
            summary::run(&mut out, &ledger, as_of, &reconstruct, unit, *json)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    out.flush()?;
    Ok(())
}
