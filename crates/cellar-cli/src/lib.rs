//! Cellar CLI library.
//!
//! This crate provides the CLI interface for liquid inventory reports.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, LedgerArgs, WindowArgs};
pub use config::{Config, DisplayUnit};
