//! CLI subcommand implementations.

pub mod consumption;
pub mod leftover;
pub mod summary;
pub mod util;
