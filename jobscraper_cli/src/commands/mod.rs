//! CLI subcommand implementations.

pub mod merge;
pub mod scrape;
pub mod show;
