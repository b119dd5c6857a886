//! The `show` subcommand.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use jobscraper_lib::{fields, store, validation, JobRecord};

use crate::output::{print_records, OutputFormat};

#[derive(Args)]
pub struct ShowArgs {
    /// Store file to read (.csv or .json)
    pub file: PathBuf,

    /// Only rows whose title contains this text (case-insensitive)
    #[arg(long)]
    pub title: Option<String>,

    /// Only rows whose company contains this text (case-insensitive)
    #[arg(long)]
    pub company: Option<String>,

    /// Show at most this many rows
    #[arg(long)]
    pub limit: Option<usize>,
}

pub fn run(args: &ShowArgs, format: &OutputFormat) -> Result<()> {
    let path = validation::validate_store_path(&args.file)?;
    if !path.exists() {
        bail!("{} does not exist", path.display());
    }
    let records = store::load(&path)?;
    let total = records.len();
    let selected = select(records, args);
    eprintln!("{} of {} records from {}", selected.len(), total, path.display());
    print_records(&selected, format)
}

fn contains_ci(record: &JobRecord, field: &str, needle: &Option<String>) -> bool {
    match needle {
        Some(needle) => record
            .get(field)
            .is_some_and(|v| v.to_lowercase().contains(&needle.to_lowercase())),
        None => true,
    }
}

fn select(records: Vec<JobRecord>, args: &ShowArgs) -> Vec<JobRecord> {
    records
        .into_iter()
        .filter(|r| contains_ci(r, fields::TITLE, &args.title))
        .filter(|r| contains_ci(r, fields::COMPANY, &args.company))
        .take(args.limit.unwrap_or(usize::MAX))
        .collect()
}
