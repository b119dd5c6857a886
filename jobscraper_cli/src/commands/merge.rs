//! The `merge` subcommand: fold several store files into one without duplicates.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Args;
use jobscraper_lib::{combine_unique, store, validation, DedupPolicy, JobRecord};

#[derive(Args)]
pub struct MergeArgs {
    /// Store files to read (.csv or .json); missing files count as empty
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Destination store; its current rows are kept after the inputs
    #[arg(long)]
    pub into: PathBuf,

    /// Treat rows differing only in scraped_time as duplicates
    #[arg(long)]
    pub ignore_scraped_time: bool,
}

pub fn run(args: &MergeArgs) -> Result<()> {
    let dest = validation::validate_store_path(&args.into)?;
    let policy = if args.ignore_scraped_time {
        DedupPolicy::IgnoreScrapedTime
    } else {
        DedupPolicy::ExactRow
    };

    let merged = merge_files(&args.inputs, &dest, policy)?;
    eprintln!("Saving job data to {}...", dest.display());
    store::write(&merged, &dest)?;
    eprintln!("Done: {} now holds {} records", dest.display(), merged.len());
    Ok(())
}

/// Inputs in argument order, then the destination's existing rows.
fn merge_files(inputs: &[PathBuf], dest: &Path, policy: DedupPolicy) -> Result<Vec<JobRecord>> {
    if inputs.iter().any(|p| p == dest) {
        bail!("{} is both an input and the destination", dest.display());
    }

    let mut batches = Vec::with_capacity(inputs.len() + 1);
    for input in inputs {
        let path = validation::validate_store_path(input)?;
        if !path.exists() {
            tracing::warn!("{} does not exist, skipping", path.display());
        }
        let records = store::load(&path)?;
        eprintln!("Read {} records from {}", records.len(), path.display());
        batches.push(records);
    }
    batches.push(store::load(dest)?);

    let slices: Vec<&[JobRecord]> = batches.iter().map(Vec::as_slice).collect();
    Ok(combine_unique(&slices, policy))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, scraped: &str) -> JobRecord {
        [
            ("title", title),
            ("link", "https://www.emploitic.com/offre-d-emploi-1"),
            ("scraped_time", scraped),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn csv_and_json_inputs_merge_into_destination() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("a.csv");
        let json = dir.path().join("b.json");
        let dest = dir.path().join("all.json");

        let a = record("Comptable", "2024-03-10 09:30:00.000000");
        let b = record("Juriste", "2024-03-10 09:31:00.000000");
        store::write(&[a.clone(), b.clone()], &csv).unwrap();
        store::write(&[b.clone()], &json).unwrap();
        store::write(&[a.clone()], &dest).unwrap();

        let merged = merge_files(&[csv, json], &dest, DedupPolicy::ExactRow).unwrap();
        assert_eq!(merged, vec![a, b]);
    }

    #[test]
    fn ignore_scraped_time_collapses_rescrapes() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.json");
        let second = dir.path().join("second.json");
        let dest = dir.path().join("all.csv");

        store::write(&[record("Comptable", "2024-03-10 09:30:00.000000")], &first).unwrap();
        store::write(&[record("Comptable", "2024-03-11 08:00:00.000000")], &second).unwrap();

        let inputs = [first, second];
        assert_eq!(merge_files(&inputs, &dest, DedupPolicy::ExactRow).unwrap().len(), 2);
        assert_eq!(
            merge_files(&inputs, &dest, DedupPolicy::IgnoreScrapedTime).unwrap().len(),
            1
        );
    }

    #[test]
    fn missing_input_counts_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("all.json");
        let merged =
            merge_files(&[dir.path().join("nope.csv")], &dest, DedupPolicy::ExactRow).unwrap();
        assert!(merged.is_empty());
    }

    #[test]
    fn destination_as_input_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("all.json");
        assert!(merge_files(&[dest.clone()], &dest, DedupPolicy::ExactRow).is_err());
    }

    #[test]
    fn unsupported_input_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("all.json");
        assert!(merge_files(&[dir.path().join("a.txt")], &dest, DedupPolicy::ExactRow).is_err());
    }
}
