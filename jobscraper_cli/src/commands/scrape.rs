//! The `scrape` subcommand: fetch listings and merge them into the CSV/JSON stores.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use clap::Args;
use jobscraper_lib::{
    persist, validation, Client, DedupPolicy, PageSelection, SaveMode, ScrapeConfig, Scraper,
};

/// Arguments for the `scrape` subcommand.
#[derive(Args)]
pub struct ScrapeArgs {
    /// Results page to fetch (1-indexed)
    #[arg(long, default_value = "1")]
    pub page: i64,

    /// Fetch every page from 1 up to --page
    #[arg(long)]
    pub up_to_page: bool,

    /// Skip this many offers instead of using --page
    #[arg(long, conflicts_with = "up_to_page")]
    pub start: Option<i64>,

    /// Offers per results page
    #[arg(long, default_value = "50")]
    pub limit: i64,

    /// Only read the listing cards; do not open detail pages
    #[arg(long)]
    pub no_details: bool,

    /// Keep listings whose detail page cannot be parsed
    #[arg(long)]
    pub keep_unenriched: bool,

    /// Treat rows differing only in scraped_time as duplicates
    #[arg(long)]
    pub ignore_scraped_time: bool,

    /// Replace the stores instead of merging into them
    #[arg(long)]
    pub overwrite: bool,

    /// Delay after each results page in milliseconds
    #[arg(long, default_value = "5000")]
    pub page_delay_ms: u64,

    /// Delay after each detail page in milliseconds
    #[arg(long, default_value = "7000")]
    pub detail_delay_ms: u64,

    /// CSV store path
    #[arg(long, default_value = "job_test.csv")]
    pub csv: PathBuf,

    /// JSON store path
    #[arg(long, default_value = "job_test.json")]
    pub json: PathBuf,

    /// Do not write the CSV store
    #[arg(long)]
    pub no_csv: bool,

    /// Do not write the JSON store
    #[arg(long)]
    pub no_json: bool,
}

impl ScrapeArgs {
    fn config(&self) -> Result<ScrapeConfig> {
        let limit = validation::validate_limit(self.limit)?;
        let pages = match self.start {
            Some(start) => PageSelection::Start(validation::validate_start(start)?),
            None if self.up_to_page => PageSelection::UpToPage(validation::validate_page(self.page)?),
            None => PageSelection::Page(validation::validate_page(self.page)?),
        };
        Ok(ScrapeConfig {
            pages,
            limit,
            follow_details: !self.no_details,
            keep_unenriched: self.keep_unenriched,
            page_delay: Duration::from_millis(self.page_delay_ms),
            detail_delay: Duration::from_millis(self.detail_delay_ms),
        })
    }

    /// JSON first, then CSV, matching the order progress is printed in.
    fn targets(&self) -> Result<Vec<PathBuf>> {
        let mut targets = Vec::new();
        if !self.no_json {
            targets.push(validation::validate_store_path(&self.json)?);
        }
        if !self.no_csv {
            targets.push(validation::validate_store_path(&self.csv)?);
        }
        if targets.is_empty() {
            bail!("nothing to write: both --no-csv and --no-json were given");
        }
        Ok(targets)
    }

    fn policy(&self) -> DedupPolicy {
        if self.ignore_scraped_time {
            DedupPolicy::IgnoreScrapedTime
        } else {
            DedupPolicy::ExactRow
        }
    }

    fn mode(&self) -> SaveMode {
        if self.overwrite {
            SaveMode::Overwrite
        } else {
            SaveMode::Append
        }
    }
}

pub async fn run(args: &ScrapeArgs, base_url: Option<&str>) -> Result<()> {
    let config = args.config()?;
    let targets = args.targets()?;

    let client = match base_url.map(|s| s.to_string()).or_else(|| {
        std::env::var("JOBSCRAPER_BASE_URL").ok()
    }) {
        Some(url) => Client::with_base_url(&url)?,
        None => Client::new()?,
    };

    let started = Instant::now();
    eprintln!(
        "Scraping {} ({:?}, {} per page{})",
        client.base_url(),
        config.pages,
        config.limit,
        if config.follow_details { ", with detail pages" } else { "" }
    );

    let report = Scraper::new(&client, config).run().await?;

    eprintln!(
        "Scraped {} listings from {} cards ({} malformed, {} without link, {} without details)",
        report.records.len(),
        report.cards,
        report.malformed,
        report.missing_link,
        report.unenriched_dropped
    );

    for path in &targets {
        eprintln!("Saving job data to {}...", path.display());
        let written = persist(&report.records, std::slice::from_ref(path), args.mode(), args.policy())?;
        for (path, count) in written {
            eprintln!("Done: {} now holds {} records", path.display(), count);
        }
    }

    eprintln!(
        "Requests: {} results pages, {} detail pages, {:.1}s of courtesy delay, {:.1}s total",
        report.requests.listing_pages,
        report.requests.detail_pages,
        report.requests.total_delay_secs,
        started.elapsed().as_secs_f64()
    );
    Ok(())
}
