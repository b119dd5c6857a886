//! The scrape run: results pages, optional detail pages, date normalization.
//!
//! Requests are issued one at a time, each followed by the pacer's delay.
//! Any fetch failure ends the run; nothing is persisted until the caller
//! hands the finished batch to [`persist`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use jobboard_api::{Client, ListingQuery, Query, DEFAULT_LIMIT};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::dates::normalize_record_dates;
use crate::detail::{enrich_from_markup, DetailError};
use crate::document::{Document, SelectorError};
use crate::error::JobScraperError;
use crate::listing::{extract_listings, ListingPage};
use crate::merge::DedupPolicy;
use crate::pacer::{paced, Pacer, RequestKind, TrackerSummary, DEFAULT_DETAIL_DELAY, DEFAULT_PAGE_DELAY};
use crate::record::JobRecord;
use crate::store::{self, SaveMode};

/// Which results pages a run visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSelection {
    /// A single 1-indexed page.
    Page(i64),
    /// Pages 1 through N.
    UpToPage(i64),
    /// A single page starting after an explicit number of offers.
    Start(i64),
}

impl PageSelection {
    pub fn queries(&self, limit: i64) -> Vec<ListingQuery> {
        let base = ListingQuery::default().with_limit(limit);
        match *self {
            Self::Page(page) => vec![base.with_page(page)],
            Self::UpToPage(last) => (1..=last).map(|page| base.with_page(page)).collect(),
            Self::Start(start) => vec![base.with_start(start)],
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub pages: PageSelection,
    /// Offers per results page.
    pub limit: i64,
    /// Fetch each listing's detail page.
    pub follow_details: bool,
    /// Keep listings whose detail page has no recognizable block.
    pub keep_unenriched: bool,
    pub page_delay: Duration,
    pub detail_delay: Duration,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            pages: PageSelection::Page(1),
            limit: DEFAULT_LIMIT,
            follow_details: true,
            keep_unenriched: false,
            page_delay: DEFAULT_PAGE_DELAY,
            detail_delay: DEFAULT_DETAIL_DELAY,
        }
    }
}

/// Outcome of a run.
#[derive(Debug, Default)]
pub struct ScrapeReport {
    /// Completed records in page/card order.
    pub records: Vec<JobRecord>,
    pub cards: usize,
    pub malformed: usize,
    pub missing_link: usize,
    /// Listings whose detail page had no recognizable block and were dropped.
    pub unenriched_dropped: usize,
    /// Listings whose detail page had no recognizable block but were kept.
    pub unenriched_kept: usize,
    pub requests: TrackerSummary,
}

/// Source of the extraction timestamp and of "today".
pub type Clock = fn() -> NaiveDateTime;

pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub struct Scraper<'a> {
    client: &'a Client,
    config: ScrapeConfig,
    pacer: Pacer,
    clock: Clock,
}

impl<'a> Scraper<'a> {
    pub fn new(client: &'a Client, config: ScrapeConfig) -> Self {
        let pacer = Pacer::new(config.page_delay, config.detail_delay);
        Self {
            client,
            config,
            pacer,
            clock: local_now,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub async fn run(&self) -> Result<ScrapeReport, JobScraperError> {
        let mut report = ScrapeReport::default();

        for query in self.config.pages.queries(self.config.limit) {
            let url = self.client.listing_url(&query)?;
            tracing::info!("Fetching results page {}", url);
            let markup = paced(&self.pacer, RequestKind::ListingPage, || {
                self.client.get_listing_page(&query)
            })
            .await?;

            let page = parse_listing_page(&markup)?;
            tracing::info!(
                "Found {} cards ({} usable, {} malformed, {} without link)",
                page.cards,
                page.records.len(),
                page.malformed,
                page.missing_link
            );
            report.cards += page.cards;
            report.malformed += page.malformed;
            report.missing_link += page.missing_link;

            let total = page.records.len();
            for (idx, record) in page.records.into_iter().enumerate() {
                if let Some(record) = self.complete_record(record, &mut report).await? {
                    tracing::debug!("{}", pretty_record(&record));
                    report.records.push(record);
                }
                tracing::info!("{} / {}", idx + 1, total);
            }
        }

        report.requests = self.pacer.tracker().summary();
        Ok(report)
    }

    /// Enriches a summary record (when configured), stamps it and normalizes its dates.
    async fn complete_record(
        &self,
        mut record: JobRecord,
        report: &mut ScrapeReport,
    ) -> Result<Option<JobRecord>, JobScraperError> {
        if self.config.follow_details {
            let link = record.link().unwrap_or_default().to_string();
            let markup = paced(&self.pacer, RequestKind::DetailPage, || {
                self.client.get_page(&link)
            })
            .await?;

            match enrich_from_markup(&mut record, &markup, (self.clock)()) {
                Ok(applied) => tracing::debug!("Added {} detail fields from {}", applied, link),
                Err(DetailError::MissingContainer) if self.config.keep_unenriched => {
                    tracing::warn!("No detail block on {}, keeping summary only", link);
                    record.stamp_scraped_time((self.clock)());
                    report.unenriched_kept += 1;
                }
                Err(DetailError::MissingContainer) => {
                    tracing::warn!("No detail block on {}, skipping listing", link);
                    report.unenriched_dropped += 1;
                    return Ok(None);
                }
                Err(DetailError::Selector(e)) => return Err(e.into()),
            }
        } else {
            record.stamp_scraped_time((self.clock)());
        }

        normalize_record_dates(&mut record, (self.clock)().date());
        Ok(Some(record))
    }
}

fn parse_listing_page(markup: &str) -> Result<ListingPage, SelectorError> {
    let doc = Document::parse(markup);
    extract_listings(&doc)
}

fn pretty_record(record: &JobRecord) -> String {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b" "));
    if record.serialize(&mut ser).is_err() {
        return format!("{:?}", record);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Saves a finished batch to every target path, returning each store's new size.
pub fn persist(
    records: &[JobRecord],
    targets: &[PathBuf],
    mode: SaveMode,
    policy: DedupPolicy,
) -> Result<Vec<(PathBuf, usize)>, JobScraperError> {
    targets
        .iter()
        .map(|path| -> Result<(PathBuf, usize), JobScraperError> {
            let count = store::save(records, Path::new(path), mode, policy)?;
            Ok((path.clone(), count))
        })
        .collect()
}
