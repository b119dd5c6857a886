//! Library layer for the job-board scraper: card and detail-page extraction,
//! date normalization, duplicate-free merging, and CSV/JSON persistence.
//!
//! Wraps the `jobboard_api` transport with a paced, strictly sequential
//! scrape pipeline.

pub mod dates;
pub mod detail;
pub mod document;
pub mod error;
pub mod listing;
pub mod merge;
pub mod pacer;
pub mod pipeline;
pub mod record;
pub mod store;
pub mod validation;

pub use jobboard_api;
pub use jobboard_api::{Client, ListingQuery, Query};

pub use error::JobScraperError;
pub use merge::{combine_unique, DedupPolicy};
pub use pipeline::{persist, PageSelection, ScrapeConfig, ScrapeReport, Scraper};
pub use record::{fields, JobRecord};
pub use store::{SaveMode, StoreError, StoreFormat};
