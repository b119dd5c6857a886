//! Error types for the library layer.

use std::fmt;

use crate::document::SelectorError;
use crate::store::StoreError;

/// Errors that end a scrape run.
#[derive(Debug)]
pub enum JobScraperError {
    /// A results or detail page could not be fetched.
    Fetch(jobboard_api::Error),
    /// A lookup selector was rejected by the HTML parser.
    Parse(SelectorError),
    /// Reading or writing the store failed.
    Store(StoreError),
    /// User-provided input failed validation.
    InvalidInput(String),
}

impl fmt::Display for JobScraperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(e) => write!(f, "Fetch error: {}", e),
            Self::Parse(e) => write!(f, "Parse error: {}", e),
            Self::Store(e) => write!(f, "Store error: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for JobScraperError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fetch(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Store(e) => Some(e),
            Self::InvalidInput(_) => None,
        }
    }
}

impl From<jobboard_api::Error> for JobScraperError {
    fn from(e: jobboard_api::Error) -> Self {
        Self::Fetch(e)
    }
}

impl From<SelectorError> for JobScraperError {
    fn from(e: SelectorError) -> Self {
        Self::Parse(e)
    }
}

impl From<StoreError> for JobScraperError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}
