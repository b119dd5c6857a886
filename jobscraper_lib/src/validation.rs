use std::path::{Path, PathBuf};

use crate::error::JobScraperError;
use crate::store::StoreFormat;

/// Validate a 1-indexed page number.
pub fn validate_page(page: i64) -> Result<i64, JobScraperError> {
    if page < 1 {
        return Err(JobScraperError::InvalidInput(format!(
            "page must be 1 or greater, got {}",
            page
        )));
    }
    Ok(page)
}

/// Validate the number of offers per results page.
pub fn validate_limit(limit: i64) -> Result<i64, JobScraperError> {
    if limit < 1 {
        return Err(JobScraperError::InvalidInput(format!(
            "limit must be 1 or greater, got {}",
            limit
        )));
    }
    Ok(limit)
}

/// Validate an explicit number of offers to skip.
pub fn validate_start(start: i64) -> Result<i64, JobScraperError> {
    if start < 0 {
        return Err(JobScraperError::InvalidInput(format!(
            "start must not be negative, got {}",
            start
        )));
    }
    Ok(start)
}

/// Validate a store path: `.csv` or `.json`, case-insensitive.
pub fn validate_store_path(path: &Path) -> Result<PathBuf, JobScraperError> {
    StoreFormat::from_path(path).map_err(|_| {
        JobScraperError::InvalidInput(format!(
            "'{}' must end in .csv or .json",
            path.display()
        ))
    })?;
    Ok(path.to_path_buf())
}
